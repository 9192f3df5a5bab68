use leptos::prelude::*;
use shutter_shared::Post;
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, Gateway, Navigator, Transport};
use crate::comments::CommentSection;
use crate::dom;
use crate::error::ApiError;
use crate::likes::LikeButton;
use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum FeedView {
    Loading,
    Loaded(Vec<Post>),
    LoginRequired,
    Failed,
}

pub async fn fetch_feed<T, S, N>(gw: &Gateway<T, S, N>) -> FeedView
where
    T: Transport,
    S: SessionStore,
    N: Navigator,
{
    match gw.get_json::<Vec<Post>>("/posts/").await {
        Ok(posts) => FeedView::Loaded(posts),
        Err(ApiError::Rejected { status, .. }) => {
            tracing::debug!(status, "feed refused");
            FeedView::LoginRequired
        }
        Err(err) => {
            tracing::error!(error = %err, "could not load feed");
            FeedView::Failed
        }
    }
}

#[component]
pub fn Feed() -> impl IntoView {
    let feed = RwSignal::new(FeedView::Loading);

    spawn_local(async move {
        feed.set(fetch_feed(&api::gateway()).await);
    });

    view! {
        <section class="feed-container">
            {move || match feed.get() {
                FeedView::Loading => view! { <p class="feed-loading">"Loading..."</p> }.into_any(),
                FeedView::LoginRequired => {
                    view! { <p>"Please login to view the feed."</p> }.into_any()
                }
                FeedView::Failed => view! { <p>"Could not load the feed."</p> }.into_any(),
                FeedView::Loaded(posts) => view! {
                    <For each=move || posts.clone() key=|p| p.id let:post>
                        <PostCard post=post />
                    </For>
                }
                .into_any(),
            }}
        </section>
    }
}

#[component]
fn PostCard(post: Post) -> impl IntoView {
    let comments_open = RwSignal::new(false);
    let posted_at = dom::local_time(&post.created_at);

    view! {
        <article class="post-card">
            <div class="post-header">
                <div class="user-info">
                    <img src={post.user.avatar_src()} class="avatar" alt="" />
                    <span class="username">{post.user.display_name()}</span>
                </div>
                <div class="post-title">{post.title.clone()}</div>
                <time class="post-time">{posted_at}</time>
            </div>
            <img src={post.image_url.clone()} class="post-image" alt={post.title.clone()} />
            <div class="post-actions">
                <LikeButton post_id=post.id />
                <button class="comment-toggle" on:click=move |_| comments_open.update(|open| *open = !*open)>
                    "Comments"
                </button>
            </div>
            <CommentSection post_id=post.id open=comments_open />
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::test_gateway;
    use crate::session::MemorySession;

    #[tokio::test]
    async fn posts_are_listed() {
        let (gw, transport, _) = test_gateway(MemorySession::default());
        transport.reply(
            200,
            r#"[{"id":1,"title":"Hi","image_url":"/uploads/a.png","user_id":3,"created_at":"2024-05-01T10:00:00",
                 "user":{"id":3,"email":"c@example.com","username":null,"profile_picture_url":null,"created_at":"2024-04-01T00:00:00"}}]"#,
        );

        match fetch_feed(&gw).await {
            FeedView::Loaded(posts) => {
                assert_eq!(posts.len(), 1);
                assert_eq!(posts[0].user.display_name(), "User 3");
            }
            other => panic!("expected posts, got {:?}", other),
        }
        assert_eq!(transport.sent()[0].url, "/api/posts/");
    }

    #[tokio::test]
    async fn refused_feed_asks_for_login() {
        let (gw, transport, _) = test_gateway(MemorySession::default());
        transport.reply(403, "{}");

        assert_eq!(fetch_feed(&gw).await, FeedView::LoginRequired);
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let (gw, transport, _) = test_gateway(MemorySession::default());
        transport.fail(ApiError::Network("offline".into()));

        assert_eq!(fetch_feed(&gw).await, FeedView::Failed);
    }
}
