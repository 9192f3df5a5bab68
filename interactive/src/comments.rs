use leptos::prelude::*;
use shutter_shared::{Comment, CreateComment};
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, ApiRequest, Gateway, Method, Navigator, Transport};
use crate::dom;
use crate::error::ApiError;
use crate::session::SessionStore;

#[derive(Debug, Clone, PartialEq)]
pub enum CommentsView {
    Loading,
    Loaded(Vec<Comment>),
    Failed,
}

pub async fn fetch_comments<T, S, N>(gw: &Gateway<T, S, N>, post_id: i64) -> CommentsView
where
    T: Transport,
    S: SessionStore,
    N: Navigator,
{
    match gw
        .get_json::<Vec<Comment>>(&format!("/comments/{}", post_id))
        .await
    {
        Ok(list) => CommentsView::Loaded(list),
        Err(err) => {
            tracing::warn!(post_id, error = %err, "could not load comments");
            CommentsView::Failed
        }
    }
}

/// Post a comment and return the refreshed list.
///
/// Any 2xx status counts as accepted, whatever the body holds. `Err` only
/// when the comment itself was not accepted; a failed refresh after a
/// successful post comes back as `Ok(CommentsView::Failed)`.
pub async fn submit_comment<T, S, N>(
    gw: &Gateway<T, S, N>,
    post_id: i64,
    text: String,
) -> Result<CommentsView, ApiError>
where
    T: Transport,
    S: SessionStore,
    N: Navigator,
{
    let endpoint = format!("/comments/{}", post_id);
    let resp = gw
        .send_ok(&endpoint, ApiRequest::json(Method::Post, &CreateComment { text })?)
        .await?;
    match resp.json::<Comment>() {
        Ok(comment) => tracing::debug!(post_id, comment_id = comment.id, "comment posted"),
        Err(_) => tracing::debug!(post_id, "comment posted"),
    }
    Ok(fetch_comments(gw, post_id).await)
}

/// State a comment form keeps between submits.
pub trait CommentFormSlots {
    fn clear_text(&self);
    fn set_comments(&self, view: CommentsView);
    fn set_error(&self, message: String);
    fn alert(&self, message: &str);
}

#[derive(Clone, Copy)]
struct CommentFormState {
    text: RwSignal<String>,
    comments: RwSignal<CommentsView>,
    error: RwSignal<Option<String>>,
}

impl CommentFormSlots for CommentFormState {
    fn clear_text(&self) {
        self.text.set(String::new());
    }

    fn set_comments(&self, view: CommentsView) {
        self.comments.set(view);
    }

    fn set_error(&self, message: String) {
        self.error.set(Some(message));
    }

    fn alert(&self, message: &str) {
        dom::alert(message);
    }
}

/// Apply the result of [`submit_comment`] to the form. The input is only
/// cleared once the comment was accepted.
pub fn settle_submit(slots: &impl CommentFormSlots, outcome: Result<CommentsView, ApiError>) {
    match outcome {
        Ok(refreshed) => {
            slots.clear_text();
            slots.set_comments(refreshed);
        }
        Err(ApiError::Unauthorized) => {}
        Err(err @ ApiError::Rejected { .. }) => {
            slots.set_error(err.user_message("Failed to post comment"));
        }
        Err(_) => slots.alert("Failed to post comment"),
    }
}

/// Comment list and form for one post. Reloads every time it is opened.
#[component]
pub fn CommentSection(post_id: i64, open: RwSignal<bool>) -> impl IntoView {
    let comments = RwSignal::new(CommentsView::Loading);

    Effect::new(move |_| {
        if open.get() {
            comments.set(CommentsView::Loading);
            spawn_local(async move {
                comments.set(fetch_comments(&api::gateway(), post_id).await);
            });
        }
    });

    view! {
        <Show when=move || open.get()>
            <div class="comments-section">
                <div class="comments-list">{move || render_comments(comments.get())}</div>
                <CommentForm post_id=post_id comments=comments />
            </div>
        </Show>
    }
}

fn render_comments(view: CommentsView) -> AnyView {
    match view {
        CommentsView::Loading => view! { <p class="comments-loading">"Loading..."</p> }.into_any(),
        CommentsView::Failed => {
            view! { <p class="comments-error">"Error loading comments"</p> }.into_any()
        }
        CommentsView::Loaded(list) if list.is_empty() => {
            view! { <p>"No comments yet."</p> }.into_any()
        }
        CommentsView::Loaded(list) => list
            .into_iter()
            .map(|c| view! { <CommentItem comment=c /> })
            .collect_view()
            .into_any(),
    }
}

#[component]
fn CommentItem(comment: Comment) -> impl IntoView {
    view! {
        <div class="comment">
            <div class="comment-author">
                <img src={comment.user.avatar_src()} class="avatar avatar-sm" alt="" />
                <span class="comment-username">{comment.user.display_name()}</span>
            </div>
            <div class="comment-text">{comment.text.clone()}</div>
        </div>
    }
}

#[component]
fn CommentForm(post_id: i64, comments: RwSignal<CommentsView>) -> impl IntoView {
    let text = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let slots = CommentFormState {
        text,
        comments,
        error,
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let body = text.get_untracked();
        if body.trim().is_empty() {
            return;
        }
        submitting.set(true);
        error.set(None);
        spawn_local(async move {
            let outcome = submit_comment(&api::gateway(), post_id, body).await;
            settle_submit(&slots, outcome);
            submitting.set(false);
        });
    };

    view! {
        <form class="comment-form" on:submit=on_submit>
            <div class="form-group">
                <input
                    type="text"
                    placeholder="Write a comment..."
                    required=true
                    prop:value=move || text.get()
                    on:input=move |ev| text.set(event_target_value(&ev))
                />
            </div>
            <Show when=move || error.get().is_some()>
                <p class="error-msg">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <button class="btn-sm" type="submit" disabled=move || submitting.get()>
                {move || if submitting.get() { "Posting..." } else { "Post" }}
            </button>
        </form>
    }
}
