use leptos::html;
use leptos::prelude::*;
use shutter_shared::Post;
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, ApiRequest, FilePart, Gateway, Method, MultipartForm, Navigator, Transport};
use crate::config::FEED_PATH;
use crate::dom;
use crate::error::ApiError;
use crate::session::SessionStore;

/// Upload a new post and return to the feed. Any 2xx status counts as
/// created.
pub async fn create_post<T, S, N>(
    gw: &Gateway<T, S, N>,
    title: String,
    image: FilePart,
) -> Result<(), ApiError>
where
    T: Transport,
    S: SessionStore,
    N: Navigator,
{
    let form = MultipartForm::new().text("title", title).file("image", image);
    let resp = gw
        .send_ok("/posts/", ApiRequest::multipart(Method::Post, form))
        .await?;
    match resp.json::<Post>() {
        Ok(post) => tracing::info!(post_id = post.id, "post created"),
        Err(_) => tracing::info!("post created"),
    }
    gw.navigator().redirect(FEED_PATH);
    Ok(())
}

#[component]
pub fn CreatePostForm() -> impl IntoView {
    let title = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);
    let image_ref = NodeRef::<html::Input>::new();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(input) = image_ref.get() else {
            return;
        };
        let title = title.get_untracked();
        submitting.set(true);
        spawn_local(async move {
            match dom::selected_file(&input).await {
                Ok(None) => dom::alert("Please select an image"),
                Ok(Some(image)) => match create_post(&api::gateway(), title, image).await {
                    Ok(_) | Err(ApiError::Unauthorized) => {}
                    Err(ApiError::Rejected { .. }) => dom::alert("Failed to create post"),
                    Err(_) => dom::alert("Error creating post"),
                },
                Err(err) => {
                    tracing::error!(error = %err, "could not read image");
                    dom::alert("Error creating post");
                }
            }
            submitting.set(false);
        });
    };

    view! {
        <form class="create-post-form" on:submit=on_submit>
            <h2>"New post"</h2>
            <div class="form-group">
                <label for="title">"Title"</label>
                <input id="title" type="text" required=true
                    prop:value=move || title.get()
                    on:input=move |ev| title.set(event_target_value(&ev)) />
            </div>
            <div class="form-group">
                <label for="image">"Image"</label>
                <input id="image" type="file" accept="image/*" node_ref=image_ref />
            </div>
            <button type="submit" disabled=move || submitting.get()>
                {move || if submitting.get() { "Uploading..." } else { "Share" }}
            </button>
        </form>
    }
}
