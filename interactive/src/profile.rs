use leptos::html;
use leptos::prelude::*;
use shutter_shared::User;
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, FilePart, Gateway, Method, MultipartForm, Navigator, Transport};
use crate::auth::ErrorMessage;
use crate::dom;
use crate::error::ApiError;
use crate::session::SessionStore;

/// `PUT /auth/me`. Fields left as `None` are not sent.
pub async fn update_profile<T, S, N>(
    gw: &Gateway<T, S, N>,
    username: Option<String>,
    picture: Option<FilePart>,
) -> Result<User, ApiError>
where
    T: Transport,
    S: SessionStore,
    N: Navigator,
{
    let mut form = MultipartForm::new();
    if let Some(name) = username {
        form = form.text("username", name);
    }
    if let Some(file) = picture {
        form = form.file("profile_picture", file);
    }
    gw.send_multipart(Method::Put, "/auth/me", form).await
}

#[component]
pub fn ProfileForm() -> impl IntoView {
    let username = RwSignal::new(String::new());
    let saved: RwSignal<Option<User>> = RwSignal::new(None);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let submitting = RwSignal::new(false);
    let picture_ref = NodeRef::<html::Input>::new();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let input = picture_ref.get();
        let name = username.get_untracked().trim().to_string();
        submitting.set(true);
        error.set(None);
        spawn_local(async move {
            let picture = match input {
                Some(input) => dom::selected_file(&input).await,
                None => Ok(None),
            };
            let result = match picture {
                Ok(picture) => {
                    let name = (!name.is_empty()).then_some(name);
                    update_profile(&api::gateway(), name, picture).await
                }
                Err(err) => Err(err),
            };
            match result {
                Ok(user) => saved.set(Some(user)),
                Err(ApiError::Unauthorized) => {}
                Err(err) => error.set(Some(err.user_message("Profile update failed"))),
            }
            submitting.set(false);
        });
    };

    view! {
        <form class="profile-form" on:submit=on_submit>
            <h2>"Profile"</h2>
            <ErrorMessage error=error />
            {move || saved.get().map(|user| view! {
                <div class="profile-card">
                    <img src={user.avatar_src()} class="avatar avatar-lg" alt="" />
                    <strong>{user.display_name()}</strong>
                    <span class="profile-email">{user.email.clone()}</span>
                </div>
            })}
            <div class="form-group">
                <label for="username">"New username"</label>
                <input id="username" type="text"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev)) />
            </div>
            <div class="form-group">
                <label for="profile-picture">"Profile picture"</label>
                <input id="profile-picture" type="file" accept="image/*" node_ref=picture_ref />
            </div>
            <button type="submit" disabled=move || submitting.get()>"Save"</button>
        </form>
    }
}
