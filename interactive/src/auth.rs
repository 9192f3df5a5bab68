use leptos::prelude::*;
use shutter_shared::{LoginRequest, RegisterRequest, TokenResponse, User};
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, ApiRequest, Gateway, Method, Navigator, Transport};
use crate::config::{FEED_PATH, LOGIN_PATH};
use crate::error::ApiError;
use crate::session::{LocalStorageSession, SessionStore};

/// Reactive auth state shared via context.
#[derive(Clone, Copy, Debug)]
pub struct AuthState {
    pub token: RwSignal<Option<String>>,
}

impl AuthState {
    pub fn is_logged_in(&self) -> bool {
        self.token.get().is_some()
    }
}

/// Exchange credentials for a token, store it, and go to the feed.
pub async fn login<T, S, N>(gw: &Gateway<T, S, N>, email: String, password: String) -> Result<(), ApiError>
where
    T: Transport,
    S: SessionStore,
    N: Navigator,
{
    let token: TokenResponse = gw
        .post_json("/auth/login", &LoginRequest { email, password })
        .await?;
    gw.session().set_token(&token.access_token);
    tracing::info!("logged in");
    gw.navigator().redirect(FEED_PATH);
    Ok(())
}

pub fn check_passwords(password: &str, confirm: &str) -> Result<(), &'static str> {
    if password != confirm {
        return Err("Passwords do not match");
    }
    Ok(())
}

/// Create the account, then send the user to the login page. Any 2xx
/// status counts as registered.
pub async fn register<T, S, N>(gw: &Gateway<T, S, N>, req: RegisterRequest) -> Result<(), ApiError>
where
    T: Transport,
    S: SessionStore,
    N: Navigator,
{
    let resp = gw
        .send_ok("/auth/register", ApiRequest::json(Method::Post, &req)?)
        .await?;
    match resp.json::<User>() {
        Ok(user) => tracing::info!(user_id = user.id, "registered"),
        Err(_) => tracing::info!("registered"),
    }
    gw.navigator().redirect(LOGIN_PATH);
    Ok(())
}

pub fn logout<S: SessionStore, N: Navigator>(session: &S, navigator: &N) {
    session.clear();
    navigator.redirect(LOGIN_PATH);
}

/// Wraps children with auth context.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let auth = AuthState {
        token: RwSignal::new(LocalStorageSession.token()),
    };
    provide_context(auth);

    children()
}

/// Login / logout link for the nav bar.
#[component]
pub fn LoginButton() -> impl IntoView {
    let auth = expect_context::<AuthState>();

    let on_logout = move |_| {
        auth.token.set(None);
        let gw = api::gateway();
        logout(gw.session(), gw.navigator());
    };

    move || {
        if auth.is_logged_in() {
            view! { <button class="btn-sm" on:click=on_logout>"Logout"</button> }.into_any()
        } else {
            view! { <a class="btn-sm" href=LOGIN_PATH>"Login"</a> }.into_any()
        }
    }
}

#[component]
pub fn LoginForm() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        submitting.set(true);
        error.set(None);
        let (email, password) = (email.get_untracked(), password.get_untracked());
        spawn_local(async move {
            match login(&api::gateway(), email, password).await {
                Ok(()) | Err(ApiError::Unauthorized) => {}
                Err(err) => error.set(Some(err.user_message("Login failed"))),
            }
            submitting.set(false);
        });
    };

    view! {
        <form class="auth-form" on:submit=on_submit>
            <h2>"Login"</h2>
            <ErrorMessage error=error />
            <div class="form-group">
                <label for="email">"Email"</label>
                <input id="email" type="email" required=true
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev)) />
            </div>
            <div class="form-group">
                <label for="password">"Password"</label>
                <input id="password" type="password" required=true
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev)) />
            </div>
            <button type="submit" disabled=move || submitting.get()>"Login"</button>
            <p class="auth-switch">"No account? " <a href="/register">"Register"</a></p>
        </form>
    }
}

#[component]
pub fn RegisterForm() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let submitting = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        error.set(None);
        let pw = password.get_untracked();
        if let Err(msg) = check_passwords(&pw, &confirm.get_untracked()) {
            error.set(Some(msg.to_string()));
            return;
        }
        let name = username.get_untracked().trim().to_string();
        let req = RegisterRequest {
            email: email.get_untracked(),
            password: pw,
            username: (!name.is_empty()).then_some(name),
        };
        submitting.set(true);
        spawn_local(async move {
            match register(&api::gateway(), req).await {
                Ok(_) | Err(ApiError::Unauthorized) => {}
                Err(err) => error.set(Some(err.user_message("Registration failed"))),
            }
            submitting.set(false);
        });
    };

    view! {
        <form class="auth-form" on:submit=on_submit>
            <h2>"Register"</h2>
            <ErrorMessage error=error />
            <div class="form-group">
                <label for="email">"Email"</label>
                <input id="email" type="email" required=true
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev)) />
            </div>
            <div class="form-group">
                <label for="username">"Username"</label>
                <input id="username" type="text"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev)) />
            </div>
            <div class="form-group">
                <label for="password">"Password"</label>
                <input id="password" type="password" required=true
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev)) />
            </div>
            <div class="form-group">
                <label for="confirm-password">"Confirm password"</label>
                <input id="confirm-password" type="password" required=true
                    prop:value=move || confirm.get()
                    on:input=move |ev| confirm.set(event_target_value(&ev)) />
            </div>
            <button type="submit" disabled=move || submitting.get()>"Register"</button>
            <p class="auth-switch">"Already registered? " <a href=LOGIN_PATH>"Login"</a></p>
        </form>
    }
}

#[component]
pub fn ErrorMessage(error: RwSignal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <div class="error-msg">{move || error.get().unwrap_or_default()}</div>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{test_gateway, RecordingNavigator};
    use crate::session::MemorySession;

    #[tokio::test]
    async fn login_stores_token_and_opens_feed() {
        let session = MemorySession::default();
        let (gw, transport, navigator) = test_gateway(session.clone());
        transport.reply(200, r#"{"access_token":"jwt-abc","token_type":"bearer"}"#);

        login(&gw, "ana@example.com".into(), "pw".into()).await.unwrap();

        assert_eq!(session.token().as_deref(), Some("jwt-abc"));
        assert_eq!(navigator.visited(), vec!["/".to_string()]);
        let sent = &transport.sent()[0];
        assert_eq!(sent.url, "/api/auth/login");
        assert_eq!(sent.header("Authorization"), None);
    }

    #[tokio::test]
    async fn bad_credentials_go_through_unauthorized_path() {
        let session = MemorySession::default();
        let (gw, transport, navigator) = test_gateway(session.clone());
        transport.reply(401, r#"{"detail":"Incorrect email or password"}"#);

        let err = login(&gw, "ana@example.com".into(), "nope".into())
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert!(session.token().is_none());
        assert_eq!(navigator.visited(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn register_then_login_page() {
        let (gw, transport, navigator) = test_gateway(MemorySession::default());
        transport.reply(
            201,
            r#"{"id":5,"email":"bo@example.com","username":"bo","profile_picture_url":null,"created_at":"2024-05-01T10:00:00"}"#,
        );

        register(
            &gw,
            RegisterRequest {
                email: "bo@example.com".into(),
                password: "pw".into(),
                username: Some("bo".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(navigator.visited(), vec!["/login".to_string()]);
        let sent = &transport.sent()[0];
        assert_eq!(sent.url, "/api/auth/register");
        assert_eq!(
            sent.body,
            crate::api::Body::Json(r#"{"email":"bo@example.com","password":"pw","username":"bo"}"#.into())
        );
    }

    #[tokio::test]
    async fn registered_with_unexpected_body_still_opens_login() {
        let (gw, transport, navigator) = test_gateway(MemorySession::default());
        transport.reply(201, "{}");

        register(
            &gw,
            RegisterRequest {
                email: "bo@example.com".into(),
                password: "pw".into(),
                username: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(navigator.visited(), vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn duplicate_email_surfaces_detail() {
        let (gw, transport, navigator) = test_gateway(MemorySession::default());
        transport.reply(400, r#"{"detail":"Email already registered"}"#);

        let err = register(
            &gw,
            RegisterRequest {
                email: "bo@example.com".into(),
                password: "pw".into(),
                username: None,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.user_message("Registration failed"), "Email already registered");
        assert!(navigator.visited().is_empty());
    }

    #[test]
    fn mismatched_passwords_are_refused() {
        assert_eq!(check_passwords("a", "b"), Err("Passwords do not match"));
        assert_eq!(check_passwords("same", "same"), Ok(()));
    }

    #[test]
    fn logout_clears_session() {
        let session = MemorySession::with_token("t");
        let navigator = RecordingNavigator::default();

        logout(&session, &navigator);

        assert!(session.token().is_none());
        assert_eq!(navigator.visited(), vec!["/login".to_string()]);
    }
}
