use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::path;

use crate::auth::{AuthProvider, AuthState, LoginButton, LoginForm, RegisterForm};
use crate::feed::Feed;
use crate::posts::CreatePostForm;
use crate::profile::ProfileForm;

#[component]
pub fn ShutterApp() -> impl IntoView {
    view! {
        <AuthProvider>
            <Router>
                <NavBar />
                <main class="container">
                    <Routes fallback=|| view! { <p>"Page not found."</p> }>
                        <Route path=path!("/") view=Feed />
                        <Route path=path!("/login") view=LoginForm />
                        <Route path=path!("/register") view=RegisterForm />
                        <Route path=path!("/create") view=CreatePostForm />
                        <Route path=path!("/profile") view=ProfileForm />
                    </Routes>
                </main>
            </Router>
        </AuthProvider>
    }
}

#[component]
fn NavBar() -> impl IntoView {
    let auth = expect_context::<AuthState>();

    view! {
        <nav class="navbar">
            <A href="/">"Shutter"</A>
            <Show when=move || auth.is_logged_in()>
                <A href="/create">"New post"</A>
                <A href="/profile">"Profile"</A>
            </Show>
            <LoginButton />
        </nav>
    }
}
