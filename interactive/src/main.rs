mod api;
mod app;
mod auth;
mod comments;
mod config;
mod dom;
mod error;
mod feed;
mod like_state;
mod likes;
mod logging;
mod posts;
mod profile;
mod session;

use wasm_bindgen::JsCast;

use crate::app::ShutterApp;
use crate::config::ClientConfig;

fn main() {
    console_error_panic_hook::set_once();

    let config = ClientConfig::current();
    logging::init(config.log_level);
    tracing::debug!(api_base = %config.api_base, "starting");

    let document = web_sys::window()
        .expect("no window")
        .document()
        .expect("no document");

    // Mount into the host page's slot if it has one, otherwise take the body.
    match document.get_element_by_id("shutter-app") {
        Some(el) => {
            let html_el: web_sys::HtmlElement = el.unchecked_into();
            leptos::mount::mount_to(html_el, ShutterApp).forget();
        }
        None => leptos::mount::mount_to_body(ShutterApp),
    }
}
