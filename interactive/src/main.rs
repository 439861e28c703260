mod admin;
mod api;
mod app;
mod assignments;
mod auth;
mod certificates;
mod courses;
mod feedback;
mod modules;
mod profile;
mod widgets;

use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    // Mount into the host page's container if it has one
    let mount_point = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("learnhub-app"));

    match mount_point {
        Some(el) => {
            let html_el: web_sys::HtmlElement = el.unchecked_into();
            leptos::mount::mount_to(html_el, app::App).forget();
        }
        None => {
            tracing::debug!("no #learnhub-app element, mounting to body");
            leptos::mount::mount_to_body(app::App);
        }
    }
}
