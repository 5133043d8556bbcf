mod alert;
mod api;
mod app;
mod config;

pub mod components {
    pub mod report_incident;
    pub mod vehicle_board;
}

use app::App;
use leptos::view;

/// Non-fatal diagnostic for failures the views absorb silently
/// (background refreshes that keep showing the last good data).
pub(crate) fn console_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}

fn main() {
    leptos::mount_to_body(|| view! { <App/> });
}
