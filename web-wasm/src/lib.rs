//! MagicPixels Web App (Leptos + WASM)

pub mod api;
mod app;
mod components;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    tracing::info!("MagicPixels starting");
    leptos::mount::mount_to_body(app::App);
}
