pub mod api;
pub mod app;
mod browser;
mod components;
pub mod config;
pub mod error;
pub mod logging;
pub mod optimizer;
mod pages;
pub mod session;
pub mod storage;

use leptos::prelude::*;

use app::App;
use config::AppConfig;

/// Browser entry point: configure logging and mount the dashboard.
pub fn run() {
    let config = AppConfig::from_env();
    logging::init(&config.log_level);
    tracing::info!("Starting dashboard against {}", config.api_base_url);

    leptos::mount::mount_to_body(move || view! { <App config=config /> });
}
