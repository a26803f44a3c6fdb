mod app;
mod config;
mod domain;
mod infra;
mod logging;
mod ui;
mod usecase;

#[cfg(test)]
mod tests;

use crate::app::App;

fn main() {
    if let Err(err) = logging::init_logging() {
        eprintln!("{err:#}");
    }

    launch();
}

#[cfg(feature = "desktop")]
fn launch() {
    let app_config = config::AppConfig::default();
    let mut desktop_config = dioxus::desktop::Config::new().with_window(
        dioxus::desktop::WindowBuilder::new().with_title(app_config.window_title.clone()),
    );
    match config::default_webview_data_dir() {
        Ok(webview_data_dir) => {
            desktop_config = desktop_config.with_data_directory(webview_data_dir);
        }
        Err(err) => {
            tracing::warn!(error = %err, "falling back to the default webview data directory");
        }
    }

    dioxus::LaunchBuilder::desktop()
        .with_cfg(desktop_config)
        .launch(App);
}

#[cfg(not(feature = "desktop"))]
fn launch() {
    dioxus::launch(App);
}
