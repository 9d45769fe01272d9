mod app;
mod config;
mod error;
mod event;
mod flow;
mod session;
mod theme;

use app::{AssistantApp, WINDOW_TITLE};
use config::AssistantConfig;
use eframe::egui;
use error::AssistantError;
use flow::FlowClient;
use std::sync::{mpsc, Arc};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,investor_assistant=debug")),
        )
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AssistantConfig::load()?;
    tracing::info!(?config, "configuration loaded");

    let flow = FlowClient::new(&config)?;
    tracing::info!(endpoint = %flow.endpoint(), "flow client ready");

    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("assistant-runtime")
        .build()?;

    let app = AssistantApp::new(tx, rx, Arc::new(flow), runtime.handle().clone());
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([960.0, 780.0])
            .with_min_inner_size([640.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |creation_context| {
            app.theme().apply_visuals(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(AssistantError::from)?;

    tracing::info!("window closed");
    Ok(())
}
