//! SafeDocs desktop client - main entry point

mod api;
mod app;
mod error;
mod session;
mod settings;
mod upload;
mod utils;

#[cfg(test)]
mod test_support;

use app::SafeDocsApp;
use eframe::egui;
use settings::Settings;
use tracing::{error, info};

/// Initialize file + stderr logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "safedocs-client.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,safedocs_client=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();

    guard
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = settings::data_dir();
    std::fs::create_dir_all(&data_dir).ok();

    let _log_guard = init_logging(&data_dir);
    info!(version = env!("CARGO_PKG_VERSION"), "SafeDocs client starting");

    let settings = Settings::load(&data_dir);
    settings.save(&data_dir);

    let runtime = tokio::runtime::Runtime::new().map_err(|e| {
        error!(error = %e, "Failed to start async runtime");
        e
    })?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 680.0])
            .with_min_inner_size([520.0, 500.0])
            .with_title("SafeDocs"),
        ..Default::default()
    };

    eframe::run_native(
        "SafeDocs",
        options,
        Box::new(move |cc| Box::new(SafeDocsApp::new(cc, settings, data_dir, runtime))),
    )?;

    info!("SafeDocs client exiting");
    Ok(())
}
