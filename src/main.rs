mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::state`, `crate::viewer`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use meshview_lib::mesh_io;
pub use meshview_lib::pipeline;
pub use meshview_lib::source;
pub use meshview_lib::state;
pub use meshview_lib::viewer;
pub use meshview_lib::watch;

use std::path::PathBuf;

use app::MeshViewApp;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meshview=info,meshview_lib=info".into()),
        )
        .init();

    // Platform rendering-backend overrides (winit/EGL variables) pass
    // straight through to the visualization stack; only note them.
    if let Ok(backend) = std::env::var("WINIT_UNIX_BACKEND") {
        tracing::debug!("window backend override: {backend}");
    }

    let initial_path = parse_path_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("meshview — live mesh preview")
            .with_inner_size([1000.0, 720.0])
            .with_min_inner_size([500.0, 400.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "meshview",
        native_options,
        Box::new(move |cc| Ok(Box::new(MeshViewApp::new(cc, initial_path)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

/// One positional argument: the file to view. The source kind is inferred
/// from the extension, not flagged.
fn parse_path_arg() -> Option<PathBuf> {
    std::env::args_os().nth(1).map(PathBuf::from)
}
