// Library crate: exposes testable modules for integration tests.
// GUI-specific modules (app, ui, GL rendering) remain in the binary crate.

pub mod fixtures;
pub mod mesh_io;
pub mod pipeline;
pub mod source;
pub mod state;
pub mod viewer;
pub mod watch;

/// Subset of viewport types usable headless (camera math, mesh data).
/// The GL renderer and the egui panel stay in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod mesh;
}
