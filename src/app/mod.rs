//! Main application module

mod menus;
mod styles;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::pipeline::ConversionPipeline;
use crate::state::AppState;
use crate::ui::{status_bar, toolbar};
use crate::viewport::ViewportPanel;

/// Main application
pub struct MeshViewApp {
    state: AppState,
    viewport: ViewportPanel,
    /// When the watcher last polled
    last_poll: Instant,
}

impl MeshViewApp {
    pub fn new(cc: &eframe::CreationContext<'_>, initial_path: Option<PathBuf>) -> Self {
        let mut state = AppState::new(ConversionPipeline::system());

        styles::configure_styles(&cc.egui_ctx);

        // Initial synchronous conversion + load happens here, before the
        // first poll tick ever runs.
        if let Some(path) = initial_path {
            state.open_path(&path);
        }

        let mut viewport = ViewportPanel::new();

        // Initialize GL renderer if glow context is available
        if let Some(gl) = cc.gl.as_ref() {
            viewport.init_gl(gl);
        }

        Self {
            state,
            viewport,
            last_poll: Instant::now(),
        }
    }

    /// Schedule the poll tick as a recurring timer on the UI loop. The
    /// conversion subprocess runs synchronously inside the tick and simply
    /// delays the next repaint when it is slow.
    fn drive_watcher(&mut self, ctx: &egui::Context) {
        let interval = Duration::from_millis(self.state.settings.watch.poll_interval_ms.max(50));
        if self.last_poll.elapsed() >= interval {
            self.last_poll = Instant::now();
            self.state.tick();
        }
        ctx.request_repaint_after(interval.saturating_sub(self.last_poll.elapsed()));
    }
}

impl eframe::App for MeshViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drive_watcher(ctx);

        // ── Menu bar ──────────────────────────────────────────
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                menus::file_menu(ui, &mut self.state);
                menus::view_menu(ui, &mut self.state);
            });
        });

        // ── Toolbar ───────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                toolbar::show(ui, &mut self.state);
            });

        // ── Status bar ───────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(22.0)
            .frame(
                egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(8, 2)),
            )
            .show(ctx, |ui| {
                status_bar::show(ui, &self.state);
            });

        // ── Central panel: 3D viewport ───────────────────────
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport.show(ui, &mut self.state);
            });
    }
}
