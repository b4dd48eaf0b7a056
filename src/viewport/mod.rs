//! 3D viewport panel with OpenGL rendering

mod gl_renderer;
pub use meshview_lib::viewport::{camera, mesh};

use std::sync::{Arc, Mutex};

use egui::Ui;

use crate::state::AppState;
use camera::ArcBallCamera;
use gl_renderer::GlRenderer;

/// 3D viewport panel with OpenGL rendering
pub struct ViewportPanel {
    gl_renderer: Option<Arc<Mutex<GlRenderer>>>,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self { gl_renderer: None }
    }

    /// Initialize GL renderer (must be called with a GL context)
    pub fn init_gl(&mut self, gl: &glow::Context) {
        let renderer = GlRenderer::new(gl);
        self.gl_renderer = Some(Arc::new(Mutex::new(renderer)));
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        // ── Camera controls ─────────────────────────────
        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            state.camera.rotate(delta.x * 0.5, delta.y * 0.5);
        }

        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            let speed = state.camera.distance * 0.002;
            state.camera.pan(delta.x * speed, delta.y * speed);
        }

        // ── Scroll zoom ─────────────────────────────
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                state.camera.zoom(scroll * 0.01);
            }
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        // ── GL rendering ────────────────────────────────────────
        self.render_gl(ui, rect, state);

        // ── Overlays ─────────────────────────────────────
        self.draw_overlays(ui, rect, state);
    }

    fn render_gl(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        if let Some(gl_renderer) = &self.gl_renderer {
            let renderer_clone = gl_renderer.clone();
            let camera = state.camera;

            let mesh_data = state.viewer.mesh().clone();
            let edges = state.viewer.wireframe().clone();
            let version = state.viewer.version();

            let grid_settings = state.settings.grid.clone();
            let axes_settings = state.settings.axes.clone();
            let bg_color = state.settings.viewport.background_color;
            let display_mode = state.settings.display_mode;

            let callback = egui::PaintCallback {
                rect,
                callback: Arc::new(eframe::egui_glow::CallbackFn::new(move |info, painter| {
                    let gl = painter.gl();

                    let clip = info.clip_rect_in_pixels();
                    let viewport = [
                        clip.left_px as f32,
                        clip.from_bottom_px as f32,
                        clip.width_px as f32,
                        clip.height_px as f32,
                    ];

                    if let Ok(mut r) = renderer_clone.lock() {
                        r.update_grid(gl, &grid_settings);
                        r.update_axes(gl, &axes_settings);
                        r.sync_scene(gl, &mesh_data, &edges, version);

                        let render_params = gl_renderer::RenderParams {
                            viewport,
                            grid_visible: grid_settings.visible,
                            axes_visible: axes_settings.visible,
                            axes_thickness: axes_settings.thickness,
                            bg_color,
                            show_solid: display_mode.show_solid(),
                            show_wireframe: display_mode.show_wireframe(),
                        };
                        r.paint(gl, &camera, &render_params);
                    }
                })),
            };

            ui.painter().add(callback);
        } else {
            // Fallback: software wireframe rendering
            paint_wireframe_fallback(ui, rect, &state.camera, state);
        }
    }

    fn draw_overlays(&self, ui: &mut Ui, rect: egui::Rect, state: &AppState) {
        let painter = ui.painter_at(rect);

        self.draw_camera_info(&painter, rect, &state.camera);

        if state.viewer.mesh_path().is_none() {
            painter.text(
                egui::pos2(rect.center().x, rect.bottom() - 20.0),
                egui::Align2::CENTER_BOTTOM,
                "LMB drag: rotate · RMB drag: pan · scroll: zoom · File ▸ Open to watch a model",
                egui::FontId::proportional(11.0),
                egui::Color32::from_rgb(100, 100, 110),
            );
        }
    }

    fn draw_camera_info(&self, painter: &egui::Painter, rect: egui::Rect, camera: &ArcBallCamera) {
        let overlay_rect = egui::Rect::from_min_size(
            egui::pos2(rect.right() - 140.0, rect.top() + 4.0),
            egui::vec2(136.0, 44.0),
        );
        painter.rect_filled(
            overlay_rect,
            4.0,
            egui::Color32::from_rgba_premultiplied(0, 0, 0, 140),
        );
        painter.text(
            overlay_rect.min + egui::vec2(6.0, 4.0),
            egui::Align2::LEFT_TOP,
            format!(
                "Dist: {:.1}\nYaw: {:.0}  Pitch: {:.0}",
                camera.distance,
                camera.yaw.to_degrees(),
                camera.pitch.to_degrees(),
            ),
            egui::FontId::monospace(10.0),
            egui::Color32::from_rgb(160, 160, 170),
        );
    }
}

/// Software fallback used when no GL context is available: project the
/// precomputed edge overlay through the camera and draw 2D segments.
fn paint_wireframe_fallback(ui: &mut Ui, rect: egui::Rect, camera: &ArcBallCamera, state: &AppState) {
    let painter = ui.painter_at(rect);
    let bg = state.settings.viewport.background_color;
    painter.rect_filled(
        rect,
        0.0,
        egui::Color32::from_rgb(bg[0], bg[1], bg[2]),
    );

    let edges = state.viewer.wireframe();
    let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgb(190, 195, 205));

    for segment in edges.vertices.chunks_exact(14) {
        let a = [segment[0], segment[1], segment[2]];
        let b = [segment[7], segment[8], segment[9]];
        if let (Some(pa), Some(pb)) = (camera.project(a, rect), camera.project(b, rect)) {
            painter.line_segment([pa, pb], stroke);
        }
    }
}
