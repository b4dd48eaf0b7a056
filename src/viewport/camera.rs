use glam::{Mat4, Vec3, Vec4};

use super::mesh::Aabb;

/// Preset viewing directions, mapped to the toolbar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    /// Top-down, looking along -Y
    Xy,
    /// Front, looking along -Z
    Xz,
    /// Side, looking along -X
    Yz,
}

/// Arc-ball camera for the 3D viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 4.0,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.05, 5000.0);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        let right = self.right_vector();
        let up = self.up_vector();
        self.target += right * dx + up * dy;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Orient the camera to one of the principal planes, keeping the
    /// current target and distance.
    pub fn apply_preset(&mut self, preset: ViewPreset) {
        match preset {
            ViewPreset::Xy => {
                self.yaw = 0.0;
                self.pitch = 1.5; // ~86 degrees, close to straight down
            }
            ViewPreset::Xz => {
                self.yaw = 0.0;
                self.pitch = 0.0;
            }
            ViewPreset::Yz => {
                self.yaw = std::f32::consts::FRAC_PI_2;
                self.pitch = 0.0;
            }
        }
    }

    /// Center the view on a bounding box and back off far enough to see
    /// all of it.
    pub fn fit(&mut self, aabb: &Aabb) {
        self.target = aabb.center();
        let extent = aabb.extent().max(0.01);
        self.distance = (extent * 1.4).clamp(0.05, 5000.0);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let far = (self.distance * 10.0).max(200.0);
        Mat4::perspective_rh_gl(self.fov, aspect, 0.01, far)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    fn right_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        fwd.cross(Vec3::Y).normalize_or_zero()
    }

    fn up_vector(&self) -> Vec3 {
        let fwd = (self.target - self.eye_position()).normalize_or_zero();
        let right = self.right_vector();
        right.cross(fwd).normalize_or_zero()
    }

    /// Project a 3D point to 2D screen coords (software wireframe fallback
    /// and overlay text)
    pub fn project(&self, point: [f32; 3], rect: egui::Rect) -> Option<egui::Pos2> {
        let aspect = rect.width() / rect.height();
        let vp = self.view_projection(aspect);
        let p = vp * Vec4::new(point[0], point[1], point[2], 1.0);
        if p.w <= 0.0 {
            return None;
        }
        let ndc = p.truncate() / p.w;
        let screen_x = rect.center().x + ndc.x * rect.width() * 0.5;
        let screen_y = rect.center().y - ndc.y * rect.height() * 0.5;
        Some(egui::pos2(screen_x, screen_y))
    }
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_keep_target_and_distance() {
        let mut cam = ArcBallCamera::new();
        cam.target = Vec3::new(1.0, 2.0, 3.0);
        cam.distance = 7.5;

        cam.apply_preset(ViewPreset::Yz);
        assert_eq!(cam.yaw, std::f32::consts::FRAC_PI_2);
        assert_eq!(cam.pitch, 0.0);
        assert_eq!(cam.target, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.distance, 7.5);
    }

    #[test]
    fn fit_centers_on_bbox() {
        let mut cam = ArcBallCamera::new();
        let bb = Aabb {
            min: Vec3::new(-10.0, 0.0, -10.0),
            max: Vec3::new(10.0, 20.0, 10.0),
        };
        cam.fit(&bb);
        assert_eq!(cam.target, Vec3::new(0.0, 10.0, 0.0));
        assert!(cam.distance > bb.extent());
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = ArcBallCamera::new();
        cam.rotate(0.0, 10_000.0);
        assert!(cam.pitch <= 1.5);
        cam.rotate(0.0, -20_000.0);
        assert!(cam.pitch >= -1.5);
    }
}
