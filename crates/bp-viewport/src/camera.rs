//! Orbit camera and controls for the build plate viewport
//!
//! The scene is Y-up. Screen coordinates are pixels with the origin at the
//! top-left corner of the viewport.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::constants::camera as constants;
use crate::ray::Ray;

/// Camera uniform buffer data
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    /// Projection times view
    pub view_proj: [[f32; 4]; 4],
    /// World to view
    pub view: [[f32; 4]; 4],
    /// View to clip
    pub proj: [[f32; 4]; 4],
    /// Eye position (w = 1)
    pub eye: [f32; 4],
}

/// Viewport size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Viewport {
    /// Create a viewport of the given pixel size
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pixel position to normalized device coordinates
    pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            (screen.x / self.width) * 2.0 - 1.0,
            -(screen.y / self.height) * 2.0 + 1.0,
        )
    }

    /// Normalized device coordinates to pixel position
    pub fn from_ndc(&self, ndc: Vec2) -> Vec2 {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        Vec2::new(
            ndc.x * half_width + half_width,
            -(ndc.y * half_height) + half_height,
        )
    }
}

/// Orbit camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Orbit centre
    pub target: Vec3,
    /// Up direction
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Angle around the up axis
    pub yaw: f32,
    /// Elevation above the plate
    pub pitch: f32,
    /// Distance from eye to target
    pub distance: f32,
}

impl Camera {
    /// Create a new camera with default parameters
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: constants::FOV_DEGREES.to_radians(),
            aspect,
            near: constants::NEAR,
            far: constants::FAR,
            yaw: 0.0,
            pitch: 30.0_f32.to_radians(),
            distance: 5.0,
        };
        camera.update_position_from_orbit();
        camera
    }

    /// Camera framing a build plate of `plate_size` (width, depth, height)
    pub fn for_plate(plate_size: Vec3, aspect: f32) -> Self {
        let mut camera = Self::new(aspect);
        camera.near = 1.0;
        camera.far = 10000.0;
        let radius = plate_size.length() / 2.0;
        camera.fit_all(Vec3::new(0.0, plate_size.z / 4.0, 0.0), radius);
        camera
    }

    /// Update aspect ratio
    pub fn update_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Orbit the camera around the target
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch =
            (self.pitch + delta_pitch).clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
        self.update_position_from_orbit();
    }

    /// Pan the camera (move target)
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        let scale = self.distance * 0.002;
        self.target += right * (-delta_x * scale) + up * (delta_y * scale);
        self.update_position_from_orbit();
    }

    /// Zoom the camera
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(0.1, 10000.0);
        self.update_position_from_orbit();
    }

    fn update_position_from_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.position = self.target + Vec3::new(x, y, z);
    }

    /// Fit camera to show the given bounding sphere
    pub fn fit_all(&mut self, center: Vec3, radius: f32) {
        self.target = center;
        self.distance = (radius * 2.5).max(1.0);
        self.update_position_from_orbit();
    }

    /// Unit vector from eye to target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Projection times view
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get camera uniform data
    pub fn uniform(&self) -> CameraUniform {
        let view = self.view_matrix();
        let proj = self.projection_matrix();
        let view_proj = proj * view;

        CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            eye: [self.position.x, self.position.y, self.position.z, 1.0],
        }
    }

    /// World point to screen pixels; `z` is the NDC depth
    pub fn project(&self, world: Vec3, viewport: &Viewport) -> Vec3 {
        let ndc = self.view_projection().project_point3(world);
        viewport.from_ndc(ndc.truncate()).extend(ndc.z)
    }

    /// Screen pixels plus NDC depth back to a world point
    pub fn unproject(&self, screen: Vec3, viewport: &Viewport) -> Vec3 {
        let ndc = viewport.to_ndc(screen.truncate()).extend(screen.z);
        self.view_projection().inverse().project_point3(ndc)
    }

    /// Convert screen coordinates to world ray
    pub fn screen_to_ray(&self, screen: Vec2, viewport: &Viewport) -> Ray {
        let ndc = viewport.to_ndc(screen);
        let inv_view_proj = self.view_projection().inverse();

        // Depth range is 0..1
        let near_world = inv_view_proj.project_point3(ndc.extend(0.0));
        let far_world = inv_view_proj.project_point3(ndc.extend(1.0));

        Ray::new(near_world, far_world - near_world)
    }
}

/// Pointer-driven camera controls with an enable flag.
///
/// The flag is shared: a drag session holds a [`ControlsLease`] that keeps
/// the controls disabled until it is dropped.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    enabled: Arc<AtomicBool>,
    /// Radians per pixel of orbit drag
    pub rotate_speed: f32,
    /// Zoom steps per wheel notch
    pub zoom_speed: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
            rotate_speed: 0.005,
            zoom_speed: 1.0,
        }
    }
}

impl OrbitControls {
    /// Create enabled controls
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether pointer input currently moves the camera
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Disable the controls until the returned lease is dropped
    pub fn lease(&self) -> ControlsLease {
        self.enabled.store(false, Ordering::Release);
        tracing::trace!("Orbit controls disabled");
        ControlsLease {
            enabled: Arc::clone(&self.enabled),
        }
    }

    /// Orbit by a pointer delta in pixels. Returns whether the camera moved.
    pub fn orbit(&self, camera: &mut Camera, delta: Vec2) -> bool {
        if !self.is_enabled() {
            return false;
        }
        camera.orbit(-delta.x * self.rotate_speed, delta.y * self.rotate_speed);
        true
    }

    /// Pan by a pointer delta in pixels
    pub fn pan(&self, camera: &mut Camera, delta: Vec2) -> bool {
        if !self.is_enabled() {
            return false;
        }
        camera.pan(delta.x, delta.y);
        true
    }

    /// Zoom by wheel notches
    pub fn zoom(&self, camera: &mut Camera, notches: f32) -> bool {
        if !self.is_enabled() {
            return false;
        }
        camera.zoom(notches * self.zoom_speed);
        true
    }
}

/// Keeps [`OrbitControls`] disabled while alive; re-enables them on drop,
/// including when a drag is abandoned.
#[derive(Debug)]
pub struct ControlsLease {
    enabled: Arc<AtomicBool>,
}

impl Drop for ControlsLease {
    fn drop(&mut self) {
        self.enabled.store(true, Ordering::Release);
        tracing::trace!("Orbit controls enabled");
    }
}
