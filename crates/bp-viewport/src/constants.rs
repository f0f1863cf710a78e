//! Global constants for bp-viewport

/// Gizmo handle dimensions, in gizmo units (1 unit = configured scale)
pub mod gizmo {
    /// Translation arrow length
    pub const ARROW_LENGTH: f32 = 1.0;
    /// Pick radius around an arrow shaft
    pub const ARROW_PICK_RADIUS: f32 = 0.08;
    /// Distance of a scaling sphere from the origin
    pub const SPHERE_DISTANCE: f32 = 1.2;
    /// Scaling sphere radius
    pub const SPHERE_RADIUS: f32 = 0.1;
    /// Inner edge of a plane slider quad
    pub const SLIDER_OFFSET: f32 = 0.3;
    /// Edge length of a plane slider quad
    pub const SLIDER_SIZE: f32 = 0.25;
    /// Rotation ring radius
    pub const RING_RADIUS: f32 = 0.65;
    /// Pick tolerance around a ring
    pub const RING_PICK_THICKNESS: f32 = 0.06;
    /// Gizmo units of sphere drag that double the scale
    pub const SCALE_DOUBLING_DISTANCE: f32 = 1.0;
    /// Smallest scale factor a sphere drag produces
    pub const MIN_SCALE_FACTOR: f32 = 1e-3;

    /// Default axis colors (X, Y, Z)
    pub const AXIS_COLORS: [[f32; 4]; 3] = [
        [1.0, 0.125, 0.376, 1.0],
        [0.125, 0.875, 0.502, 1.0],
        [0.125, 0.502, 1.0, 1.0],
    ];
    /// Default hovered handle color
    pub const HOVERED_COLOR: [f32; 4] = [1.0, 1.0, 0.251, 1.0];
}

/// Camera defaults
pub mod camera {
    /// Default vertical field of view in degrees
    pub const FOV_DEGREES: f32 = 40.0;
    /// Near clipping plane
    pub const NEAR: f32 = 0.1;
    /// Far clipping plane
    pub const FAR: f32 = 100000.0;
    /// Ray/plane denominators below this are treated as parallel
    pub const PARALLEL_EPSILON: f32 = 1e-6;
}

/// Corner marker appearance
pub mod markers {
    /// Marker length as a fraction of the smallest box dimension
    pub const LENGTH_FRACTION: f32 = 0.3;
    /// Lift of the bottom markers above the plate
    pub const BOTTOM_OFFSET: f32 = 0.1;
}
