//! Global constants for bp-core

/// Default build plate size: width, depth, maximum height (mm)
pub const DEFAULT_BUILD_PLATE_SIZE: [f32; 3] = [235.0, 235.0, 250.0];

/// STL vertex comparison precision (multiply by this, then round to int)
pub const STL_VERTEX_PRECISION: f32 = 10000.0;

/// Default number of history snapshots kept (0 = unlimited)
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Smallest absolute scale accepted on any axis
pub const MIN_SCALE: f32 = 1e-4;

/// Rotation (radians) and scale differences below this count as unchanged
pub const ORIENTATION_EPSILON: f32 = 1e-5;

/// Object colors (RGB hex)
pub mod colors {
    /// Object outside the build volume
    pub const OUT_OF_PLATE: u32 = 0xef4444;
    /// Selected object
    pub const SELECTED: u32 = 0x6e405f;
    /// Hovered object
    pub const HOVERED: u32 = 0x6b7280;
    /// Any other object
    pub const DEFAULT: u32 = 0x9ca3af;

    /// Convert a hex color to RGBA floats
    pub fn to_rgba(hex: u32) -> [f32; 4] {
        [
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
            1.0,
        ]
    }
}
