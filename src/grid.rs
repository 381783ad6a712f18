use crate::model::Point;
use crate::viewport::Viewport;

/// Round a scalar to the nearest multiple of `grid_size`.
///
/// Halfway values round up (towards +∞) so the result commutes with
/// translation by whole grid cells, negative coordinates included.
pub fn snap_value(value: f32, grid_size: f32) -> f32 {
    (value / grid_size + 0.5).floor() * grid_size
}

/// Quantize a model-space point to the grid lattice, each axis independently.
pub fn snap(point: Point, grid_size: f32) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

/// Generate SVG path commands for the background grid
///
/// Emits one line per lattice column and row intersecting the viewport's
/// window, in model coordinates, so the drawn grid coincides exactly with
/// the positions [`snap`] produces.
///
/// # Arguments
/// * `viewport` - Current viewport (window rectangle and screen size)
/// * `spacing` - Lattice spacing in model units
/// * `min_pixel_spacing` - Lines closer than this on screen are not drawn
///
/// # Returns
/// SVG path commands string (e.g., "M 0 0 L 0 600 M 20 0 L 20 600...")
pub fn generate_grid_commands(viewport: &Viewport, spacing: f32, min_pixel_spacing: f32) -> String {
    let window = viewport.window();
    let (scale_x, scale_y) = viewport.scale();

    if spacing <= 0.0 || spacing / scale_x < min_pixel_spacing || spacing / scale_y < min_pixel_spacing {
        return String::new();
    }

    let top = window.y;
    let bottom = window.y + window.height;
    let left = window.x;
    let right = window.x + window.width;

    let mut commands = String::with_capacity(10000);

    // Vertical lines
    let mut x = first_line(left, spacing);
    while x <= right {
        if !commands.is_empty() {
            commands.push(' ');
        }
        commands.push_str(&format!("M {} {} L {} {}", x, top, x, bottom));
        x += spacing;
    }

    // Horizontal lines
    let mut y = first_line(top, spacing);
    while y <= bottom {
        if !commands.is_empty() {
            commands.push(' ');
        }
        commands.push_str(&format!("M {} {} L {} {}", left, y, right, y));
        y += spacing;
    }

    commands
}

/// First lattice coordinate at or after `start`. Adding `0.0` turns a
/// negative zero into a positive one so it formats as "0".
fn first_line(start: f32, spacing: f32) -> f32 {
    (start / spacing).ceil() * spacing + 0.0
}
