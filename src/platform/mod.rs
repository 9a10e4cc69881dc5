//! Platform abstraction layer
//!
//! Handles the browser side of things:
//! - Canvas lookup and 2D context
//! - Pointer input
//! - Offline worker registration

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Default canvas element id
pub const CANVAS_ID: &str = "canvas";

/// Context kind requested from the canvas
pub const CONTEXT_KIND: &str = "2d";

/// Convert a pointer's viewport Y into surface coordinates, given the top of
/// the surface's bounding box in the same viewport.
#[inline]
pub fn surface_y(client_y: f32, surface_top: f32) -> f32 {
    client_y - surface_top
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_y_is_relative_to_top() {
        assert_eq!(surface_y(350.0, 50.0), 300.0);
        assert_eq!(surface_y(10.0, 50.0), -40.0);
    }
}
