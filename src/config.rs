//! Editor-wide constants.
//!
//! Every fixed number the interaction core depends on lives in
//! [`EditorConfig`]. The defaults reproduce the stock editor; embedders can
//! override any subset from JSON.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunable constants for snapping, routing, hit-testing, and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Lattice spacing in model units used by snapping and the background grid.
    pub grid_size: f32,
    /// Stem length given to relationships that carry no `drop` of their own.
    pub default_drop: f32,
    /// Lower bound for `drop` while dragging a connector vertically.
    pub min_drop: f32,
    /// Side of the male square, diameter of the female circle, diagonal of the diamond.
    pub person_size: f32,
    /// Picking radius around a person's center, in model units.
    pub person_hit_radius: f32,
    /// Maximum distance from a connector segment that still counts as a hit.
    pub relationship_hit_threshold: f32,
    /// Window scale applied when zooming in.
    pub zoom_in_factor: f32,
    /// Window scale applied when zooming out.
    pub zoom_out_factor: f32,
    /// Extent of a separation/divorce glyph.
    pub glyph_size: f32,
    /// Horizontal distance between neighbouring glyphs.
    pub glyph_spacing: f32,
    /// Grid lines closer than this many screen pixels are not drawn.
    pub min_grid_pixel_spacing: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            default_drop: 40.0,
            min_drop: 20.0,
            person_size: 40.0,
            person_hit_radius: 30.0,
            relationship_hit_threshold: 5.0,
            zoom_in_factor: 0.9,
            zoom_out_factor: 1.1,
            glyph_size: 12.0,
            glyph_spacing: 8.0,
            min_grid_pixel_spacing: 4.0,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON object; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenogramError;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.grid_size, 20.0);
        assert_eq!(config.zoom_in_factor, 0.9);
        assert_eq!(config.zoom_out_factor, 1.1);
        assert!(config.min_drop <= config.default_drop);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json_str(r#"{ "grid_size": 25, "min_drop": 60 }"#).unwrap();
        assert_eq!(config.grid_size, 25.0);
        assert_eq!(config.min_drop, 60.0);
        assert_eq!(config.person_hit_radius, 30.0);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(EditorConfig::from_json_str("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = EditorConfig::from_json_str("grid_size = 20").unwrap_err();
        assert!(matches!(err, GenogramError::MalformedDocument(_)));
    }
}
