//! Relationship routing.
//!
//! A relationship connector is drawn as two vertical stems hanging from the
//! endpoint people, joined at the bottom by a horizontal bridge:
//!
//! ```text
//!   [A]            (B)
//!    |              |      <- stems, `drop` long
//!    +------//------+      <- bridge with marker glyphs
//! ```
//!
//! [`route_relationship`] is a pure function of the two positions, the
//! relationship type, and the drop depth. The result carries everything the
//! renderer needs and doubles as the hit region.

use crate::config::EditorConfig;
use crate::model::{Family, Point, RelationshipType};
use crate::path::{generate_polyline_path, Segment};

/// Marker drawn across the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// `/`, bottom-left to top-right
    Slash,
    /// `\`, top-left to bottom-right
    Backslash,
    /// Both diagonals.
    Cross,
}

/// Dash pattern and marker glyphs for one relationship type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// SVG dash array in model units; empty means a solid line.
    pub dash: &'static [f32],
    pub glyphs: &'static [Glyph],
}

impl LineStyle {
    const SOLID: LineStyle = LineStyle { dash: &[], glyphs: &[] };

    const fn dashed(dash: &'static [f32]) -> Self {
        Self { dash, glyphs: &[] }
    }

    const fn marked(glyphs: &'static [Glyph]) -> Self {
        Self { dash: &[], glyphs }
    }

    pub fn is_solid(&self) -> bool {
        self.dash.is_empty()
    }

    /// Dash array formatted for an SVG `stroke-dasharray` attribute.
    pub fn dash_attribute(&self) -> String {
        self.dash
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Style table for couple-family types.
pub fn couple_style(kind: RelationshipType) -> Option<LineStyle> {
    use RelationshipType::*;
    Some(match kind {
        Married => LineStyle::SOLID,
        LegalSeparation => LineStyle::marked(&[Glyph::Slash]),
        Divorced => LineStyle::marked(&[Glyph::Slash, Glyph::Slash]),
        DivorcedRemarried => LineStyle::marked(&[Glyph::Slash, Glyph::Cross]),
        SeparationInFact => LineStyle::marked(&[Glyph::Backslash]),
        Engagement => LineStyle::dashed(&[8.0, 4.0]),
        ShortTerm => LineStyle::dashed(&[2.0, 4.0]),
        Temporary => LineStyle::dashed(&[8.0, 4.0, 2.0, 4.0]),
        OtherUnknown => LineStyle::dashed(&[2.0, 4.0, 2.0, 10.0]),
        _ => return None,
    })
}

/// Style table for parent-child and twin types.
pub fn child_style(kind: RelationshipType) -> Option<LineStyle> {
    use RelationshipType::*;
    Some(match kind {
        BiologicalChild => LineStyle::SOLID,
        FosterChild => LineStyle::dashed(&[2.0, 4.0]),
        AdoptedChild => LineStyle::dashed(&[4.0, 2.0, 4.0, 2.0]),
        FraternalTwins | IdenticalTwins => LineStyle::SOLID,
        _ => return None,
    })
}

/// Look up the style for any type in the table of its family.
pub fn style_for(kind: RelationshipType) -> LineStyle {
    let style = match kind.family() {
        Family::Couple => couple_style(kind),
        Family::ParentChild | Family::Twin => child_style(kind),
    };
    style.unwrap_or(LineStyle::SOLID)
}

/// A glyph placed on the bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMark {
    pub glyph: Glyph,
    pub center: Point,
    pub strokes: Vec<Segment>,
}

impl GlyphMark {
    fn new(glyph: Glyph, center: Point, size: f32) -> Self {
        let h = size / 2.0;
        let slash = Segment::new(center.offset(-h, h), center.offset(h, -h));
        let backslash = Segment::new(center.offset(-h, -h), center.offset(h, h));
        let strokes = match glyph {
            Glyph::Slash => vec![slash],
            Glyph::Backslash => vec![backslash],
            Glyph::Cross => vec![backslash, Segment::new(center.offset(h, -h), center.offset(-h, h))],
        };
        Self { glyph, center, strokes }
    }
}

/// Geometry of one routed connector.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedRelationship {
    pub left_stem: Segment,
    pub right_stem: Segment,
    pub bridge: Segment,
    pub style: LineStyle,
    pub glyphs: Vec<GlyphMark>,
}

impl RoutedRelationship {
    /// Stems then bridge.
    pub fn segments(&self) -> [Segment; 3] {
        [self.left_stem, self.right_stem, self.bridge]
    }

    /// Minimum distance from `point` to either stem or the bridge.
    pub fn distance_to(&self, point: Point) -> f32 {
        self.segments()
            .iter()
            .map(|s| s.distance_to(point))
            .fold(f32::INFINITY, f32::min)
    }

    /// Whether `point` lies strictly closer than `threshold` to the connector.
    pub fn hits(&self, point: Point, threshold: f32) -> bool {
        self.distance_to(point) < threshold
    }

    /// SVG path for stems and bridge.
    pub fn path_commands(&self) -> String {
        generate_polyline_path(&self.segments())
    }

    /// SVG path for all glyph strokes (empty when the type has none).
    pub fn glyph_commands(&self) -> String {
        generate_polyline_path(self.glyphs.iter().flat_map(|g| g.strokes.iter()))
    }
}

/// Route a connector between two people
///
/// Endpoints are ordered left to right first, so the shape does not depend
/// on which person the relationship lists first.
///
/// # Arguments
/// * `a`, `b` - Endpoint positions in model space
/// * `kind` - Relationship type (selects line style and glyphs)
/// * `drop` - Stem length
/// * `config` - Glyph size and spacing
pub fn route_relationship(
    a: Point,
    b: Point,
    kind: RelationshipType,
    drop: f32,
    config: &EditorConfig,
) -> RoutedRelationship {
    let (left, right) = if a.x > b.x { (b, a) } else { (a, b) };
    let bridge_y = left.y + drop;

    let left_stem = Segment::new(left, Point::new(left.x, left.y + drop));
    let right_stem = Segment::new(right, Point::new(right.x, right.y + drop));
    let bridge = Segment::new(Point::new(left.x, bridge_y), Point::new(right.x, bridge_y));

    let style = style_for(kind);
    let mid_x = (left.x + right.x) / 2.0;
    let count = style.glyphs.len() as f32;
    let glyphs = style
        .glyphs
        .iter()
        .enumerate()
        .map(|(i, &glyph)| {
            let dx = (i as f32 - (count - 1.0) / 2.0) * config.glyph_spacing;
            GlyphMark::new(glyph, Point::new(mid_x + dx, bridge_y), config.glyph_size)
        })
        .collect();

    RoutedRelationship {
        left_stem,
        right_stem,
        bridge,
        style,
        glyphs,
    }
}
