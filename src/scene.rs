//! Scene rendering for the genogram canvas.
//!
//! [`render_scene`] turns the chart, the interaction state, and a palette
//! into a [`Scene`]: plain path strings and flags that a UI layer can draw
//! as-is. It holds no state of its own, so calling it after every mutation
//! always yields a scene that matches the model.
//!
//! [`SceneBinding`] pushes a scene into Slint `VecModel`s. Each model is bound
//! once with a constructor closure that builds the UI's row type:
//!
//! ```ignore
//! let people = Rc::new(VecModel::<PersonRow>::default());
//! let mut binding = SceneBinding::new();
//! binding.bind_people(people.clone(), |item| PersonRow {
//!     id: item.id.as_str().into(),
//!     path: item.path_commands.as_str().into(),
//!     selected: item.selected,
//! });
//! window.set_people(ModelRc::from(people));
//!
//! binding.sync(&render_scene(&genogram, &state, &ScenePalette::default()));
//! ```

use slint::{Color, Model, VecModel};
use std::marker::PhantomData;
use std::rc::Rc;
use tracing::warn;

use crate::grid::generate_grid_commands;
use crate::hit_test::Rect;
use crate::interaction::InteractionState;
use crate::model::{Gender, Genogram, Person, PersonId, Point, RelationshipId, RelationshipType, SexualOrientation};
use crate::path::{generate_circle_path, generate_polygon_path};
use crate::router::route_relationship;

/// Outline used to draw a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonShape {
    Square,
    Circle,
    Diamond,
}

impl PersonShape {
    pub fn for_gender(gender: Gender) -> Self {
        match gender {
            Gender::Male => PersonShape::Square,
            Gender::Female => PersonShape::Circle,
            Gender::NonBinary | Gender::Other => PersonShape::Diamond,
        }
    }

    /// SVG outline of this shape centered on `center`, `size` units across.
    pub fn path_commands(self, center: Point, size: f32) -> String {
        let h = size / 2.0;
        match self {
            PersonShape::Square => generate_polygon_path(&[
                center.offset(-h, -h),
                center.offset(h, -h),
                center.offset(h, h),
                center.offset(-h, h),
            ]),
            PersonShape::Circle => generate_circle_path(center, h),
            PersonShape::Diamond => generate_polygon_path(&[
                center.offset(-h, 0.0),
                center.offset(0.0, -h),
                center.offset(h, 0.0),
                center.offset(0.0, h),
            ]),
        }
    }
}

/// Downward triangle marking a non-straight orientation, half a person across.
pub fn orientation_marker(center: Point, person_size: f32) -> String {
    let h = person_size / 4.0;
    generate_polygon_path(&[
        center.offset(0.0, h),
        center.offset(h, -h),
        center.offset(-h, -h),
    ])
}

/// Colors used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePalette {
    pub stroke: Color,
    pub selected: Color,
    /// Relationship glyphs and orientation markers.
    pub accent: Color,
    pub grid: Color,
}

impl Default for ScenePalette {
    fn default() -> Self {
        Self {
            stroke: Color::from_rgb_u8(0x22, 0x22, 0x22),
            selected: Color::from_rgb_u8(100, 180, 255),
            accent: Color::from_rgb_u8(0x88, 0x88, 0x88),
            grid: Color::from_rgb_u8(0xe0, 0xe0, 0xe0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonItem {
    pub id: PersonId,
    pub shape: PersonShape,
    pub position: Point,
    pub path_commands: String,
    /// Present when the orientation is not straight.
    pub marker_commands: Option<String>,
    pub label: String,
    pub color: Color,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipItem {
    pub id: RelationshipId,
    pub kind: RelationshipType,
    pub path_commands: String,
    /// `stroke-dasharray` value; empty for solid lines.
    pub dash_array: String,
    pub glyph_commands: String,
    pub color: Color,
    pub selected: bool,
}

/// Everything visible on the canvas, in model space except the marquee.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Empty when the grid would be too dense to draw.
    pub grid_commands: String,
    pub grid_color: Color,
    pub accent_color: Color,
    /// Drawn first, under the people.
    pub relationships: Vec<RelationshipItem>,
    pub people: Vec<PersonItem>,
    /// Screen-space rubber band while a marquee is active.
    pub marquee: Option<Rect>,
}

/// Build the scene for the current chart and interaction state.
///
/// Relationships whose endpoints cannot be resolved are left out.
pub fn render_scene(genogram: &Genogram, state: &InteractionState, palette: &ScenePalette) -> Scene {
    let config = state.config();
    let selection = state.selection();

    let relationships = genogram
        .relationships()
        .filter_map(|rel| {
            let (a, b) = match genogram.endpoints(rel) {
                Ok(endpoints) => endpoints,
                Err(err) => {
                    warn!("not drawing relationship: {err}");
                    return None;
                }
            };
            let routed = route_relationship(a.position, b.position, rel.kind, rel.meta.drop, config);
            let selected = selection.is_relationship_selected(rel.id());
            Some(RelationshipItem {
                id: rel.id().clone(),
                kind: rel.kind,
                path_commands: routed.path_commands(),
                dash_array: routed.style.dash_attribute(),
                glyph_commands: routed.glyph_commands(),
                color: if selected { palette.selected } else { palette.stroke },
                selected,
            })
        })
        .collect();

    let people = genogram
        .people()
        .map(|person| person_item(person, selection.contains(person.id()), config.person_size, palette))
        .collect();

    Scene {
        grid_commands: generate_grid_commands(
            state.viewport(),
            config.grid_size,
            config.min_grid_pixel_spacing,
        ),
        grid_color: palette.grid,
        accent_color: palette.accent,
        relationships,
        people,
        marquee: state.marquee_rect(),
    }
}

fn person_item(person: &Person, selected: bool, size: f32, palette: &ScenePalette) -> PersonItem {
    let shape = PersonShape::for_gender(person.gender);
    let marker_commands = (person.sexual_orientation != SexualOrientation::Straight)
        .then(|| orientation_marker(person.position, size));

    PersonItem {
        id: person.id().clone(),
        shape,
        position: person.position,
        path_commands: shape.path_commands(person.position, size),
        marker_commands,
        label: person.display_name(),
        color: if selected { palette.selected } else { palette.stroke },
        selected,
    }
}

/// Internal trait for syncing scene rows into a Slint model.
trait RowSyncer<T> {
    fn sync(&self, items: &[T]);
}

struct ConcreteRowSyncer<T, P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
    _item: PhantomData<fn(&T)>,
}

impl<T, P, F> RowSyncer<T> for ConcreteRowSyncer<T, P, F>
where
    P: Clone + 'static,
    F: Fn(&T) -> P,
{
    fn sync(&self, items: &[T]) {
        // Update existing rows or add new ones
        for (i, item) in items.iter().enumerate() {
            let row = (self.constructor)(item);
            if i < self.model.row_count() {
                self.model.set_row_data(i, row);
            } else {
                self.model.push(row);
            }
        }
        // Remove excess rows
        while self.model.row_count() > items.len() {
            self.model.remove(self.model.row_count() - 1);
        }
    }
}

/// Keeps Slint models in step with rendered scenes.
#[derive(Default)]
pub struct SceneBinding {
    people: Option<Box<dyn RowSyncer<PersonItem>>>,
    relationships: Option<Box<dyn RowSyncer<RelationshipItem>>>,
}

impl SceneBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the people model; `constructor` builds one row per person.
    pub fn bind_people<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&PersonItem) -> P + 'static,
    {
        self.people = Some(Box::new(ConcreteRowSyncer {
            model,
            constructor,
            _item: PhantomData,
        }));
    }

    /// Bind the relationship model; `constructor` builds one row per connector.
    pub fn bind_relationships<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&RelationshipItem) -> P + 'static,
    {
        self.relationships = Some(Box::new(ConcreteRowSyncer {
            model,
            constructor,
            _item: PhantomData,
        }));
    }

    /// Push `scene` into every bound model, updating rows in place.
    pub fn sync(&self, scene: &Scene) {
        if let Some(syncer) = &self.people {
            syncer.sync(&scene.people);
        }
        if let Some(syncer) = &self.relationships {
            syncer.sync(&scene.relationships);
        }
    }
}
