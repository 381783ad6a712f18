//! Pointer and keyboard state machine.
//!
//! One [`Gesture`] is active at a time. It is chosen at pointer-down, updated
//! on every pointer-move as a pure function of what was recorded at
//! pointer-down and the current pointer, and dropped at pointer-up. Nothing is
//! accumulated between moves, so a long drag cannot drift.
//!
//! Pointer-down classification, first match wins:
//!
//! | Condition                              | Gesture            |
//! |----------------------------------------|--------------------|
//! | control held, empty canvas             | `AddMenu`          |
//! | shift held, left button, empty canvas  | `Marquee`          |
//! | on a person                            | `NodeDrag`         |
//! | on a relationship connector            | `RelationshipDrag` |
//! | empty canvas                           | `Pan`              |
//!
//! Shift on a person toggles its selection and starts no gesture.

use slint::platform::{Key, PointerEventButton};
use slint::SharedString;
use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::grid::{snap, snap_value};
use crate::hit_test::{find_person_at, find_relationship_at, people_in_rect, Rect};
use crate::model::{
    Family, Gender, Genogram, Person, PersonId, Point, Relationship, RelationshipId,
    RelationshipType,
};
use crate::selection::SelectionManager;
use crate::viewport::{ViewWindow, Viewport, ZoomDirection};

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, control: false, alt: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, control: false, alt: false };
    pub const CONTROL: Modifiers = Modifiers { shift: false, control: true, alt: false };
}

/// Keyboard commands, independent of the active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Marry the two selected people.
    Link,
    /// Remove the selected people and relationship.
    Delete,
    /// Clear the selection.
    Cancel,
}

impl Command {
    /// Map the text of a key event to a command.
    pub fn from_key_text(text: &str) -> Option<Self> {
        let is = |key: Key| SharedString::from(key).as_str() == text;
        match text {
            "l" | "L" => Some(Command::Link),
            _ if is(Key::Delete) || is(Key::Backspace) => Some(Command::Delete),
            _ if is(Key::Escape) => Some(Command::Cancel),
            _ => None,
        }
    }
}

/// Where a person will be placed once a gender is picked from the add menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPlacement {
    /// Where the menu opened, in screen space.
    pub screen: Point,
    /// Snapped model-space position of the new person.
    pub position: Point,
}

/// The active pointer gesture.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    AddMenu,
    Marquee {
        anchor_screen: Point,
        anchor_model: Point,
        current_screen: Point,
    },
    NodeDrag {
        /// Pointer-to-person offset for every dragged person.
        offsets: Vec<(PersonId, Point)>,
    },
    RelationshipDrag {
        relationship: RelationshipId,
        anchor: Point,
        start_positions: [(PersonId, Point); 2],
        start_drop: f32,
    },
    Pan {
        anchor_screen: Point,
        saved_window: ViewWindow,
    },
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::AddMenu => "add-menu",
            Gesture::Marquee { .. } => "marquee",
            Gesture::NodeDrag { .. } => "node-drag",
            Gesture::RelationshipDrag { .. } => "relationship-drag",
            Gesture::Pan { .. } => "pan",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

/// Editor interaction state: viewport, selection, and the active gesture.
///
/// The chart itself is not owned here; every event handler borrows it.
#[derive(Debug, Clone)]
pub struct InteractionState {
    config: EditorConfig,
    viewport: Viewport,
    selection: SelectionManager,
    gesture: Gesture,
    pending: Option<PendingPlacement>,
}

impl InteractionState {
    pub fn new(config: EditorConfig, screen_width: f32, screen_height: f32) -> Self {
        Self {
            config,
            viewport: Viewport::new(screen_width, screen_height),
            selection: SelectionManager::new(),
            gesture: Gesture::Idle,
            pending: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionManager {
        &mut self.selection
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn pending_placement(&self) -> Option<&PendingPlacement> {
        self.pending.as_ref()
    }

    /// Resize the screen area. The visible model rectangle is kept.
    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        self.viewport.resize_screen(screen_width, screen_height);
    }

    /// Drop selection, gesture, and any pending placement.
    pub fn reset(&mut self) {
        self.selection.clear();
        self.gesture = Gesture::Idle;
        self.pending = None;
    }

    /// Screen-space marquee rectangle while a marquee is being dragged.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::Marquee { anchor_screen, current_screen, .. } => {
                Some(Rect::from_corners(*anchor_screen, *current_screen))
            }
            _ => None,
        }
    }

    // === Pointer events ===

    pub fn pointer_down(
        &mut self,
        genogram: &mut Genogram,
        screen: Point,
        button: PointerEventButton,
        modifiers: Modifiers,
    ) {
        self.pending = None;
        let point = self.viewport.screen_to_model(screen);

        let person = find_person_at(genogram, point, self.config.person_hit_radius);
        let relationship = match person {
            Some(_) => None,
            None => find_relationship_at(genogram, point, &self.config),
        };

        self.gesture = match (person, relationship) {
            (None, None) if modifiers.control => {
                self.pending = Some(PendingPlacement {
                    screen,
                    position: snap(point, self.config.grid_size),
                });
                Gesture::AddMenu
            }
            (None, None) if modifiers.shift && button == PointerEventButton::Left => {
                Gesture::Marquee {
                    anchor_screen: screen,
                    anchor_model: point,
                    current_screen: screen,
                }
            }
            (Some(id), _) if modifiers.shift => {
                self.selection.toggle(&id);
                Gesture::Idle
            }
            (Some(id), _) => self.begin_node_drag(genogram, id, point),
            (None, Some(id)) => self.begin_relationship_drag(genogram, id, point),
            (None, None) => {
                self.selection.clear();
                Gesture::Pan {
                    anchor_screen: screen,
                    saved_window: self.viewport.window(),
                }
            }
        };

        if !self.gesture.is_idle() {
            debug!(gesture = self.gesture.name(), x = point.x, y = point.y, "gesture started");
        }
    }

    fn begin_node_drag(&mut self, genogram: &Genogram, id: PersonId, point: Point) -> Gesture {
        self.selection.handle_interaction(&id, false);

        let dragged = if self.selection.len() > 1 {
            self.selection.sorted_people()
        } else {
            vec![id]
        };

        let offsets = dragged
            .into_iter()
            .filter_map(|id| {
                let position = genogram.person(&id)?.position;
                Some((id, point - position))
            })
            .collect();

        Gesture::NodeDrag { offsets }
    }

    fn begin_relationship_drag(
        &mut self,
        genogram: &Genogram,
        id: RelationshipId,
        point: Point,
    ) -> Gesture {
        let resolved = genogram.relationship(&id).and_then(|rel| {
            let (a, b) = genogram.endpoints(rel).ok()?;
            Some((
                [
                    (a.id().clone(), a.position),
                    (b.id().clone(), b.position),
                ],
                rel.meta.drop,
            ))
        });

        self.selection.select_relationship(id.clone());

        match resolved {
            Some((start_positions, start_drop)) => Gesture::RelationshipDrag {
                relationship: id,
                anchor: point,
                start_positions,
                start_drop,
            },
            None => Gesture::Idle,
        }
    }

    /// Apply a pointer move to the active gesture. A no-op when idle.
    pub fn pointer_move(&mut self, genogram: &mut Genogram, screen: Point) {
        let grid = self.config.grid_size;

        match &mut self.gesture {
            Gesture::Idle | Gesture::AddMenu => {}
            Gesture::Marquee { current_screen, .. } => {
                *current_screen = screen;
            }
            Gesture::NodeDrag { offsets } => {
                let point = self.viewport.screen_to_model(screen);
                for (id, offset) in offsets.iter() {
                    if let Some(person) = genogram.person_mut(id) {
                        person.position = snap(point - *offset, grid);
                    }
                }
            }
            Gesture::RelationshipDrag { relationship, anchor, start_positions, start_drop } => {
                let delta = self.viewport.screen_to_model(screen) - *anchor;
                let horizontal = delta.x.abs() >= delta.y.abs();

                let (shift_x, drop) = if horizontal {
                    (snap_value(delta.x, grid), *start_drop)
                } else {
                    (
                        0.0,
                        snap_value(*start_drop + delta.y, grid).max(self.config.min_drop),
                    )
                };

                for (id, start) in start_positions.iter() {
                    if let Some(person) = genogram.person_mut(id) {
                        person.position = start.offset(shift_x, 0.0);
                    }
                }
                if let Some(rel) = genogram.relationship_mut(relationship) {
                    rel.meta.drop = drop;
                }
            }
            Gesture::Pan { anchor_screen, saved_window } => {
                let window = self.viewport.panned(
                    *saved_window,
                    screen.x - anchor_screen.x,
                    screen.y - anchor_screen.y,
                );
                self.viewport.set_window(window);
            }
        }
    }

    /// End the active gesture. A marquee selects the people it encloses.
    pub fn pointer_up(&mut self, genogram: &mut Genogram, screen: Point) {
        let gesture = std::mem::take(&mut self.gesture);

        if let Gesture::Marquee { anchor_model, .. } = &gesture {
            let end = self.viewport.screen_to_model(screen);
            let selected = people_in_rect(genogram, Rect::from_corners(*anchor_model, end));
            debug!(count = selected.len(), "marquee selected people");
            self.selection.replace_selection(selected);
        }

        if !gesture.is_idle() {
            debug!(gesture = gesture.name(), "gesture ended");
        }
    }

    /// Zoom about the pointer by one wheel step.
    pub fn wheel(&mut self, screen: Point, delta_y: f32) {
        let factor = match ZoomDirection::from_wheel_delta(delta_y) {
            ZoomDirection::In => self.config.zoom_in_factor,
            ZoomDirection::Out => self.config.zoom_out_factor,
        };
        self.viewport.zoom_at(screen, factor);
    }

    // === Keyboard ===

    /// Handle a key press. Returns false when the key maps to no command.
    pub fn key(&mut self, genogram: &mut Genogram, text: &str) -> bool {
        match Command::from_key_text(text) {
            Some(command) => {
                self.command(genogram, command);
                true
            }
            None => false,
        }
    }

    /// Run a keyboard command. Returns true if anything changed.
    pub fn command(&mut self, genogram: &mut Genogram, command: Command) -> bool {
        debug!(?command, "keyboard command");
        match command {
            Command::Link => self.link_selected(genogram).is_some(),
            Command::Delete => self.delete_selected(genogram),
            Command::Cancel => {
                let changed = !self.selection.is_empty() || self.pending.is_some();
                self.selection.clear();
                self.pending = None;
                changed
            }
        }
    }

    /// Marry exactly two selected people when no relationship is selected.
    pub fn link_selected(&mut self, genogram: &mut Genogram) -> Option<RelationshipId> {
        if self.selection.relationship().is_some() {
            return None;
        }
        let [a, b]: [PersonId; 2] = self.selection.sorted_people().try_into().ok()?;

        let relationship =
            Relationship::new(RelationshipType::Married, a, b, self.config.default_drop);
        let id = relationship.id().clone();
        match genogram.add_relationship(relationship) {
            Ok(()) => Some(id),
            Err(err) => {
                warn!("link failed: {err}");
                None
            }
        }
    }

    /// Remove the selected people (cascading) and the selected relationship.
    pub fn delete_selected(&mut self, genogram: &mut Genogram) -> bool {
        let mut removed = false;
        for id in self.selection.sorted_people() {
            removed |= genogram.remove_person(&id).is_some();
        }
        if let Some(id) = self.selection.relationship() {
            removed |= genogram.remove_relationship(id).is_some();
        }
        self.selection.clear();
        removed
    }

    // === Add menu / detail form support ===

    /// Place a person at the pending add-menu position and select it alone.
    pub fn place_person(&mut self, genogram: &mut Genogram, gender: Gender) -> Option<PersonId> {
        let placement = self.pending.take()?;
        let person = Person::new(gender, placement.position);
        let id = person.id().clone();
        if let Err(err) = genogram.add_person(person) {
            warn!("could not place person: {err}");
            return None;
        }
        self.selection.replace_selection([id.clone()]);
        Some(id)
    }

    /// Select a child together with the parent-child relationship linking it.
    ///
    /// Returns false, leaving the selection alone, if `relationship` is not a
    /// parent-child relationship involving `child`.
    pub fn select_parent_child(
        &mut self,
        genogram: &Genogram,
        child: &PersonId,
        relationship: &RelationshipId,
    ) -> bool {
        let valid = genogram.relationship(relationship).is_some_and(|rel| {
            rel.family() == Family::ParentChild && rel.involves(child)
        });
        if valid {
            self.selection
                .select_parent_child(child.clone(), relationship.clone());
        }
        valid
    }
}
