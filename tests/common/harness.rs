//! Test harness that drives a [`GenogramController`] the way a window would:
//! through the callback factories, with scene rows bound to `VecModel`s.

use genogram_editor::{
    EditorConfig, GenogramController, Modifiers, PersonId, Point, RelationshipId,
};
use slint::platform::{Key, PointerEventButton};
use slint::{Model, SharedString, VecModel};
use std::rc::Rc;

use super::{RenderTracker, FAMILY_JSON};

/// Row pushed into the bound people model.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonRow {
    pub id: SharedString,
    pub path: SharedString,
    pub label: SharedString,
    pub selected: bool,
}

/// Row pushed into the bound relationship model.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationshipRow {
    pub id: SharedString,
    pub path: SharedString,
    pub dash: SharedString,
    pub selected: bool,
}

type PressedCallback = Box<dyn Fn(f32, f32, PointerEventButton, bool, bool)>;
type PointCallback = Box<dyn Fn(f32, f32)>;
type WheelCallback = Box<dyn Fn(f32, f32, f32)>;
type KeyCallback = Box<dyn Fn(SharedString) -> bool>;

pub struct GenogramTestHarness {
    pub ctrl: GenogramController,
    pub tracker: RenderTracker,
    pub people: Rc<VecModel<PersonRow>>,
    pub relationships: Rc<VecModel<RelationshipRow>>,
    pointer_pressed: PressedCallback,
    pointer_moved: PointCallback,
    pointer_released: PointCallback,
    scrolled: WheelCallback,
    key_pressed: KeyCallback,
}

impl GenogramTestHarness {
    /// An empty chart on an 800×600 screen.
    pub fn empty() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// The shared family fixture on an 800×600 screen.
    pub fn family() -> Self {
        let harness = Self::empty();
        harness
            .ctrl
            .import_json(FAMILY_JSON)
            .expect("fixture imports");
        harness.tracker.clear();
        harness
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let ctrl = GenogramController::new(config, 800.0, 600.0);

        let people = Rc::new(VecModel::<PersonRow>::default());
        ctrl.bind_people(people.clone(), |item| PersonRow {
            id: item.id.as_str().into(),
            path: item.path_commands.as_str().into(),
            label: item.label.as_str().into(),
            selected: item.selected,
        });

        let relationships = Rc::new(VecModel::<RelationshipRow>::default());
        ctrl.bind_relationships(relationships.clone(), |item| RelationshipRow {
            id: item.id.as_str().into(),
            path: item.path_commands.as_str().into(),
            dash: item.dash_array.as_str().into(),
            selected: item.selected,
        });

        let tracker = RenderTracker::new();
        {
            let tracker = tracker.clone();
            ctrl.on_render(move |scene| {
                *tracker.renders.borrow_mut() += 1;
                *tracker.grid_commands.borrow_mut() = scene.grid_commands.clone();
                *tracker.marquee.borrow_mut() = scene.marquee;
            });
        }

        Self {
            pointer_pressed: Box::new(ctrl.pointer_pressed_callback()),
            pointer_moved: Box::new(ctrl.pointer_moved_callback()),
            pointer_released: Box::new(ctrl.pointer_released_callback()),
            scrolled: Box::new(ctrl.wheel_callback()),
            key_pressed: Box::new(ctrl.key_pressed_callback()),
            ctrl,
            tracker,
            people,
            relationships,
        }
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    pub fn mouse_down_with(&self, x: f32, y: f32, modifiers: Modifiers) {
        (self.pointer_pressed)(x, y, PointerEventButton::Left, modifiers.shift, modifiers.control);
    }

    pub fn mouse_down(&self, x: f32, y: f32) {
        self.mouse_down_with(x, y, Modifiers::NONE);
    }

    pub fn mouse_move(&self, x: f32, y: f32) {
        (self.pointer_moved)(x, y);
    }

    pub fn mouse_up(&self, x: f32, y: f32) {
        (self.pointer_released)(x, y);
    }

    /// Press, release, no movement.
    pub fn click(&self, x: f32, y: f32) {
        self.mouse_down(x, y);
        self.mouse_up(x, y);
    }

    pub fn shift_click(&self, x: f32, y: f32) {
        self.mouse_down_with(x, y, Modifiers::SHIFT);
        self.mouse_up(x, y);
    }

    pub fn ctrl_click(&self, x: f32, y: f32) {
        self.mouse_down_with(x, y, Modifiers::CONTROL);
        self.mouse_up(x, y);
    }

    /// Press at `from`, move in `steps` increments, release at `to`.
    pub fn drag_with(&self, from: (f32, f32), to: (f32, f32), steps: usize, modifiers: Modifiers) {
        self.mouse_down_with(from.0, from.1, modifiers);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.mouse_move(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
        }
        self.mouse_up(to.0, to.1);
    }

    pub fn drag(&self, from: (f32, f32), to: (f32, f32)) {
        self.drag_with(from, to, 5, Modifiers::NONE);
    }

    pub fn shift_drag(&self, from: (f32, f32), to: (f32, f32)) {
        self.drag_with(from, to, 5, Modifiers::SHIFT);
    }

    pub fn scroll(&self, x: f32, y: f32, delta_y: f32) {
        (self.scrolled)(x, y, delta_y);
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    /// Press a special key; returns whether it was handled.
    pub fn key_tap(&self, key: Key) -> bool {
        (self.key_pressed)(key.into())
    }

    pub fn type_text(&self, text: &str) -> bool {
        (self.key_pressed)(text.into())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn position_of(&self, id: &str) -> Option<Point> {
        self.ctrl
            .genogram()
            .borrow()
            .person(&PersonId::from(id))
            .map(|p| p.position)
    }

    pub fn drop_of(&self, id: &str) -> Option<f32> {
        self.ctrl
            .genogram()
            .borrow()
            .relationship(&RelationshipId::from(id))
            .map(|r| r.meta.drop)
    }

    pub fn has_person(&self, id: &str) -> bool {
        self.position_of(id).is_some()
    }

    pub fn has_relationship(&self, id: &str) -> bool {
        self.drop_of(id).is_some()
    }

    pub fn person_count(&self) -> usize {
        self.ctrl.genogram().borrow().person_count()
    }

    pub fn relationship_count(&self) -> usize {
        self.ctrl.genogram().borrow().relationship_count()
    }

    /// Selected people, sorted by id.
    pub fn selected_people(&self) -> Vec<String> {
        self.ctrl
            .selection()
            .sorted_people()
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    pub fn selected_relationship(&self) -> Option<String> {
        self.ctrl.selection().relationship().map(|id| id.0.clone())
    }

    pub fn person_row(&self, id: &str) -> Option<PersonRow> {
        self.people.iter().find(|row| row.id == id)
    }

    pub fn relationship_row(&self, id: &str) -> Option<RelationshipRow> {
        self.relationships.iter().find(|row| row.id == id)
    }
}
