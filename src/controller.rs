//! High-level controller for genogram editor applications.
//!
//! The [`GenogramController`] owns the chart and the interaction state and
//! re-renders the scene after every event, so a UI only has to forward input
//! and draw what it is given.
//!
//! # Example
//!
//! ```ignore
//! use genogram_editor::{EditorConfig, GenogramController};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = GenogramController::new(EditorConfig::default(), 1024.0, 768.0);
//!
//!     // Scene rows
//!     let people = Rc::new(VecModel::<PersonRow>::default());
//!     ctrl.bind_people(people.clone(), |item| PersonRow {
//!         id: item.id.as_str().into(),
//!         path: item.path_commands.as_str().into(),
//!         selected: item.selected,
//!     });
//!     window.set_people(ModelRc::from(people));
//!
//!     // Grid and marquee
//!     let w = window.as_weak();
//!     ctrl.on_render(move |scene| {
//!         if let Some(w) = w.upgrade() {
//!             w.set_grid_commands(scene.grid_commands.as_str().into());
//!         }
//!     });
//!
//!     // Input
//!     window.on_pointer_pressed(ctrl.pointer_pressed_callback());
//!     window.on_pointer_moved(ctrl.pointer_moved_callback());
//!     window.on_pointer_released(ctrl.pointer_released_callback());
//!     window.on_scrolled(ctrl.wheel_callback());
//!     window.on_key_pressed(ctrl.key_pressed_callback());
//!
//!     ctrl.render();
//!     window.run().unwrap();
//! }
//! ```

use slint::platform::PointerEventButton;
use slint::{SharedString, VecModel};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

use crate::config::EditorConfig;
use crate::error::Result;
use crate::form::{self, DetailForm};
use crate::interaction::{Command, InteractionState, Modifiers};
use crate::model::{Gender, Genogram, PersonId, Point, RelationshipId, RelationshipType};
use crate::scene::{render_scene, PersonItem, RelationshipItem, Scene, SceneBinding, ScenePalette};
use crate::selection::SelectionManager;
use crate::viewport::ViewWindow;

type RenderHook = Box<dyn Fn(&Scene)>;

/// Controller that owns the chart and routes UI events through the
/// interaction state machine.
///
/// Clone this controller to share it across callbacks. All clones see the
/// same chart.
#[derive(Clone)]
pub struct GenogramController {
    genogram: Rc<RefCell<Genogram>>,
    state: Rc<RefCell<InteractionState>>,
    palette: Rc<RefCell<ScenePalette>>,
    binding: Rc<RefCell<SceneBinding>>,
    render_hook: Rc<RefCell<Option<RenderHook>>>,
}

impl Default for GenogramController {
    fn default() -> Self {
        Self::new(EditorConfig::default(), 800.0, 600.0)
    }
}

impl GenogramController {
    /// Create a controller with an empty chart on a screen of the given size.
    pub fn new(config: EditorConfig, screen_width: f32, screen_height: f32) -> Self {
        Self {
            genogram: Rc::new(RefCell::new(Genogram::new())),
            state: Rc::new(RefCell::new(InteractionState::new(
                config,
                screen_width,
                screen_height,
            ))),
            palette: Rc::new(RefCell::new(ScenePalette::default())),
            binding: Rc::new(RefCell::new(SceneBinding::new())),
            render_hook: Rc::new(RefCell::new(None)),
        }
    }

    /// Set the grid spacing used for snapping and the background grid (default: 20.0).
    pub fn set_grid_spacing(&self, spacing: f32) {
        let mut state = self.state.borrow_mut();
        let mut config = *state.config();
        config.grid_size = spacing;
        state.set_config(config);
    }

    pub fn config(&self) -> EditorConfig {
        *self.state.borrow().config()
    }

    pub fn set_palette(&self, palette: ScenePalette) {
        *self.palette.borrow_mut() = palette;
    }

    /// Get access to the chart.
    ///
    /// Call [`render`](Self::render) after mutating it directly.
    pub fn genogram(&self) -> Rc<RefCell<Genogram>> {
        self.genogram.clone()
    }

    /// Snapshot of the current selection.
    pub fn selection(&self) -> SelectionManager {
        self.state.borrow().selection().clone()
    }

    pub fn view_window(&self) -> ViewWindow {
        self.state.borrow().viewport().window()
    }

    /// Name of the active gesture ("idle", "pan", ...).
    pub fn gesture_name(&self) -> &'static str {
        self.state.borrow().gesture().name()
    }

    /// Screen position of an open add menu.
    pub fn pending_menu_position(&self) -> Option<Point> {
        self.state.borrow().pending_placement().map(|p| p.screen)
    }

    // === Rendering ===

    /// Register a function called with every freshly rendered scene.
    ///
    /// The hook runs with no internal borrows held, so it may read from the
    /// controller.
    pub fn on_render(&self, hook: impl Fn(&Scene) + 'static) {
        *self.render_hook.borrow_mut() = Some(Box::new(hook));
    }

    /// Bind a Slint model that receives one row per person on every render.
    pub fn bind_people<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&PersonItem) -> P + 'static,
    {
        self.binding.borrow_mut().bind_people(model, constructor);
    }

    /// Bind a Slint model that receives one row per drawn relationship.
    pub fn bind_relationships<P, F>(&self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(&RelationshipItem) -> P + 'static,
    {
        self.binding.borrow_mut().bind_relationships(model, constructor);
    }

    /// Render the scene, sync bound models, and notify the render hook.
    pub fn render(&self) -> Scene {
        let scene = render_scene(
            &self.genogram.borrow(),
            &self.state.borrow(),
            &self.palette.borrow(),
        );
        self.binding.borrow().sync(&scene);
        if let Some(hook) = self.render_hook.borrow().as_ref() {
            hook(&scene);
        }
        scene
    }

    /// Run `f` against the chart and interaction state, then re-render.
    fn update<R>(&self, f: impl FnOnce(&mut Genogram, &mut InteractionState) -> R) -> R {
        let result = f(&mut self.genogram.borrow_mut(), &mut self.state.borrow_mut());
        self.render();
        result
    }

    // === Callback factories ===

    /// Returns a callback for pointer presses: `(x, y, button, shift, control)`.
    pub fn pointer_pressed_callback(&self) -> impl Fn(f32, f32, PointerEventButton, bool, bool) {
        let ctrl = self.clone();
        move |x, y, button, shift, control| {
            let modifiers = Modifiers { shift, control, alt: false };
            ctrl.handle_pointer_down(x, y, button, modifiers);
        }
    }

    /// Returns a callback for pointer moves.
    pub fn pointer_moved_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.handle_pointer_move(x, y)
    }

    /// Returns a callback for pointer releases.
    pub fn pointer_released_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.handle_pointer_up(x, y)
    }

    /// Returns a callback for wheel events: `(x, y, delta_y)`.
    pub fn wheel_callback(&self) -> impl Fn(f32, f32, f32) {
        let ctrl = self.clone();
        move |x, y, delta_y| ctrl.handle_wheel(x, y, delta_y)
    }

    /// Returns a callback for key presses; the result tells Slint whether the
    /// key was handled.
    pub fn key_pressed_callback(&self) -> impl Fn(SharedString) -> bool {
        let ctrl = self.clone();
        move |text| ctrl.handle_key(&text)
    }

    // === Direct handlers ===

    pub fn handle_pointer_down(&self, x: f32, y: f32, button: PointerEventButton, modifiers: Modifiers) {
        self.update(|g, state| state.pointer_down(g, Point::new(x, y), button, modifiers));
    }

    /// Moves with no active gesture do nothing and skip the render.
    pub fn handle_pointer_move(&self, x: f32, y: f32) {
        if self.state.borrow().gesture().is_idle() {
            return;
        }
        self.update(|g, state| state.pointer_move(g, Point::new(x, y)));
    }

    pub fn handle_pointer_up(&self, x: f32, y: f32) {
        self.update(|g, state| state.pointer_up(g, Point::new(x, y)));
    }

    pub fn handle_wheel(&self, x: f32, y: f32, delta_y: f32) {
        self.update(|_, state| state.wheel(Point::new(x, y), delta_y));
    }

    /// Returns false for keys that map to no command.
    pub fn handle_key(&self, text: &str) -> bool {
        match Command::from_key_text(text) {
            Some(command) => {
                self.run_command(command);
                true
            }
            None => false,
        }
    }

    /// Returns true if the command changed anything.
    pub fn run_command(&self, command: Command) -> bool {
        self.update(|g, state| state.command(g, command))
    }

    pub fn handle_resize(&self, screen_width: f32, screen_height: f32) {
        self.update(|_, state| state.resize(screen_width, screen_height));
    }

    /// Complete the add menu by placing a person of `gender`.
    pub fn place_person(&self, gender: Gender) -> Option<PersonId> {
        self.update(|g, state| state.place_person(g, gender))
    }

    pub fn select_parent_child(&self, child: &PersonId, relationship: &RelationshipId) -> bool {
        self.update(|g, state| state.select_parent_child(g, child, relationship))
    }

    // === Detail panel ===

    /// The form the detail panel should show for the current selection.
    pub fn detail_form(&self) -> DetailForm {
        DetailForm::resolve(&self.genogram.borrow(), self.state.borrow().selection())
    }

    /// Apply the couple chooser to the pair `a`, `b`.
    pub fn set_couple_type(
        &self,
        a: &PersonId,
        b: &PersonId,
        kind: Option<RelationshipType>,
    ) -> Result<Option<RelationshipId>> {
        self.update(|g, state| form::set_couple_type(g, a, b, kind, state.config().default_drop))
    }

    pub fn set_child_type(&self, relationship: &RelationshipId, kind: RelationshipType) -> Result<bool> {
        self.update(|g, _| form::set_child_type(g, relationship, kind))
    }

    pub fn set_relationship_type(&self, relationship: &RelationshipId, kind: RelationshipType) -> bool {
        self.update(|g, _| form::set_relationship_type(g, relationship, kind))
    }

    // === Import / export ===

    /// Replace the chart with a JSON document
    ///
    /// On failure the current chart, selection, and view are untouched.
    /// On success selection and gestures are reset.
    pub fn import_json(&self, json: &str) -> Result<()> {
        let default_drop = self.state.borrow().config().default_drop;
        let imported = Genogram::from_json_str(json, default_drop)?;
        info!(
            people = imported.person_count(),
            relationships = imported.relationship_count(),
            "imported genogram"
        );
        self.update(|g, state| {
            *g = imported;
            state.reset();
        });
        Ok(())
    }

    /// Serialize the chart as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String> {
        let genogram = self.genogram.borrow();
        let json = genogram.to_json_string()?;
        info!(
            people = genogram.person_count(),
            relationships = genogram.relationship_count(),
            "exported genogram"
        );
        Ok(json)
    }
}
