//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use genogram_editor::Rect;
use std::cell::RefCell;
use std::rc::Rc;

/// Records what the controller's render hook has seen.
#[derive(Default, Clone)]
pub struct RenderTracker {
    /// Number of renders
    pub renders: Rc<RefCell<usize>>,
    /// Grid path of the latest render
    pub grid_commands: Rc<RefCell<String>>,
    /// Marquee overlay of the latest render
    pub marquee: Rc<RefCell<Option<Rect>>>,
}

impl RenderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn renders(&self) -> usize {
        *self.renders.borrow()
    }

    /// Clear all recorded renders.
    pub fn clear(&self) {
        *self.renders.borrow_mut() = 0;
        self.grid_commands.borrow_mut().clear();
        *self.marquee.borrow_mut() = None;
    }
}

/// A small family used by most tests, in a 1:1 viewport:
///
/// ```text
///   dad (100,100) ======== mum (300,100)     married, drop 40
///                              |
///   kid (200,300) ------------+              foster child, drop 100
/// ```
pub const FAMILY_JSON: &str = r#"{
  "people": [
    { "id": "dad", "firstName": "Tom", "lastName": "Hale", "gender": "male",
      "position": { "x": 100, "y": 100 } },
    { "id": "mum", "firstName": "Ann", "lastName": "Hale", "gender": "female",
      "position": { "x": 300, "y": 100 } },
    { "id": "kid", "firstName": "Sam", "gender": "non_binary", "sexualOrientation": "gay",
      "birthDate": { "day": 31, "month": 2, "year": 2001 },
      "position": { "x": 200, "y": 300 } }
  ],
  "relationships": [
    { "id": "marriage", "type": "married", "people": ["dad", "mum"], "meta": { "drop": 40 } },
    { "id": "fostering", "type": "foster_child", "people": ["mum", "kid"],
      "meta": { "drop": 100, "note": "kinship care" } }
  ]
}"#;

/// Point on the marriage bridge.
pub const ON_MARRIAGE: (f32, f32) = (200.0, 140.0);
/// Point on the fostering bridge.
pub const ON_FOSTERING: (f32, f32) = (250.0, 400.0);
/// Empty canvas, far from everything.
pub const EMPTY: (f32, f32) = (600.0, 500.0);
