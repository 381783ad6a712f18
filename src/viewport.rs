//! Screen ↔ model coordinate transform.
//!
//! The visible part of the chart is a rectangle in model space (the
//! "window"). It is stretched onto a fixed-size screen area, so one screen
//! pixel covers `window.width / screen.width` model units horizontally.
//! Panning moves the window, zooming scales it about a fixed model point.

use serde::{Deserialize, Serialize};

use crate::model::Point;

/// The visible rectangle in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewWindow {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Direction of a wheel step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Wheel deltas below zero zoom in, anything else zooms out.
    pub fn from_wheel_delta(delta_y: f32) -> Self {
        if delta_y < 0.0 {
            Self::In
        } else {
            Self::Out
        }
    }
}

/// A view window bound to a screen area of `screen_width × screen_height` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    window: ViewWindow,
    screen_width: f32,
    screen_height: f32,
}

impl Viewport {
    /// A viewport showing model space 1:1, origin at the top-left corner.
    pub fn new(screen_width: f32, screen_height: f32) -> Self {
        Self {
            window: ViewWindow {
                x: 0.0,
                y: 0.0,
                width: screen_width,
                height: screen_height,
            },
            screen_width,
            screen_height,
        }
    }

    pub fn with_window(window: ViewWindow, screen_width: f32, screen_height: f32) -> Self {
        Self {
            window,
            screen_width,
            screen_height,
        }
    }

    pub fn window(&self) -> ViewWindow {
        self.window
    }

    pub fn set_window(&mut self, window: ViewWindow) {
        self.window = window;
    }

    pub fn screen_size(&self) -> (f32, f32) {
        (self.screen_width, self.screen_height)
    }

    /// Change the screen area; the window keeps its model-space rectangle.
    pub fn resize_screen(&mut self, screen_width: f32, screen_height: f32) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
    }

    /// Model units per screen pixel, per axis.
    pub fn scale(&self) -> (f32, f32) {
        (
            self.window.width / self.screen_width,
            self.window.height / self.screen_height,
        )
    }

    pub fn screen_to_model(&self, screen: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(self.window.x + screen.x * sx, self.window.y + screen.y * sy)
    }

    pub fn model_to_screen(&self, model: Point) -> Point {
        Point::new(
            (model.x - self.window.x) * self.screen_width / self.window.width,
            (model.y - self.window.y) * self.screen_height / self.window.height,
        )
    }

    /// Shift the window by a screen-space delta. The delta is scaled by the
    /// current zoom so a drag feels the same at every zoom level.
    pub fn pan_by(&mut self, screen_dx: f32, screen_dy: f32) {
        self.window = self.panned(self.window, screen_dx, screen_dy);
    }

    /// `saved` shifted by a screen delta, scaled by `saved`'s own zoom.
    ///
    /// Pan gestures apply this to the window captured at pointer-down so that
    /// successive moves never compound.
    pub fn panned(&self, saved: ViewWindow, screen_dx: f32, screen_dy: f32) -> ViewWindow {
        ViewWindow {
            x: saved.x - screen_dx * (saved.width / self.screen_width),
            y: saved.y - screen_dy * (saved.height / self.screen_height),
            ..saved
        }
    }

    /// Scale the window by `factor` keeping the model point under `screen`
    /// fixed on screen.
    pub fn zoom_at(&mut self, screen: Point, factor: f32) {
        let anchor = self.screen_to_model(screen);
        let ViewWindow { x, y, width, height } = self.window;
        let new_width = width * factor;
        let new_height = height * factor;
        self.window = ViewWindow {
            x: anchor.x - (anchor.x - x) * (new_width / width),
            y: anchor.y - (anchor.y - y) * (new_height / height),
            width: new_width,
            height: new_height,
        };
    }
}
