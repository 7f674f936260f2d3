//! Presentation contract
//!
//! The controller tells a [`Presentation`] about every body once on load and
//! again after each step. It never reads anything back.

use std::cell::RefCell;
use std::rc::Rc;

use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Body, BodyKind};

pub trait Presentation {
    /// Called once per body when a scenario is installed
    fn create_image(&mut self, index: usize, body: &Body);

    /// Called once per body after every step
    fn update_position(&mut self, index: usize, body: &Body);

    /// Called after every step with the accumulated simulated time
    fn update_time(&mut self, _elapsed: f64) {}

    /// Called before a new scenario's images are created
    fn clear(&mut self) {}
}

/// Shared handle, so the caller can keep observing a view it handed to the controller
impl<P: Presentation> Presentation for Rc<RefCell<P>> {
    fn create_image(&mut self, index: usize, body: &Body) {
        self.borrow_mut().create_image(index, body);
    }

    fn update_position(&mut self, index: usize, body: &Body) {
        self.borrow_mut().update_position(index, body);
    }

    fn update_time(&mut self, elapsed: f64) {
        self.borrow_mut().update_time(elapsed);
    }

    fn clear(&mut self) {
        self.borrow_mut().clear();
    }
}

/// Drops every notification
#[derive(Debug, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {
    fn create_image(&mut self, _index: usize, _body: &Body) {}
    fn update_position(&mut self, _index: usize, _body: &Body) {}
}

/// Headless view: maps positions onto a virtual canvas and logs them
#[derive(Debug)]
pub struct LogPresentation {
    pub width: f64, // canvas width in pixels
    pub height: f64, // canvas height in pixels
    scale: f64, // pixels per simulation unit
}

impl LogPresentation {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, scale: 1.0 }
    }

    /// Fit the scenario's farthest body inside the smaller canvas half-extent
    pub fn fit(&mut self, scenario: &Scenario) {
        let max_distance = scenario.max_extent();
        self.scale = if max_distance > 0.0 {
            0.4 * self.width.min(self.height) / max_distance
        } else {
            1.0
        };
        log::debug!("display scale set to {:e} px/unit", self.scale);
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Canvas coordinates, origin at the centre, y pointing down
    pub fn to_screen(&self, body: &Body) -> (f64, f64) {
        (
            self.width / 2.0 + body.x.x * self.scale,
            self.height / 2.0 - body.x.y * self.scale,
        )
    }
}

impl Presentation for LogPresentation {
    fn create_image(&mut self, index: usize, body: &Body) {
        let (sx, sy) = self.to_screen(body);
        let role = match body.kind {
            BodyKind::Star => "star",
            BodyKind::Planet => "planet",
        };
        log::info!("{role} #{index} ({}, r={}) at ({sx:.1}, {sy:.1})", body.color, body.radius);
    }

    fn update_position(&mut self, index: usize, body: &Body) {
        let (sx, sy) = self.to_screen(body);
        log::trace!("body #{index} -> ({sx:.1}, {sy:.1})");
    }

    fn update_time(&mut self, elapsed: f64) {
        log::debug!("{elapsed:.1} seconds gone");
    }
}
