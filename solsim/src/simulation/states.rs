//! Core state types for the simulation.
//!
//! A `Body` carries its physical state (mass, position, velocity) plus the
//! presentational attributes that round-trip through the scenario file.
//! `BodyKind` only tells the presentation layer how to draw a body; the
//! physics never looks at it.

use std::fmt;
use std::str::FromStr;

use nalgebra::Vector2;
use serde::{Deserialize, Deserializer};

use crate::error::{SimError, SimResult};

pub type NVec2 = Vector2<f64>;

/// Presentational role of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Star,
    Planet,
}

impl BodyKind {
    /// Token used in the scenario file
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Star => "Star",
            BodyKind::Planet => "Planet",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BodyKind {
    type Err = SimError;

    /// Case-insensitive: `star`, `STAR` and `Star` all parse
    fn from_str(s: &str) -> SimResult<Self> {
        if s.eq_ignore_ascii_case("star") {
            Ok(BodyKind::Star)
        } else if s.eq_ignore_ascii_case("planet") {
            Ok(BodyKind::Planet)
        } else {
            Err(SimError::UnknownObjectKind(s.to_string()))
        }
    }
}

impl<'de> Deserialize<'de> for BodyKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub kind: BodyKind,
    pub m: f64, // mass
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub radius: f64, // display radius (pixels), not used by the physics
    pub color: String, // display colour name, kept verbatim
}

impl Body {
    /// Build a body, rejecting non-positive mass or display radius.
    ///
    /// NaN fails both checks as well, since `NaN > 0.0` is false.
    pub fn new(
        kind: BodyKind,
        m: f64,
        x: NVec2,
        v: NVec2,
        radius: f64,
        color: impl Into<String>,
    ) -> SimResult<Self> {
        if !(m > 0.0) {
            return Err(SimError::InvalidBody { field: "mass", value: m });
        }
        if !(radius > 0.0) {
            return Err(SimError::InvalidBody { field: "radius", value: radius });
        }
        Ok(Self {
            kind,
            m,
            x,
            v,
            radius,
            color: color.into(),
        })
    }

    pub fn star(m: f64, x: NVec2, v: NVec2, radius: f64, color: impl Into<String>) -> SimResult<Self> {
        Self::new(BodyKind::Star, m, x, v, radius, color)
    }

    pub fn planet(m: f64, x: NVec2, v: NVec2, radius: f64, color: impl Into<String>) -> SimResult<Self> {
        Self::new(BodyKind::Planet, m, x, v, radius, color)
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }
}
