//! Region coordinates passed to the extraction executable.
//!
//! The executable takes its region as a string of brace-wrapped coordinate
//! pairs, `{x0, y0},{x1, y1},...`. Parsing it here means a typo is reported
//! before a process is started, and the string handed over is always in one
//! canonical form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::{InvokeError, Result};

/// A single 2D vertex in the point cloud's coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ordered vertices describing the extraction region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    vertices: Vec<Vertex>,
}

impl Region {
    /// Build a region from vertices.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::InvalidRegion` if `vertices` is empty or any
    /// coordinate is not finite.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(InvokeError::invalid_region("", "at least one vertex is required"));
        }

        if let Some(bad) = vertices.iter().find(|v| !v.x.is_finite() || !v.y.is_finite()) {
            return Err(InvokeError::invalid_region(
                format!("{{{}, {}}}", bad.x, bad.y),
                "coordinates must be finite",
            ));
        }

        Ok(Self { vertices })
    }

    /// Vertices in the order they were given.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Number of segments along the region outline.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

impl FromStr for Region {
    type Err = InvokeError;

    fn from_str(input: &str) -> Result<Self> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();

        let inner = compact
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .ok_or_else(|| {
                InvokeError::invalid_region(input, "expected '{x, y}' pairs wrapped in braces")
            })?;

        let vertices = inner
            .split("},{")
            .map(|pair| parse_vertex(input, pair))
            .collect::<Result<Vec<_>>>()?;

        Self::new(vertices).map_err(|e| match e {
            InvokeError::InvalidRegion { reason, .. } => InvokeError::invalid_region(input, reason),
            other => other,
        })
    }
}

fn parse_vertex(input: &str, pair: &str) -> Result<Vertex> {
    let mut parts = pair.split(',');

    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(InvokeError::invalid_region(
            input,
            format!("'{pair}' is not an x,y pair"),
        ));
    };

    let coordinate = |token: &str| {
        token.parse::<f64>().map_err(|e| {
            InvokeError::invalid_region(input, format!("'{token}' is not a number: {e}"))
        })
    };

    Ok(Vertex::new(coordinate(x)?, coordinate(y)?))
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{{{}, {}}}", v.x, v.y)?;
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Region {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
