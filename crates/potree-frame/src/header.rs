//! Structured view of the response header.
//!
//! The extraction tool writes its header as a JSON document. Two layouts are
//! in circulation and both are accepted here:
//!
//! **Legacy layout**
//! - `boundingBox` as `{lx, ly, lz, ux, uy, uz}`, values may be the strings
//!   `"Infinity"` / `"-Infinity"` when no point was accepted
//! - `pointAttributes` as a list of attribute names
//!
//! **Current layout**
//! - `boundingBox` as `{min: [x, y, z], max: [x, y, z]}`
//! - `attributes` as a list of `{name, description, size, numElements,
//!   elementSize, type}` objects
//!
//! Both carry `points`, `pointsProcessed`, `nodesProcessed`, `durationMS`,
//! `bytesPerPoint` and `scale`.
//!
//! The tool assembles the document by hand, so it is not strict JSON: objects
//! and arrays may end with a trailing comma, and unbounded coordinates are
//! printed as bare `inf` / `-inf`. [`ResponseHeader::parse`] relaxes both
//! before handing the text to `serde_json`.

use serde::Deserialize;

use crate::{FrameError, FrameResult};

/// Counters and layout information reported by the extraction tool.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseHeader {
    /// Points written to the payload
    pub points: u64,

    /// Points inspected, accepted or not
    #[serde(default)]
    pub points_processed: u64,

    /// Octree nodes visited
    #[serde(default)]
    pub nodes_processed: u64,

    /// Wall time spent in the extraction
    #[serde(rename = "durationMS", default)]
    pub duration_ms: f64,

    /// Bounds of the accepted points
    pub bounding_box: BoundingBox,

    /// Per-point attributes, in payload order
    #[serde(default, alias = "pointAttributes")]
    pub attributes: Vec<AttributeDescriptor>,

    /// Size of one point record in the payload
    pub bytes_per_point: u64,

    /// Position quantisation scale
    #[serde(default)]
    pub scale: f64,
}

impl ResponseHeader {
    /// Parse a header document.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::HeaderParse` if `text` is not JSON or does not
    /// match either header layout.
    pub fn parse(text: &str) -> FrameResult<Self> {
        serde_json::from_str(&relax(text)).map_err(|e| FrameError::header_parse(e.to_string()))
    }

    /// Payload size implied by `points * bytesPerPoint`, if it fits in a u64.
    #[must_use]
    pub const fn expected_payload_len(&self) -> Option<u64> {
        self.points.checked_mul(self.bytes_per_point)
    }

    /// Attribute names in payload order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|a| a.name.as_str())
    }
}

/// Axis-aligned bounds, normalised from either header layout.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawBoundingBox")]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    /// True when no point contributed to the bounds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.iter().zip(self.max.iter()).any(|(lo, hi)| lo > hi)
    }

    /// Extent along each axis, `None` for empty bounds.
    #[must_use]
    pub fn dimensions(&self) -> Option<[f64; 3]> {
        if self.is_empty() {
            return None;
        }
        let [lx, ly, lz] = self.min;
        let [ux, uy, uz] = self.max;
        Some([ux - lx, uy - ly, uz - lz])
    }
}

/// One point attribute in the payload.
///
/// The legacy layout only names the attribute; size information is then
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawAttribute")]
pub struct AttributeDescriptor {
    pub name: String,
    pub description: String,
    pub size: Option<u32>,
    pub num_elements: Option<u32>,
    pub element_size: Option<u32>,
    pub attribute_type: Option<String>,
}

impl AttributeDescriptor {
    /// Attribute known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            size: None,
            num_elements: None,
            element_size: None,
            attribute_type: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAttribute {
    Name(String),
    #[serde(rename_all = "camelCase")]
    Described {
        name: String,
        #[serde(default)]
        description: String,
        size: Option<u32>,
        num_elements: Option<u32>,
        element_size: Option<u32>,
        #[serde(rename = "type")]
        attribute_type: Option<String>,
    },
}

impl From<RawAttribute> for AttributeDescriptor {
    fn from(raw: RawAttribute) -> Self {
        match raw {
            RawAttribute::Name(name) => Self::named(name),
            RawAttribute::Described {
                name,
                description,
                size,
                num_elements,
                element_size,
                attribute_type,
            } => Self {
                name,
                description,
                size,
                num_elements,
                element_size,
                attribute_type,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBoundingBox {
    MinMax {
        min: [InfSafe; 3],
        max: [InfSafe; 3],
    },
    Corners {
        lx: InfSafe,
        ly: InfSafe,
        lz: InfSafe,
        ux: InfSafe,
        uy: InfSafe,
        uz: InfSafe,
    },
}

/// A number, or the strings the tool writes for unbounded values.
#[derive(Deserialize)]
#[serde(untagged)]
enum InfSafe {
    Number(f64),
    Text(String),
}

impl InfSafe {
    fn value(self) -> Result<f64, String> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(text) => match text.as_str() {
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(format!("invalid bounding box value '{other}'")),
            },
        }
    }
}

impl TryFrom<RawBoundingBox> for BoundingBox {
    type Error = String;

    fn try_from(raw: RawBoundingBox) -> Result<Self, Self::Error> {
        match raw {
            RawBoundingBox::MinMax { min, max } => Ok(Self {
                min: corner(min)?,
                max: corner(max)?,
            }),
            RawBoundingBox::Corners {
                lx,
                ly,
                lz,
                ux,
                uy,
                uz,
            } => Ok(Self {
                min: [lx.value()?, ly.value()?, lz.value()?],
                max: [ux.value()?, uy.value()?, uz.value()?],
            }),
        }
    }
}

fn corner([x, y, z]: [InfSafe; 3]) -> Result<[f64; 3], String> {
    Ok([x.value()?, y.value()?, z.value()?])
}

/// Rewrite the tool's header text into strict JSON.
///
/// Drops commas that directly precede a closing `}` or `]` and quotes bare
/// `inf` / `-inf` as `"Infinity"` / `"-Infinity"`. String contents are
/// copied unchanged.
fn relax(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        let mut consumed = c.len_utf8();
        let tail = rest.get(consumed..).unwrap_or_default();

        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' && tail.trim_start().starts_with(['}', ']']) {
            // trailing comma, dropped
        } else if rest.starts_with("-inf") {
            out.push_str("\"-Infinity\"");
            consumed = "-inf".len();
        } else if rest.starts_with("inf") {
            out.push_str("\"Infinity\"");
            consumed = "inf".len();
        } else {
            out.push(c);
        }

        rest = rest.get(consumed..).unwrap_or_default();
    }

    out
}
