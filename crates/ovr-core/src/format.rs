//! Data shapes and their in-memory representation
//!
//! [`Format`] is the closed set of shapes a value can take and [`Value`] is
//! the tagged union carrying one representation per shape. The tag of a
//! value is always derived from its variant, so a format can never disagree
//! with the data it describes.

use chrono::{DateTime, FixedOffset};
use std::fmt::{self, Display, Formatter};
use wkt::ToWkt;

/// Shape of a value
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// UTF-8 (or nearly) text held as bytes
    Text,
    /// Raw bytes
    Binary,
    /// Absolute timestamp with offset
    Time,
    /// Ordered list of strings
    TextList,
    /// Parsed geometry
    Geometry,
    /// Structured JSON value
    Json,
}

impl Format {
    /// All formats, in declaration order
    pub const ALL: [Format; 6] = [
        Format::Text,
        Format::Binary,
        Format::Time,
        Format::TextList,
        Format::Geometry,
        Format::Json,
    ];

    /// Short prefix used in registry keys
    #[inline]
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Text => "t",
            Self::Binary => "b",
            Self::Time => "ts",
            Self::TextList => "tl",
            Self::Geometry => "g",
            Self::Json => "j",
        }
    }

    /// Human-readable name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Binary => "bin",
            Self::Time => "time",
            Self::TextList => "textlist",
            Self::Geometry => "geo",
            Self::Json => "json",
        }
    }

    /// Registry key for an action name under this format
    #[inline]
    #[must_use]
    pub fn key(self, name: &str) -> String {
        format!("{},{}", self.prefix(), name)
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value in one of the supported shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(Vec<u8>),
    Binary(Vec<u8>),
    Time(DateTime<FixedOffset>),
    TextList(Vec<String>),
    Geometry(geo_types::Geometry<f64>),
    Json(serde_json::Value),
}

impl Value {
    /// Text value from anything string-like
    #[inline]
    pub fn text(s: impl Into<Vec<u8>>) -> Self {
        Self::Text(s.into())
    }

    /// List value from an iterator of strings
    pub fn text_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::TextList(items.into_iter().map(Into::into).collect())
    }

    /// Shape of this value
    #[inline]
    #[must_use]
    pub const fn format(&self) -> Format {
        match self {
            Self::Text(_) => Format::Text,
            Self::Binary(_) => Format::Binary,
            Self::Time(_) => Format::Time,
            Self::TextList(_) => Format::TextList,
            Self::Geometry(_) => Format::Geometry,
            Self::Json(_) => Format::Json,
        }
    }

    /// Raw bytes for Text and Binary values
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(b) | Self::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(b) => f.write_str(&String::from_utf8_lossy(b)),
            Self::Binary(b) => {
                for (i, byte) in b.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Self::Time(t) => write!(f, "{t}"),
            Self::TextList(l) => write!(f, "{l:?}"),
            Self::Geometry(g) => f.write_str(&g.wkt_string()),
            Self::Json(j) => write!(f, "{j}"),
        }
    }
}
