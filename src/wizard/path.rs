use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::form::Section;

/// Per-field validation messages. A missing key means the field is valid.
pub type ErrorMap = BTreeMap<FieldPath, String>;

/// Address of one form field, e.g. `title` or `applicant.name`.
///
/// Paths are built from segments rather than joined strings; the dotted form
/// exists only for display and serialization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    segments: Vec<Cow<'static, str>>,
}

impl FieldPath {
    /// A top-level field.
    pub fn field(name: &'static str) -> Self {
        Self {
            segments: vec![Cow::Borrowed(name)],
        }
    }

    /// A field inside a record section.
    pub fn nested(section: Section, name: &'static str) -> Self {
        Self {
            segments: vec![Cow::Borrowed(section.name()), Cow::Borrowed(name)],
        }
    }

    /// Parse a dotted path.
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted
                .split('.')
                .map(|segment| Cow::Owned(segment.to_string()))
                .collect(),
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|segment| &**segment)
    }

    /// The enclosing section name, if this path is nested.
    pub fn section(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [section, _, ..] => Some(&**section),
            _ => None,
        }
    }

    /// The last segment.
    pub fn name(&self) -> &str {
        self.segments.last().map(|s| &**s).unwrap_or_default()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dotted = String::deserialize(deserializer)?;
        Ok(Self::parse(&dotted))
    }
}
