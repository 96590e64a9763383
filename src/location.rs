//! Document locations
//!
//! A [`Location`] points at a value inside a source document as a sequence of
//! keys. `report_on_key` narrows it to the key of that value, used when the
//! value itself is wrong or absent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A single path segment: object property or array index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Index(usize),
    Prop(String),
}

impl Key {
    pub fn as_prop(&self) -> Option<&str> {
        match self {
            Key::Prop(p) => Some(p),
            Key::Index(_) => None,
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Prop(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Prop(s)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Prop(p) => f.write_str(&escape_pointer(p)),
        }
    }
}

/// Position of a value (or its key) in a source document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub source: Arc<str>,
    pub pointer: Vec<Key>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub report_on_key: bool,
}

impl Location {
    /// Root of `source`
    pub fn root(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
            pointer: Vec::new(),
            report_on_key: false,
        }
    }

    /// Location of a descendant value
    pub fn child<K, I>(&self, segments: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = K>,
    {
        let mut pointer = self.pointer.clone();
        pointer.extend(segments.into_iter().map(Into::into));
        Self {
            source: self.source.clone(),
            pointer,
            report_on_key: false,
        }
    }

    /// Narrow to the key of this value
    pub fn key(&self) -> Self {
        Self {
            report_on_key: true,
            ..self.clone()
        }
    }

    /// Last path segment, if any
    pub fn last_key(&self) -> Option<&Key> {
        self.pointer.last()
    }

    /// Absolute JSON pointer, e.g. `#/paths/~1pets/get`
    pub fn pointer_string(&self) -> String {
        let mut s = String::from("#");
        for key in &self.pointer {
            s.push('/');
            s.push_str(&key.to_string());
        }
        s
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.source, self.pointer_string())?;
        if self.report_on_key {
            write!(f, " (key)")?;
        }
        Ok(())
    }
}

/// Escape a property name as a JSON-pointer segment
pub fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Reverse of [`escape_pointer`]
pub fn unescape_pointer(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
