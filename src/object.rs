//! PDF object model for the writer.
//!
//! A deliberately small subset of the PDF object types, only what the
//! generators in this crate emit. Literal strings are stored as Rust strings
//! and escaped/encoded at serialization time, so call sites cannot leak an
//! unescaped operand into the byte stream.

use std::collections::HashMap;

/// A PDF object to be serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Integer number
    Integer(i64),
    /// Real number
    Real(f64),
    /// Name, written as `/Name`
    Name(String),
    /// Literal string, written as `(...)` with escaping and WinAnsi-like
    /// byte encoding applied during serialization
    LiteralString(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary with name keys; keys are sorted when written for
    /// deterministic output
    Dictionary(HashMap<String, Object>),
    /// Stream object: dictionary plus raw data. `/Length` is filled in from
    /// the exact byte length of `data` when written.
    Stream {
        /// Stream dictionary (without `/Length`)
        dict: HashMap<String, Object>,
        /// Raw stream body, emitted verbatim
        data: Vec<u8>,
    },
    /// Indirect reference, written as `{id} 0 R` (every object this crate
    /// emits has generation 0)
    Reference(u32),
}

impl Object {
    /// Create a Name object.
    pub fn name(s: &str) -> Object {
        Object::Name(s.to_string())
    }

    /// Create a literal string object.
    pub fn string(s: &str) -> Object {
        Object::LiteralString(s.to_string())
    }

    /// Create an Integer object.
    pub fn integer(i: i64) -> Object {
        Object::Integer(i)
    }

    /// Create a Real object.
    pub fn real(r: f64) -> Object {
        Object::Real(r)
    }

    /// Create an Array object.
    pub fn array(items: Vec<Object>) -> Object {
        Object::Array(items)
    }

    /// Create a Dictionary object from key/value pairs.
    pub fn dict(entries: Vec<(&str, Object)>) -> Object {
        Object::Dictionary(entries_to_map(entries))
    }

    /// Create a Stream object from dictionary entries and body bytes.
    pub fn stream(entries: Vec<(&str, Object)>, data: Vec<u8>) -> Object {
        Object::Stream {
            dict: entries_to_map(entries),
            data,
        }
    }

    /// Create a Reference object.
    pub fn reference(id: u32) -> Object {
        Object::Reference(id)
    }

    /// Create a rectangle array `[llx lly urx ury]` from origin and size.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Object {
        Object::Array(vec![
            Object::Real(x),
            Object::Real(y),
            Object::Real(x + width),
            Object::Real(y + height),
        ])
    }
}

fn entries_to_map(entries: Vec<(&str, Object)>) -> HashMap<String, Object> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
