//! PDF object serialization.
//!
//! Serializes [`Object`] values to their byte representation following the
//! PDF syntax rules. Literal strings pass through the crate's escape/encode
//! pipeline here, at the last possible moment.

use crate::encoding;
use crate::object::Object;
use std::collections::HashMap;
use std::io::Write;

/// Serializer for PDF objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Create a new object serializer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> Vec<u8> {
        let mut buf = Vec::new();
        // Writes to Vec<u8> cannot fail.
        self.write_object(&mut buf, obj).expect("write to Vec");
        buf
    }

    /// Serialize an indirect object definition.
    ///
    /// Format: `{id} 0 obj\n{object}\nendobj\n`
    pub fn serialize_indirect(&self, id: u32, obj: &Object) -> Vec<u8> {
        let mut buf = Vec::new();
        writeln!(buf, "{} 0 obj", id).expect("write to Vec");
        self.write_object(&mut buf, obj).expect("write to Vec");
        write!(buf, "\nendobj\n").expect("write to Vec");
        buf
    }

    /// Serialize an object to a string (for debugging and tests).
    pub fn serialize_to_string(&self, obj: &Object) -> String {
        String::from_utf8_lossy(&self.serialize(obj)).to_string()
    }

    fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> std::io::Result<()> {
        match obj {
            Object::Integer(i) => write!(w, "{}", i),
            Object::Real(r) => self.write_real(w, *r),
            Object::Name(n) => write!(w, "/{}", n),
            Object::LiteralString(s) => {
                write!(w, "(")?;
                w.write_all(&encoding::encode_literal(s))?;
                write!(w, ")")
            },
            Object::Array(arr) => self.write_array(w, arr),
            Object::Dictionary(dict) => self.write_dictionary(w, dict),
            Object::Stream { dict, data } => self.write_stream(w, dict, data),
            Object::Reference(id) => write!(w, "{} 0 R", id),
        }
    }

    /// Write a real number, trimming trailing zeros for compact output.
    fn write_real<W: Write>(&self, w: &mut W, value: f64) -> std::io::Result<()> {
        if value.fract() == 0.0 {
            write!(w, "{}", value as i64)
        } else {
            let formatted = format!("{:.5}", value);
            let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
            write!(w, "{}", trimmed)
        }
    }

    fn write_array<W: Write>(&self, w: &mut W, arr: &[Object]) -> std::io::Result<()> {
        write!(w, "[")?;
        for (i, obj) in arr.iter().enumerate() {
            if i > 0 {
                write!(w, " ")?;
            }
            self.write_object(w, obj)?;
        }
        write!(w, "]")
    }

    fn write_dictionary<W: Write>(
        &self,
        w: &mut W,
        dict: &HashMap<String, Object>,
    ) -> std::io::Result<()> {
        write!(w, "<<")?;

        // Sort keys for deterministic output
        let mut keys: Vec<_> = dict.keys().collect();
        keys.sort();

        for key in keys {
            if let Some(value) = dict.get(key) {
                write!(w, " /{} ", key)?;
                self.write_object(w, value)?;
            }
        }
        write!(w, " >>")
    }

    fn write_stream<W: Write>(
        &self,
        w: &mut W,
        dict: &HashMap<String, Object>,
        data: &[u8],
    ) -> std::io::Result<()> {
        // /Length must be the exact byte length of the body as emitted.
        let mut dict_with_length = dict.clone();
        dict_with_length.insert("Length".to_string(), Object::Integer(data.len() as i64));

        self.write_dictionary(w, &dict_with_length)?;
        write!(w, "\nstream\n")?;
        w.write_all(data)?;
        write!(w, "\nendstream")
    }
}
