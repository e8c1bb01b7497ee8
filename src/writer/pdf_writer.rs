//! PDF document assembly.
//!
//! [`PdfWriter`] is the shared primitive behind every generator: it owns the
//! ordered object list, tracks byte offsets as objects are concatenated after
//! the `%PDF-1.4` header, and emits the cross-reference table and trailer.
//!
//! Object IDs are implicit: an object's 1-based position of first appearance
//! is its ID (ID 0 is the xref free-list head). By convention object 1 is
//! always the `/Catalog` pointing at object 2, the `/Pages` node; every
//! generator in this crate relies on this and reserves the Pages slot up
//! front, backfilling its `/Kids` list once the page count is known.

use super::object_serializer::ObjectSerializer;
use crate::error::{Error, Result};
use crate::object::Object;
use std::io::Write;

/// PDF file header. Offsets in the xref table are measured from the first
/// byte of this header.
const PDF_HEADER: &[u8] = b"%PDF-1.4\n";

/// The Catalog always occupies object slot 1.
pub const CATALOG_ID: u32 = 1;
/// The Pages node always occupies object slot 2.
pub const PAGES_ID: u32 = 2;

/// One slot in the ordered object list.
enum Slot {
    /// Fully serialized indirect object (including its `obj`/`endobj` frame)
    Written(Vec<u8>),
    /// Pre-reserved slot whose content is backfilled later, keeping all
    /// later object IDs stable
    Reserved,
}

/// Assembles a complete PDF document from an ordered list of objects.
pub struct PdfWriter {
    slots: Vec<Slot>,
    serializer: ObjectSerializer,
}

impl PdfWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            serializer: ObjectSerializer::new(),
        }
    }

    /// Create a writer with the Catalog/Pages scaffolding every generator
    /// shares: object 1 is the Catalog referencing object 2, and object 2 is
    /// reserved for the Pages node.
    pub fn with_catalog() -> Self {
        let mut writer = Self::new();
        let catalog = writer.add_object(&Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::reference(PAGES_ID)),
        ]));
        debug_assert_eq!(catalog, CATALOG_ID);
        let pages = writer.reserve_object();
        debug_assert_eq!(pages, PAGES_ID);
        writer
    }

    /// Append an object, returning its assigned ID.
    pub fn add_object(&mut self, obj: &Object) -> u32 {
        let id = self.slots.len() as u32 + 1;
        self.slots
            .push(Slot::Written(self.serializer.serialize_indirect(id, obj)));
        id
    }

    /// Reserve a slot for an object whose content is not yet known.
    ///
    /// The returned ID may be referenced immediately; [`fill_object`] must be
    /// called before [`finalize`].
    ///
    /// [`fill_object`]: PdfWriter::fill_object
    /// [`finalize`]: PdfWriter::finalize
    pub fn reserve_object(&mut self) -> u32 {
        let id = self.slots.len() as u32 + 1;
        self.slots.push(Slot::Reserved);
        id
    }

    /// Backfill a reserved slot with its final content.
    pub fn fill_object(&mut self, id: u32, obj: &Object) -> Result<()> {
        let slot = self
            .slots
            .get_mut(id as usize - 1)
            .ok_or(Error::NotReserved(id))?;
        match slot {
            Slot::Reserved => {
                *slot = Slot::Written(self.serializer.serialize_indirect(id, obj));
                Ok(())
            },
            Slot::Written(_) => Err(Error::NotReserved(id)),
        }
    }

    /// Backfill the reserved Pages node from the emitted page IDs.
    pub fn fill_pages(&mut self, page_ids: &[u32]) -> Result<()> {
        let kids: Vec<Object> = page_ids.iter().map(|&id| Object::reference(id)).collect();
        self.fill_object(
            PAGES_ID,
            &Object::dict(vec![
                ("Type", Object::name("Pages")),
                ("Kids", Object::array(kids)),
                ("Count", Object::integer(page_ids.len() as i64)),
            ]),
        )
    }

    /// Number of objects added or reserved so far.
    pub fn object_count(&self) -> usize {
        self.slots.len()
    }

    /// Produce the final document bytes: header, objects in order, xref
    /// table, trailer.
    ///
    /// Fails if any reserved slot was never filled, since emitting a dangling
    /// reference would corrupt the document.
    pub fn finalize(self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.extend_from_slice(PDF_HEADER);

        let mut offsets = Vec::with_capacity(self.slots.len());
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Written(bytes) => {
                    offsets.push(out.len());
                    out.extend_from_slice(bytes);
                },
                Slot::Reserved => {
                    return Err(Error::UnfilledReservation(index as u32 + 1));
                },
            }
        }

        let xref_start = out.len();
        let total = self.slots.len();
        write!(out, "xref\n0 {}\n", total + 1)?;
        // Entry for object 0, the free-list head.
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            // Fixed-width 20-byte entries.
            write!(out, "{:010} 00000 n \n", offset)?;
        }

        write!(
            out,
            "trailer\n<< /Size {} /Root {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            total + 1,
            CATALOG_ID,
            xref_start
        )?;

        Ok(out)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}
