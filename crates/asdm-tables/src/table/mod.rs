//! Generic table engine.
//!
//! A [`Table`] keeps rows in insertion order next to a key index. Tables with
//! an auto-increment key also remember which surrogate each natural key
//! received, so re-adding content that is already present returns the
//! existing row instead of allocating a new identifier.
//!
//! # Insertion paths
//!
//! | Method                         | Used by       | Content duplicate     | Key collision  |
//! |--------------------------------|---------------|-----------------------|----------------|
//! | [`Table::add`]                 | clients       | returns existing row  | `DuplicateKey` |
//! | [`Table::check_and_add`]       | file loaders  | `UniquenessViolation` | `DuplicateKey` |
//! | [`Table::add_without_checking_unique`] | file loaders | appended      | `DuplicateKey` |

mod file;
mod mime;
mod xml;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};

use asdm_codec::BinReader;
use asdm_model::Entity;
use tracing::warn;

use crate::capability::{Nameable, TableHandle};
use crate::error::{AsdmError, Result};
use crate::row::{AsdmRow, KeyStyle, TOKEN};

/// Consumes the bytes of an attribute the row type does not know.
pub type UnknownAttributeReader = Box<dyn Fn(&mut BinReader<'_>) -> asdm_codec::Result<()>>;

/// An ordered collection of rows of one type.
pub struct Table<R: AsdmRow> {
    rows: Vec<R>,
    index: HashMap<R::Key, usize>,
    /// Natural key text to the position of the row holding it.
    surrogates: HashMap<String, usize>,
    entity: Entity,
    file_as_bin: bool,
    unknown_attribute_readers: HashMap<String, UnknownAttributeReader>,
}

/// Mutable handle on a row already in its table.
///
/// A row swapped in under another key is put back when the handle drops, so
/// the key index never goes stale. A same-key replacement is kept and stays
/// added.
pub struct RowMut<'a, R: AsdmRow> {
    row: &'a mut R,
    saved: R,
}

impl<'a, R: AsdmRow> RowMut<'a, R> {
    fn new(row: &'a mut R) -> Self {
        let saved = row.clone();
        Self { row, saved }
    }
}

impl<R: AsdmRow> Deref for RowMut<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        &*self.row
    }
}

impl<R: AsdmRow> DerefMut for RowMut<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut *self.row
    }
}

impl<R: AsdmRow> fmt::Debug for RowMut<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.row, f)
    }
}

impl<R: AsdmRow> Drop for RowMut<'_, R> {
    fn drop(&mut self) {
        if self.row.key() != self.saved.key() {
            warn!(
                table = R::SCHEMA.name(),
                key = %self.saved.key(),
                replaced_by = %self.row.key(),
                "row replaced under another key, restoring it"
            );
            mem::swap(self.row, &mut self.saved);
        } else if !self.row.is_added() {
            self.row.membership_mut(TOKEN).set(true);
        }
    }
}

impl<R: AsdmRow> Default for Table<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AsdmRow> fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &R::SCHEMA.name())
            .field("rows", &self.rows.len())
            .field("entity", &self.entity)
            .field("file_as_bin", &self.file_as_bin)
            .finish_non_exhaustive()
    }
}

impl<R: AsdmRow> Table<R> {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
            surrogates: HashMap::new(),
            entity: Entity::for_type(R::SCHEMA.entity_type_name()),
            file_as_bin: false,
            unknown_attribute_readers: HashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        R::SCHEMA.name()
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in insertion order.
    pub fn get(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.rows.iter()
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn set_entity(&mut self, entity: Entity) {
        self.entity = entity;
    }

    pub fn is_file_as_bin(&self) -> bool {
        self.file_as_bin
    }

    pub fn set_file_as_bin(&mut self, file_as_bin: bool) {
        self.file_as_bin = file_as_bin;
    }

    /// A fresh row with default values, not yet part of the table.
    pub fn new_row(&self) -> R {
        R::default()
    }

    /// A copy of `other`, not yet part of the table.
    pub fn new_row_from(&self, other: &R) -> R {
        let mut row = other.clone();
        row.membership_mut(TOKEN).set(false);
        row
    }

    /// Add `row`, or return the row already holding the same content.
    ///
    /// Natural-key tables fail with `DuplicateKey` when the key is taken by a
    /// row with different values. Auto-increment tables assign the surrogate
    /// key; the value passed in is ignored. A failed add leaves the table
    /// unchanged.
    pub fn add(&mut self, mut row: R) -> Result<&R> {
        let existing = match R::SCHEMA.key_style {
            KeyStyle::Natural => match self.index.get(&row.key()) {
                Some(&i) if self.rows[i].equal_required_values(&row) => Some(i),
                Some(_) => return Err(AsdmError::duplicate_key(self.name())),
                None => None,
            },
            KeyStyle::AutoIncrement { .. } => {
                let found = self.find_same_content(&row);
                if found.is_none() {
                    self.assign_free_surrogate(&mut row);
                }
                found
            }
        };
        match existing {
            Some(i) => Ok(&self.rows[i]),
            None => Ok(self.push(row)),
        }
    }

    /// Append a row read from a file.
    ///
    /// With `check_uniqueness`, an auto-increment table rejects a row whose
    /// content duplicates an existing row. A key collision is always an error.
    pub fn check_and_add(&mut self, row: R, check_uniqueness: bool) -> Result<&R> {
        if check_uniqueness
            && R::SCHEMA.is_auto_increment()
            && self.find_same_content(&row).is_some()
        {
            return Err(AsdmError::uniqueness_violation(self.name()));
        }
        self.add_without_checking_unique(row)
    }

    /// Append a row after checking only for a key collision.
    pub fn add_without_checking_unique(&mut self, row: R) -> Result<&R> {
        if self.index.contains_key(&row.key()) {
            return Err(AsdmError::duplicate_key(self.name()));
        }
        Ok(self.push(row))
    }

    pub fn get_row_by_key(&self, key: &R::Key) -> Option<&R> {
        self.index.get(key).map(|&i| &self.rows[i])
    }

    /// Mutable access for updating value attributes. Key setters on the
    /// returned row fail with `IllegalAccess`.
    pub fn get_row_by_key_mut(&mut self, key: &R::Key) -> Option<RowMut<'_, R>> {
        let &i = self.index.get(key)?;
        self.rows.get_mut(i).map(RowMut::new)
    }

    /// Like [`Table::get_row_by_key`], failing with `NoSuchRow`.
    pub fn row_by_key(&self, key: &R::Key) -> Result<&R> {
        self.get_row_by_key(key)
            .ok_or_else(|| AsdmError::no_such_row(self.name(), key))
    }

    /// First row equal to `row` on every mandatory attribute except a
    /// surrogate key.
    pub fn lookup(&self, row: &R) -> Option<&R> {
        self.find_same_content(row).map(|i| &self.rows[i])
    }

    /// Register a reader for a binary attribute the row type does not know.
    pub fn set_unknown_attribute_binary_reader(
        &mut self,
        attribute: &str,
        reader: UnknownAttributeReader,
    ) -> Result<()> {
        if R::SCHEMA.has_attribute(attribute) {
            return Err(AsdmError::conversion(
                self.name(),
                format!("'{attribute}' is a known attribute; it cannot have an unknown-attribute reader"),
            ));
        }
        self.unknown_attribute_readers
            .insert(attribute.to_string(), reader);
        Ok(())
    }

    pub(crate) fn unknown_attribute_reader(&self, attribute: &str) -> Option<&UnknownAttributeReader> {
        self.unknown_attribute_readers.get(attribute)
    }

    fn find_same_content(&self, row: &R) -> Option<usize> {
        if R::SCHEMA.is_auto_increment() {
            if let Some(&i) = self.surrogates.get(&row.natural_key()) {
                if self.rows[i].equal_no_auto_inc(row) {
                    return Some(i);
                }
            }
        }
        self.rows.iter().position(|r| r.equal_no_auto_inc(row))
    }

    /// Smallest surrogate at or above the table size not used as a key.
    fn assign_free_surrogate(&mut self, row: &mut R) {
        let mut candidate = u32::try_from(self.rows.len()).unwrap_or(u32::MAX);
        loop {
            row.assign_surrogate(candidate, TOKEN);
            if !self.index.contains_key(&row.key()) || candidate == u32::MAX {
                return;
            }
            candidate += 1;
        }
    }

    fn push(&mut self, mut row: R) -> &R {
        let position = self.rows.len();
        row.membership_mut(TOKEN).set(true);
        self.index.insert(row.key(), position);
        if R::SCHEMA.is_auto_increment() {
            self.surrogates.entry(row.natural_key()).or_insert(position);
        }
        self.rows.push(row);
        &self.rows[position]
    }
}

impl<'a, R: AsdmRow> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<R: AsdmRow> Nameable for Table<R> {
    fn name(&self) -> &'static str {
        R::SCHEMA.name()
    }
}

impl<R: AsdmRow> TableHandle for Table<R> {
    fn size(&self) -> usize {
        self.rows.len()
    }

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn set_entity(&mut self, entity: Entity) {
        self.entity = entity;
    }

    fn is_file_as_bin(&self) -> bool {
        self.file_as_bin
    }

    fn set_file_as_bin(&mut self, file_as_bin: bool) {
        self.file_as_bin = file_as_bin;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
