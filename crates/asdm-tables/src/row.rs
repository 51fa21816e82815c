//! The row contract shared by every table.
//!
//! A row type declares its [`TableSchema`] (name, key, key style, canonical
//! attribute order) and implements the comparisons and codecs the generic
//! [`Table`](crate::Table) engine relies on.

use std::fmt;
use std::hash::Hash;

use asdm_codec::{BinReader, BinWriter, XmlDocWriter, XmlElement, XmlValue};

use crate::error::{AsdmError, Result};
use crate::registry::TableName;

/// How a table identifies its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    /// The caller supplies every key attribute.
    Natural,
    /// The table assigns a surrogate `Tag` to the named attribute on `add`.
    AutoIncrement { attribute: &'static str },
}

/// Static description of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub table: TableName,
    /// Key attribute names.
    pub key: &'static [&'static str],
    pub key_style: KeyStyle,
    /// Every attribute name in canonical order: key, required, then optional.
    pub attributes: &'static [&'static str],
}

impl TableSchema {
    pub const fn name(&self) -> &'static str {
        self.table.as_str()
    }

    /// Root element and entity type name of the table's documents.
    pub fn entity_type_name(&self) -> String {
        format!("{}Table", self.name())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(&name)
    }

    pub fn is_auto_increment(&self) -> bool {
        matches!(self.key_style, KeyStyle::AutoIncrement { .. })
    }
}

/// Whether a row belongs to a table. Ignored by row equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct Membership(bool);

impl Membership {
    pub fn is_added(&self) -> bool {
        self.0
    }

    pub(crate) fn set(&mut self, added: bool) {
        self.0 = added;
    }
}

impl PartialEq for Membership {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

mod sealed {
    /// Passed by the table engine to the row hooks that touch keys and
    /// membership. Only this crate can build one.
    #[derive(Debug, Clone, Copy)]
    pub struct Token(pub(crate) ());
}

pub(crate) use sealed::Token;

pub(crate) const TOKEN: Token = Token(());

/// A row of one ASDM table.
///
/// The hooks taking a [`Token`] are reserved to the table engine, so an
/// added row cannot be re-keyed from outside the crate:
///
/// ```compile_fail
/// use asdm_tables::{AsdmRow, StationRow};
///
/// let mut row = StationRow::default();
/// row.assign_surrogate(42);
/// ```
pub trait AsdmRow: Clone + PartialEq + fmt::Debug + Default + 'static {
    type Key: Clone + Eq + Hash + fmt::Debug + fmt::Display;

    const SCHEMA: TableSchema;

    fn key(&self) -> Self::Key;

    fn membership(&self) -> &Membership;

    fn membership_mut(&mut self, token: Token) -> &mut Membership;

    fn is_added(&self) -> bool {
        self.membership().is_added()
    }

    /// Equality over the mandatory attributes outside the key.
    fn equal_required_values(&self, other: &Self) -> bool;

    /// Equality over every mandatory attribute except a surrogate key.
    fn equal_no_auto_inc(&self, other: &Self) -> bool;

    /// Text joining the mandatory values that are not a surrogate key.
    fn natural_key(&self) -> String {
        self.key().to_string()
    }

    /// Store a surrogate index in the auto-increment attribute.
    fn assign_surrogate(&mut self, _index: u32, _token: Token) {}

    /// Write one `<row>` element.
    fn write_xml(&self, writer: &mut XmlDocWriter) -> asdm_codec::Result<()>;

    /// Build a row from a `<row>` element.
    fn read_xml(element: &XmlElement) -> asdm_codec::Result<Self>;

    /// Write every attribute in canonical order.
    fn write_bin(&self, writer: &mut BinWriter) -> asdm_codec::Result<()>;

    /// Decode the attribute called `name`. Returns `false` for a name the
    /// row does not know, leaving the reader untouched.
    fn read_bin_attribute(
        &mut self,
        name: &str,
        reader: &mut BinReader<'_>,
        token: Token,
    ) -> asdm_codec::Result<bool>;
}

/// Fail with `IllegalAccess` when `row` is already in its table.
pub(crate) fn ensure_mutable_key<R: AsdmRow>(row: &R, attribute: &str) -> Result<()> {
    if row.is_added() {
        return Err(AsdmError::illegal_access(R::SCHEMA.name(), attribute));
    }
    Ok(())
}

/// Dereference an optional attribute, failing with `IllegalAccess` when absent.
pub(crate) fn require_optional<'a, R: AsdmRow, T>(
    value: Option<&'a T>,
    attribute: &str,
) -> Result<&'a T> {
    value.ok_or_else(|| AsdmError::illegal_access(R::SCHEMA.name(), attribute))
}

pub(crate) fn write_value<T: XmlValue>(
    w: &mut XmlDocWriter,
    name: &str,
    value: &T,
) -> asdm_codec::Result<()> {
    w.text_element(name, &value.to_xml_text())
}

pub(crate) fn write_optional<T: XmlValue>(
    w: &mut XmlDocWriter,
    name: &str,
    value: Option<&T>,
) -> asdm_codec::Result<()> {
    match value {
        Some(v) => write_value(w, name, v),
        None => Ok(()),
    }
}

pub(crate) fn write_array<T: XmlValue>(
    w: &mut XmlDocWriter,
    name: &str,
    values: &[T],
) -> asdm_codec::Result<()> {
    w.text_element(name, &asdm_codec::format_array(values))
}

pub(crate) fn write_optional_array<T: XmlValue>(
    w: &mut XmlDocWriter,
    name: &str,
    values: Option<&Vec<T>>,
) -> asdm_codec::Result<()> {
    match values {
        Some(v) => write_array(w, name, v),
        None => Ok(()),
    }
}

pub(crate) fn write_matrix<T: XmlValue>(
    w: &mut XmlDocWriter,
    name: &str,
    values: &[Vec<T>],
) -> asdm_codec::Result<()> {
    w.text_element(name, &asdm_codec::format_matrix(values)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_ignored_by_equality() {
        let mut added = Membership::default();
        added.set(true);
        assert!(added.is_added());
        assert_eq!(added, Membership::default());
    }
}
