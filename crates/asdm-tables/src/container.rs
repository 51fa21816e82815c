//! The dataset container.
//!
//! An [`Asdm`] owns one table per [`TableName`]. Tables are materialised on
//! first access: a table declared non-empty by the manifest of the directory
//! the dataset was read from is loaded from its file at that point; any other
//! table starts empty.
//!
//! # Directory layout
//!
//! ```text
//! ASDM.xml          manifest: dataset entity, creation time, one entry per table
//! <Table>.xml       table document, or the header part of a binary table
//! <Table>.bin       MIME message of a binary table
//! ```

use std::cell::OnceCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use asdm_codec::{XmlDocWriter, XmlElement, parse_entity};
use asdm_model::{ArrayTime, Entity};
use tracing::{debug, info, info_span, warn};

use crate::capability::{FileStorable, TableHandle};
use crate::error::{AsdmError, Result};
use crate::options::{ParseOptions, SaveOptions};
use crate::registry::TableName;
use crate::row::AsdmRow;
use crate::table::Table;

/// Name used for the manifest file and in container error messages.
pub const CONTAINER_NAME: &str = "ASDM";

const MANIFEST_FILE: &str = "ASDM.xml";
const BINARY_MANIFEST_FILE: &str = "ASDM.bin";

/// What the manifest declared about one table.
#[derive(Debug, Clone, Default)]
struct ManifestEntry {
    number_rows: usize,
    entity: Option<Entity>,
}

/// A dataset: the container entity, its creation time and every table.
pub struct Asdm {
    entity: Entity,
    time_of_creation: ArrayTime,
    tables: Vec<OnceCell<Box<dyn TableHandle>>>,
    declared: Vec<ManifestEntry>,
    source: Option<PathBuf>,
    parse_options: ParseOptions,
}

impl Default for Asdm {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Asdm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loaded: Vec<&str> = TableName::ALL
            .iter()
            .filter(|n| self.is_loaded(**n))
            .map(|n| n.as_str())
            .collect();
        f.debug_struct("Asdm")
            .field("entity", &self.entity)
            .field("time_of_creation", &self.time_of_creation)
            .field("source", &self.source)
            .field("loaded", &loaded)
            .finish_non_exhaustive()
    }
}

fn fresh_tables() -> Vec<OnceCell<Box<dyn TableHandle>>> {
    TableName::ALL.iter().map(|_| OnceCell::new()).collect()
}

impl Asdm {
    /// An empty dataset stamped with the current time.
    pub fn new() -> Self {
        Self {
            entity: Entity::for_type(CONTAINER_NAME),
            time_of_creation: ArrayTime::now(),
            tables: fresh_tables(),
            declared: vec![ManifestEntry::default(); TableName::ALL.len()],
            source: None,
            parse_options: ParseOptions::default(),
        }
    }

    /// Read the dataset stored in `directory`.
    pub fn from_directory(directory: impl AsRef<Path>, options: &ParseOptions) -> Result<Self> {
        let mut asdm = Self::new();
        asdm.set_from_file(directory, options)?;
        Ok(asdm)
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn set_entity(&mut self, entity: Entity) {
        self.entity = entity;
    }

    pub fn time_of_creation(&self) -> ArrayTime {
        self.time_of_creation
    }

    pub fn set_time_of_creation(&mut self, time: ArrayTime) {
        self.time_of_creation = time;
    }

    /// Every table name, in manifest order.
    pub fn table_names(&self) -> &'static [TableName] {
        &TableName::ALL
    }

    /// Whether the table has been materialised.
    pub fn is_loaded(&self, name: TableName) -> bool {
        self.tables[name.index()].get().is_some()
    }

    /// Row count of a table, or the count the manifest declared for a table
    /// not loaded yet.
    pub fn number_rows(&self, name: TableName) -> usize {
        match self.tables[name.index()].get() {
            Some(table) => table.size(),
            None => self.declared[name.index()].number_rows,
        }
    }

    /// Row count the manifest that was read declared for a table, whether or
    /// not the table has been loaded since. Zero for a dataset built in memory.
    pub fn declared_rows(&self, name: TableName) -> usize {
        self.declared[name.index()].number_rows
    }

    /// The table called `name`. Fails with `InvalidArgument` for an unknown name.
    pub fn get_table(&self, name: &str) -> Result<&dyn TableHandle> {
        self.handle(name.parse()?)
    }

    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut dyn TableHandle> {
        self.handle_mut(name.parse()?)
    }

    /// Typed access, e.g. `asdm.table::<StationRow>()`.
    pub fn table<R: AsdmRow>(&self) -> Result<&Table<R>> {
        self.handle(R::SCHEMA.table)?
            .as_any()
            .downcast_ref::<Table<R>>()
            .ok_or_else(|| mismatched_table::<R>())
    }

    pub fn table_mut<R: AsdmRow>(&mut self) -> Result<&mut Table<R>> {
        self.handle_mut(R::SCHEMA.table)?
            .as_any_mut()
            .downcast_mut::<Table<R>>()
            .ok_or_else(|| mismatched_table::<R>())
    }

    fn handle(&self, name: TableName) -> Result<&dyn TableHandle> {
        let cell = &self.tables[name.index()];
        if cell.get().is_none() {
            let table = self.load_table(name)?;
            // Only this method fills the cell, so it is still empty here.
            let _ = cell.set(table);
        }
        cell.get()
            .map(|table| &**table)
            .ok_or_else(|| AsdmError::conversion(name.as_str(), "table could not be materialised"))
    }

    fn handle_mut(&mut self, name: TableName) -> Result<&mut dyn TableHandle> {
        self.handle(name)?;
        match self.tables[name.index()].get_mut() {
            Some(table) => Ok(&mut **table),
            None => Err(AsdmError::conversion(
                name.as_str(),
                "table could not be materialised",
            )),
        }
    }

    fn load_table(&self, name: TableName) -> Result<Box<dyn TableHandle>> {
        let mut table = name.new_table();
        let entry = &self.declared[name.index()];
        if let Some(entity) = &entry.entity {
            table.set_entity(entity.clone());
        }
        let Some(directory) = self.source.as_deref() else {
            return Ok(table);
        };
        if entry.number_rows == 0 {
            return Ok(table);
        }

        let span = info_span!("load_table", table = name.as_str());
        let _guard = span.enter();
        table.set_from_file(directory, &self.parse_options)?;
        if table.size() != entry.number_rows {
            warn!(
                declared = entry.number_rows,
                loaded = table.size(),
                "manifest row count differs from the table file"
            );
        }
        debug!(rows = table.size(), binary = table.is_file_as_bin(), "loaded table");
        Ok(table)
    }

    /// The manifest document.
    pub fn to_xml(&self) -> Result<String> {
        let mut w = XmlDocWriter::new();
        self.write_manifest(&mut w)
            .map_err(|e| AsdmError::conversion(CONTAINER_NAME, e))?;
        w.finish()
            .map_err(|e| AsdmError::conversion(CONTAINER_NAME, e))
    }

    fn write_manifest(&self, w: &mut XmlDocWriter) -> asdm_codec::Result<()> {
        w.declaration()?;
        w.start(CONTAINER_NAME, &[])?;
        w.entity("Entity", &self.entity)?;
        w.text_element("TimeOfCreation", &self.time_of_creation.to_fits())?;
        for name in TableName::ALL {
            let rows = self.number_rows(name);
            w.start("Table", &[])?;
            w.text_element("Name", name.as_str())?;
            w.text_element("NumberRows", &rows.to_string())?;
            if rows > 0 {
                w.entity("Entity", &self.table_entity(name))?;
            }
            w.end("Table")?;
        }
        w.end(CONTAINER_NAME)
    }

    fn table_entity(&self, name: TableName) -> Entity {
        match self.tables[name.index()].get() {
            Some(table) => table.entity().clone(),
            None => self.declared[name.index()]
                .entity
                .clone()
                .unwrap_or_else(|| Entity::for_type(format!("{name}Table"))),
        }
    }

    /// Replace the dataset entity, creation time and table declarations with
    /// those of a manifest document. Every table is reset.
    pub fn from_xml(&mut self, xml: &str) -> Result<()> {
        let conversion = |e: asdm_codec::CodecError| AsdmError::conversion(CONTAINER_NAME, e);
        let doc = XmlElement::parse_document(xml).map_err(conversion)?;
        if doc.name != CONTAINER_NAME {
            return Err(AsdmError::conversion(
                CONTAINER_NAME,
                format!("root element <{}> is not <{CONTAINER_NAME}>", doc.name),
            ));
        }
        let entity = doc
            .required_child("Entity")
            .and_then(parse_entity)
            .map_err(conversion)?;
        if entity.entity_type_name != CONTAINER_NAME {
            return Err(AsdmError::conversion(
                CONTAINER_NAME,
                format!(
                    "entity type name '{}' is not '{CONTAINER_NAME}'",
                    entity.entity_type_name
                ),
            ));
        }
        let time_text = doc
            .required_child("TimeOfCreation")
            .map_err(conversion)?
            .text();
        let time_of_creation = ArrayTime::from_fits(time_text)
            .map_err(|e| AsdmError::conversion(CONTAINER_NAME, e))?;

        let mut declared = vec![ManifestEntry::default(); TableName::ALL.len()];
        for element in doc.children_named("Table") {
            let table_name = element
                .required_child("Name")
                .map_err(conversion)?
                .text();
            let number_rows: i64 = element.value("NumberRows").map_err(conversion)?;
            let Ok(name) = table_name.parse::<TableName>() else {
                warn!(table = table_name, rows = number_rows, "ignoring unknown table in manifest");
                continue;
            };
            let number_rows = usize::try_from(number_rows).map_err(|_| {
                AsdmError::conversion(name.as_str(), format!("negative row count {number_rows}"))
            })?;
            let entity = match element.child("Entity") {
                Some(e) => Some(parse_entity(e).map_err(conversion)?),
                None if number_rows > 0 => {
                    return Err(AsdmError::conversion(
                        name.as_str(),
                        "manifest entry of a non-empty table has no Entity",
                    ));
                }
                None => None,
            };
            if let Some(entity) = &entity {
                let expected = format!("{name}Table");
                if entity.entity_type_name != expected {
                    return Err(AsdmError::conversion(
                        name.as_str(),
                        format!(
                            "manifest entity type name '{}' is not '{expected}'",
                            entity.entity_type_name
                        ),
                    ));
                }
            }
            declared[name.index()] = ManifestEntry {
                number_rows,
                entity,
            };
        }

        self.entity = entity;
        self.time_of_creation = time_of_creation;
        self.declared = declared;
        self.tables = fresh_tables();
        Ok(())
    }

    /// Read the manifest in `directory`. Tables declared non-empty are loaded
    /// now, or on first access with `load_tables_on_demand`.
    pub fn set_from_file(&mut self, directory: impl AsRef<Path>, options: &ParseOptions) -> Result<()> {
        let directory = directory.as_ref();
        let span = info_span!("load_dataset", path = %directory.display());
        let _guard = span.enter();

        let manifest = directory.join(MANIFEST_FILE);
        if !manifest.is_file() {
            let message = if directory.join(BINARY_MANIFEST_FILE).is_file() {
                format!(
                    "{} not found; binary manifests are not supported",
                    manifest.display()
                )
            } else {
                format!("{} not found", manifest.display())
            };
            return Err(AsdmError::conversion(CONTAINER_NAME, message));
        }
        let xml = fs::read_to_string(&manifest)
            .map_err(|e| AsdmError::io(CONTAINER_NAME, &manifest, &e))?;
        self.from_xml(&xml)?;
        self.source = Some(directory.to_path_buf());
        self.parse_options = options.clone();

        if !options.load_tables_on_demand {
            for name in TableName::ALL {
                if self.declared[name.index()].number_rows > 0 {
                    self.handle(name)?;
                }
            }
        }
        info!(
            entity_id = %self.entity.entity_id,
            on_demand = options.load_tables_on_demand,
            "loaded dataset"
        );
        Ok(())
    }

    /// Write the dataset into `directory` with default options.
    pub fn to_file(&self, directory: impl AsRef<Path>) -> Result<()> {
        self.to_file_with(directory, &SaveOptions::default())
    }

    /// Write the manifest, then one file per non-empty table.
    ///
    /// Fails when `directory` already holds a manifest, unless
    /// `options.overwrite` is set.
    pub fn to_file_with(&self, directory: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        let directory = directory.as_ref();
        let span = info_span!("save_dataset", path = %directory.display());
        let _guard = span.enter();

        let manifest = directory.join(MANIFEST_FILE);
        if manifest.exists() && !options.overwrite {
            return Err(AsdmError::conversion(
                CONTAINER_NAME,
                format!("{} already exists", manifest.display()),
            ));
        }
        fs::create_dir_all(directory)
            .map_err(|e| AsdmError::io(CONTAINER_NAME, directory, &e))?;

        // Every table is read before anything is written, so saving over the
        // source directory cannot clobber a table that is still unloaded.
        for name in TableName::ALL {
            self.handle(name)?;
        }

        let xml = self.to_xml()?;
        fs::write(&manifest, xml).map_err(|e| AsdmError::io(CONTAINER_NAME, &manifest, &e))?;

        let mut written = 0usize;
        for name in TableName::ALL {
            let table = self.handle(name)?;
            if table.size() == 0 {
                continue;
            }
            let _table_span = info_span!("save_table", table = name.as_str()).entered();
            table.to_file(directory, &self.entity, options)?;
            written += 1;
        }
        info!(tables = written, "saved dataset");
        Ok(())
    }
}

fn mismatched_table<R: AsdmRow>() -> AsdmError {
    AsdmError::invalid_argument(format!(
        "table {} does not hold {} rows",
        R::SCHEMA.name(),
        std::any::type_name::<R>()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Nameable;

    #[test]
    fn test_new_container_is_empty() {
        let asdm = Asdm::new();
        for name in asdm.table_names() {
            assert_eq!(asdm.number_rows(*name), 0);
            assert!(!asdm.is_loaded(*name));
        }
        assert_eq!(asdm.entity().entity_type_name, "ASDM");
    }

    #[test]
    fn test_get_table_by_name() {
        let asdm = Asdm::new();
        let table = asdm.get_table("Subscan").unwrap();
        assert_eq!(table.name(), "Subscan");
        assert!(asdm.is_loaded(TableName::Subscan));

        let err = asdm.get_table("Pointing").err().unwrap();
        assert!(matches!(err, AsdmError::InvalidArgument { .. }));
    }

    #[test]
    fn test_manifest_lists_every_table() {
        let asdm = Asdm::new();
        let xml = asdm.to_xml().unwrap();
        for name in TableName::ALL {
            assert!(xml.contains(&format!("<Name>{name}</Name>")));
        }
        assert!(!xml.contains("StationTable"));

        let mut other = Asdm::new();
        other.from_xml(&xml).unwrap();
        assert_eq!(other.time_of_creation().to_fits(), asdm.time_of_creation().to_fits());
    }

    #[test]
    fn test_manifest_rejects_wrong_root() {
        let mut asdm = Asdm::new();
        let err = asdm.from_xml("<Dataset/>").unwrap_err();
        assert!(matches!(err, AsdmError::Conversion { .. }));
    }
}
