//! One file per table inside a dataset directory.
//!
//! XML mode writes `<Name>.xml`. Binary mode writes the MIME message to
//! `<Name>.bin` and its XML header part to `<Name>.xml`.

use std::fs;
use std::path::{Path, PathBuf};

use asdm_model::Entity;
use tracing::debug;

use super::Table;
use crate::capability::{BinarySerializable, FileStorable, XmlSerializable};
use crate::error::{AsdmError, Result};
use crate::options::{ParseOptions, SaveOptions, StorageFormat};
use crate::row::AsdmRow;

/// Marker of an XML file that only describes a binary table.
const BULK_STORE_MARKER: &str = "<BulkStoreRef";

fn table_path(directory: &Path, name: &str, extension: &str) -> PathBuf {
    directory.join(format!("{name}.{extension}"))
}

fn write_file(name: &str, path: &Path, contents: &[u8], overwrite: bool) -> Result<()> {
    if !overwrite && path.exists() {
        return Err(AsdmError::conversion(
            name,
            format!("{} already exists", path.display()),
        ));
    }
    fs::write(path, contents).map_err(|e| AsdmError::io(name, path, &e))?;
    debug!(table = name, path = %path.display(), bytes = contents.len(), "wrote table file");
    Ok(())
}

fn read_file(name: &str, path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|e| AsdmError::io(name, path, &e))?;
    debug!(table = name, path = %path.display(), bytes = bytes.len(), "read table file");
    Ok(bytes)
}

impl<R: AsdmRow> FileStorable for Table<R> {
    fn to_file(&self, directory: &Path, container: &Entity, options: &SaveOptions) -> Result<()> {
        let name = R::SCHEMA.name();
        let format = options.format.unwrap_or(if self.file_as_bin {
            StorageFormat::Binary
        } else {
            StorageFormat::Xml
        });
        let xml_path = table_path(directory, name, "xml");

        match format {
            StorageFormat::Xml => {
                let xml = self.to_xml(container)?;
                write_file(name, &xml_path, xml.as_bytes(), options.overwrite)
            }
            StorageFormat::Binary => {
                let bin_path = table_path(directory, name, "bin");
                let message = self.to_mime(container, options.byte_order)?;
                let header = self.binary_header_xml(container, options.byte_order)?;
                write_file(name, &bin_path, &message, options.overwrite)?;
                write_file(name, &xml_path, header.as_bytes(), options.overwrite)
            }
        }
    }

    fn set_from_file(&mut self, directory: &Path, options: &ParseOptions) -> Result<()> {
        let name = R::SCHEMA.name();
        let xml_path = table_path(directory, name, "xml");
        let bin_path = table_path(directory, name, "bin");

        if xml_path.is_file() {
            let bytes = read_file(name, &xml_path)?;
            let xml = String::from_utf8(bytes).map_err(|e| {
                AsdmError::conversion(name, format!("{}: {e}", xml_path.display()))
            })?;
            if !xml.contains(BULK_STORE_MARKER) {
                return self.from_xml(&xml, options.check_row_uniqueness);
            }
            if !bin_path.is_file() {
                return Err(AsdmError::conversion(
                    name,
                    format!(
                        "{} refers to binary content but {} is missing",
                        xml_path.display(),
                        bin_path.display()
                    ),
                ));
            }
        } else if !bin_path.is_file() {
            return Err(AsdmError::conversion(
                name,
                format!(
                    "neither {} nor {} exists",
                    xml_path.display(),
                    bin_path.display()
                ),
            ));
        }

        let message = read_file(name, &bin_path)?;
        self.set_from_mime(&message, options.check_row_uniqueness)
    }
}
