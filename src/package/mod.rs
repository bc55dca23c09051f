//! Container archive handling
//!
//! A stored model is a ZIP archive. A single part lays its entries out at
//! the archive root:
//!
//! ```text
//! metadata.xml     required, version and identifiers
//! preview.png      optional, stored uncompressed
//! meshes.bin       mesh geometry
//! edges.bin        edge geometry
//! <type>.bin       one entry per value dataset
//! ```
//!
//! A composite model writes its own `metadata.xml` (recording the part
//! count) and `preview.png` at the root, then each part's entries under a
//! numbered folder `0/`, `1/`, ...

mod reader;
mod writer;

pub use reader::{
    read_metadata, read_model, read_model_with_config, read_thumbnail, read_values_into,
};
pub use writer::{write_model, write_model_with_config};

use crate::error::{Error, Result};
use std::io::{Read, Seek};
use zip::ZipArchive;

/// File extension of stored models
pub const FILE_EXTENSION: &str = "mpart";

/// Metadata document entry
pub const METADATA_ENTRY: &str = "metadata.xml";

/// Preview image entry
pub const PREVIEW_ENTRY: &str = "preview.png";

/// Mesh geometry entry
pub const MESHES_ENTRY: &str = "meshes.bin";

/// Edge geometry entry
pub const EDGES_ENTRY: &str = "edges.bin";

/// Entry names value datasets may not use
pub(crate) const RESERVED_ENTRIES: [&str; 4] =
    [METADATA_ENTRY, PREVIEW_ENTRY, MESHES_ENTRY, EDGES_ENTRY];

/// Path of an entry inside a part folder (`""` for the archive root)
pub(crate) fn entry_path(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, name)
}

/// Folder prefix of the part at `index` in a composite archive
pub(crate) fn part_prefix(index: usize) -> String {
    format!("{}/", index)
}

/// Random-access view of a container archive
pub struct Package<R: Read> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> Package<R> {
    /// Open a container archive
    pub fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read a required entry
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        self.read_optional_entry(name)?
            .ok_or_else(|| Error::missing_entry(name))
    }

    /// Read an entry if present
    pub fn read_optional_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        let mut file = match self.archive.by_name(name) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut content = Vec::with_capacity(file.size().min(1 << 24) as usize);
        file.read_to_end(&mut content)?;
        Ok(Some(content))
    }

    /// Read a required UTF-8 entry
    pub fn read_text_entry(&mut self, name: &str) -> Result<String> {
        let bytes = self.read_entry(name)?;
        String::from_utf8(bytes)
            .map_err(|e| Error::invalid_format_context(name, &format!("invalid UTF-8: {}", e)))
    }

    /// Check if an entry exists
    pub fn has_entry(&mut self, name: &str) -> bool {
        self.archive.by_name(name).is_ok()
    }

    /// Names and contents of every file entry under `prefix`, in archive order
    pub fn entries_under(&mut self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let mut entries = Vec::new();
        for index in 0..self.archive.len() {
            let mut file = self.archive.by_index(index)?;
            if file.is_dir() || !file.name().starts_with(prefix) {
                continue;
            }
            let name = file.name().to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;
            entries.push((name, content));
        }
        Ok(entries)
    }

    /// Number of entries in the archive
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the archive is empty
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }
}
