//! # meshpart
//!
//! A pure Rust codec for meshpart containers: tessellated CAD geometry
//! (meshes, edges and per-vertex value datasets) stored in a ZIP archive.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - Adaptive 8/16/32-bit triangle index storage
//! - Versioned binary codecs, including the legacy double-precision layout
//! - Single and composite (multi-part) models
//! - Triangulation fingerprint guarding values-only updates
//! - Byte-reproducible archives
//!
//! ## Example
//!
//! ```
//! use meshpart::{Mesh, Model, Part, Vec3};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let positions = vec![
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Vec3::new(1.0, 1.0, 0.0),
//!     Vec3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = Mesh::new(positions, &[0, 1, 2, 0, 2, 3])?;
//! let model = Model::single(Part::builder().with_mesh(mesh).build()?);
//!
//! let bytes = model.to_bytes()?;
//! let decoded = Model::from_reader(Cursor::new(bytes))?;
//! assert_eq!(decoded.parts()[0].meshes()[0].triangle_count(), 2);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod binary;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod index;
pub mod model;
pub mod package;
pub mod parser;
pub mod validator;
pub mod version;
pub mod writer;

pub use config::{ReaderConfig, WriterConfig};
pub use error::{Error, ErrorKind, Result};
pub use fingerprint::DigestPolicy;
pub use index::{IndexArray, IndexWidth};
pub use model::{
    Bounds, Color, ColorScale, ColorStop, Edge, Mesh, Metadata, Model, Part, PartBuilder, Value,
    ValueDescriptor, ValueList, Vec2, Vec3,
};
pub use package::{FILE_EXTENSION, read_metadata, read_thumbnail};
pub use version::{FileVersion, FormatFeatures};

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

impl Model {
    /// Read a model from a seekable reader
    ///
    /// # Example
    ///
    /// ```no_run
    /// use meshpart::Model;
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let file = File::open("bracket.mpart")?;
    /// let model = Model::from_reader(file)?;
    /// println!("model has {} parts", model.parts().len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        package::read_model(reader)
    }

    /// Read a model with a custom configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use meshpart::{DigestPolicy, Model, ReaderConfig};
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ReaderConfig::new()
    ///     .with_digest_policy(DigestPolicy::Portable)
    ///     .with_fingerprint_verification(true);
    /// let model = Model::from_reader_with_config(File::open("bracket.mpart")?, &config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_reader_with_config<R: Read + Seek>(reader: R, config: &ReaderConfig) -> Result<Self> {
        package::read_model_with_config(reader, config)
    }

    /// Read a model from a non-seekable stream
    ///
    /// The stream is buffered into memory first so that archive entries can
    /// be looked up in any order.
    pub fn from_stream<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_reader(Cursor::new(bytes))
    }

    /// Read a model from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Read only the root preview image
    ///
    /// Returns `None` when the archive has no preview.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use meshpart::Model;
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// if let Some(png) = Model::read_thumbnail(File::open("bracket.mpart")?)? {
    ///     std::fs::write("preview.png", png)?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn read_thumbnail<R: Read + Seek>(reader: R) -> Result<Option<Vec<u8>>> {
        package::read_thumbnail(reader)
    }

    /// Replace this model's value datasets with those stored in `reader`
    ///
    /// Only the metadata and value entries of `reader` are decoded. The
    /// archive must record, for every part, the same triangulation
    /// fingerprint as this model; otherwise an integrity error is returned
    /// and `self` is unchanged.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use meshpart::Model;
    /// use std::fs::File;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let geometry = Model::read_file("bracket.mpart")?;
    /// let updated = geometry.with_values_from(File::open("bracket-values.mpart")?)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_values_from<R: Read + Seek>(&self, reader: R) -> Result<Self> {
        package::read_values_into(self, reader)
    }

    /// Write the model to a writer
    ///
    /// Writing the same model twice produces identical bytes.
    pub fn to_writer<W: Write + Seek>(&self, writer: W) -> Result<W> {
        package::write_model(self, writer)
    }

    /// Write the model with a custom configuration
    pub fn to_writer_with_config<W: Write + Seek>(
        &self,
        writer: W,
        config: &WriterConfig,
    ) -> Result<W> {
        package::write_model_with_config(self, writer, config)
    }

    /// Encode the model into an in-memory archive
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.to_writer(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Write the model to a file path
    ///
    /// # Example
    ///
    /// ```no_run
    /// use meshpart::{Model, Part};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let model = Model::single(Part::builder().with_name("empty").build()?);
    /// model.write_to_file("empty.mpart")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut file = self.to_writer(file)?;
        file.flush()?;
        Ok(())
    }
}
