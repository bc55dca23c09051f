//! Archive encoding

use super::{EDGES_ENTRY, MESHES_ENTRY, METADATA_ENTRY, PREVIEW_ENTRY};
use super::{entry_path, part_prefix};
use crate::binary::BufferPool;
use crate::config::WriterConfig;
use crate::error::{Error, Result};
use crate::fingerprint::triangulation_fingerprint;
use crate::model::{Metadata, Model, Part};
use crate::validator;
use crate::writer::{write_edges_entry, write_meshes_entry, write_metadata_xml, write_values_entry};
use std::io::{Seek, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Unix permissions recorded for every entry
const ENTRY_PERMISSIONS: u32 = 0o644;

/// Write a model with the default configuration
pub fn write_model<W: Write + Seek>(model: &Model, writer: W) -> Result<W> {
    write_model_with_config(model, writer, &WriterConfig::default())
}

/// Write a model
///
/// Every entry carries the same fixed timestamp and permissions, and entries
/// are written in a fixed order, so the same model always produces the same
/// bytes.
pub fn write_model_with_config<W: Write + Seek>(
    model: &Model,
    writer: W,
    config: &WriterConfig,
) -> Result<W> {
    validator::validate_model(model)?;

    let pool = BufferPool::new();
    let options = EntryOptions::new(config);
    let mut zip = ZipWriter::new(writer);

    if model.is_composite() {
        let mut root = model.metadata().clone();
        root.part_count = model.parts().len();
        root.triangulation_id = triangulation_fingerprint(
            model.parts().iter().flat_map(|p| p.meshes()),
            config.digest_policy(),
            &pool,
        );
        debug!(parts = root.part_count, "writing composite archive");

        write_metadata_entry(&mut zip, METADATA_ENTRY, &root, &options)?;
        if let Some(png) = model.thumbnail() {
            write_entry(&mut zip, PREVIEW_ENTRY, png, options.stored)?;
        }
        for (index, part) in model.parts().iter().enumerate() {
            write_part(&mut zip, &part_prefix(index), part, &options, &pool)?;
        }
    } else {
        debug!("writing single-part archive");
        write_part(&mut zip, "", &model.parts()[0], &options, &pool)?;
    }

    Ok(zip.finish()?)
}

struct EntryOptions {
    deflated: SimpleFileOptions,
    stored: SimpleFileOptions,
}

impl EntryOptions {
    fn new(config: &WriterConfig) -> Self {
        let base = SimpleFileOptions::default()
            .last_modified_time(DateTime::default())
            .unix_permissions(ENTRY_PERMISSIONS);
        Self {
            deflated: base
                .compression_method(CompressionMethod::Deflated)
                .compression_level(config.compression_level()),
            stored: base.compression_method(CompressionMethod::Stored),
        }
    }
}

fn write_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    prefix: &str,
    part: &Part,
    options: &EntryOptions,
    pool: &BufferPool,
) -> Result<()> {
    write_metadata_entry(zip, &entry_path(prefix, METADATA_ENTRY), part.metadata(), options)?;
    if let Some(png) = part.thumbnail() {
        write_entry(zip, &entry_path(prefix, PREVIEW_ENTRY), png, options.stored)?;
    }

    let meshes = write_meshes_entry(part.meshes(), pool)?;
    write_entry(zip, &entry_path(prefix, MESHES_ENTRY), &meshes, options.deflated)?;

    let edges = write_edges_entry(part.edges(), pool)?;
    write_entry(zip, &entry_path(prefix, EDGES_ENTRY), &edges, options.deflated)?;

    for list in part.value_lists() {
        let bytes = write_values_entry(list.values(), pool)?;
        let name = entry_path(prefix, &list.descriptor().file_name);
        write_entry(zip, &name, &bytes, options.deflated)?;
    }

    debug!(
        prefix,
        meshes = meshes.len(),
        edges = edges.len(),
        value_lists = part.value_lists().len(),
        "wrote part entries"
    );
    Ok(())
}

fn write_metadata_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    metadata: &Metadata,
    options: &EntryOptions,
) -> Result<()> {
    let mut xml = Vec::new();
    write_metadata_xml(metadata, &mut xml)?;
    write_entry(zip, name, &xml, options.deflated)
}

fn write_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    data: &[u8],
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(name, options)?;
    zip.write_all(data)
        .map_err(|e| Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", name, e))))?;
    Ok(())
}
