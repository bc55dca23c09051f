//! Archive decoding

use super::{EDGES_ENTRY, MESHES_ENTRY, METADATA_ENTRY, PREVIEW_ENTRY, Package};
use super::{entry_path, part_prefix};
use crate::binary::BufferPool;
use crate::config::ReaderConfig;
use crate::error::{Error, Result};
use crate::fingerprint::{content_identifier, triangulation_fingerprint};
use crate::model::{Edge, Mesh, Metadata, Model, Part, ValueList};
use crate::parser::{
    DecodeContext, MetadataDocument, parse_metadata_xml, read_edges_entry, read_meshes_entry,
    read_values_entry,
};
use std::io::{Read, Seek};
use tracing::{debug, warn};
use uuid::Uuid;

/// Read a model with the default configuration
pub fn read_model<R: Read + Seek>(reader: R) -> Result<Model> {
    read_model_with_config(reader, &ReaderConfig::default())
}

/// Read a model
///
/// The root metadata is read first. Its file version is checked before any
/// geometry is touched, and its part count selects the flat layout (one
/// part) or the composite layout (any other count).
pub fn read_model_with_config<R: Read + Seek>(reader: R, config: &ReaderConfig) -> Result<Model> {
    let mut package = Package::open(reader)?;
    let pool = BufferPool::new();

    let root = read_metadata_document(&mut package, "")?;
    let part_count = root.metadata.part_count;
    debug!(
        version = %root.metadata.file_version,
        part_count,
        entries = package.len(),
        "reading model archive"
    );

    if part_count == 0 {
        return Err(Error::invalid_format_context(
            METADATA_ENTRY,
            "partCount must be at least 1",
        ));
    }
    if part_count == 1 {
        let part = read_part(&mut package, "", root, config, &pool)?;
        return Ok(Model::single(part));
    }

    let thumbnail = package.read_optional_entry(PREVIEW_ENTRY)?;
    let mut parts = Vec::with_capacity(part_count.min(1024));
    for index in 0..part_count {
        let prefix = part_prefix(index);
        let document = read_metadata_document(&mut package, &prefix)?;
        parts.push(read_part(&mut package, &prefix, document, config, &pool)?);
    }

    let mut metadata = root.metadata;
    if !root.has_model_id {
        metadata.model_id = derive_model_id(&mut package, "", config)?;
    }
    let computed = || {
        triangulation_fingerprint(
            parts.iter().flat_map(|p| p.meshes()),
            config.digest_policy(),
            &pool,
        )
    };
    if !root.has_triangulation_id {
        metadata.triangulation_id = computed();
    } else if config.verify_fingerprint() {
        verify_fingerprint(metadata.triangulation_id, computed(), "composite root")?;
    }

    Ok(Model::from_decoded_composite(parts, metadata, thumbnail))
}

/// Replace the value datasets of `base` with those stored in another archive
///
/// Geometry is never read from the values archive. Each part's recorded
/// triangulation fingerprint must equal the corresponding base part's
/// fingerprint, otherwise the splice fails with an integrity error. `base`
/// is left untouched; the spliced model is returned.
pub fn read_values_into<R: Read + Seek>(base: &Model, reader: R) -> Result<Model> {
    let mut package = Package::open(reader)?;
    let pool = BufferPool::new();

    let root = read_metadata_document(&mut package, "")?;
    let part_count = root.metadata.part_count;
    if part_count != base.parts().len() {
        return Err(Error::Integrity(format!(
            "values archive holds {} parts, the base model has {}",
            part_count,
            base.parts().len()
        )));
    }
    debug!(part_count, "splicing values onto base model");

    let mut parts = Vec::with_capacity(part_count);
    if part_count == 1 {
        parts.push(splice_part(&mut package, "", root, &base.parts()[0], &pool)?);
    } else {
        for (index, base_part) in base.parts().iter().enumerate() {
            let prefix = part_prefix(index);
            let document = read_metadata_document(&mut package, &prefix)?;
            parts.push(splice_part(&mut package, &prefix, document, base_part, &pool)?);
        }
    }

    Ok(base.with_parts(parts))
}

/// Read only the root preview image
pub fn read_thumbnail<R: Read + Seek>(reader: R) -> Result<Option<Vec<u8>>> {
    let mut package = Package::open(reader)?;
    package.read_optional_entry(PREVIEW_ENTRY)
}

/// Read only the root metadata document
///
/// No version gate is applied, so callers can inspect files written by a
/// newer codec. Identifiers the document does not record are nil.
pub fn read_metadata<R: Read + Seek>(reader: R) -> Result<Metadata> {
    let mut package = Package::open(reader)?;
    let xml = package.read_text_entry(METADATA_ENTRY)?;
    Ok(parse_metadata_xml(&xml)?.metadata)
}

fn read_metadata_document<R: Read + Seek>(
    package: &mut Package<R>,
    prefix: &str,
) -> Result<MetadataDocument> {
    let xml = package.read_text_entry(&entry_path(prefix, METADATA_ENTRY))?;
    let document = parse_metadata_xml(&xml)?;
    document.metadata.file_version.ensure_supported()?;
    Ok(document)
}

fn read_part<R: Read + Seek>(
    package: &mut Package<R>,
    prefix: &str,
    document: MetadataDocument,
    config: &ReaderConfig,
    pool: &BufferPool,
) -> Result<Part> {
    let ctx = DecodeContext::new(document.metadata.file_version, pool);

    let meshes: Vec<Mesh> = package
        .read_optional_entry(&entry_path(prefix, MESHES_ENTRY))?
        .map(|bytes| read_meshes_entry(&bytes, &ctx))
        .transpose()?
        .unwrap_or_default();
    let edges: Vec<Edge> = package
        .read_optional_entry(&entry_path(prefix, EDGES_ENTRY))?
        .map(|bytes| read_edges_entry(&bytes, &ctx))
        .transpose()?
        .unwrap_or_default();
    let value_lists = read_value_lists(package, prefix, &document.metadata, &ctx)?;
    let thumbnail = package.read_optional_entry(&entry_path(prefix, PREVIEW_ENTRY))?;

    let mut metadata = document.metadata;
    if !document.has_model_id {
        metadata.model_id = derive_model_id(package, prefix, config)?;
    }
    if !document.has_triangulation_id {
        metadata.triangulation_id =
            triangulation_fingerprint(&meshes, config.digest_policy(), pool);
    } else if config.verify_fingerprint() {
        let computed = triangulation_fingerprint(&meshes, config.digest_policy(), pool);
        verify_fingerprint(metadata.triangulation_id, computed, "part")?;
    }

    Part::from_decoded(meshes, edges, value_lists, metadata, thumbnail)
}

fn splice_part<R: Read + Seek>(
    package: &mut Package<R>,
    prefix: &str,
    document: MetadataDocument,
    base: &Part,
    pool: &BufferPool,
) -> Result<Part> {
    if !document.has_triangulation_id {
        return Err(Error::Integrity(
            "values archive records no triangulation fingerprint".to_string(),
        ));
    }
    if document.metadata.triangulation_id != base.triangulation_id() {
        return Err(Error::Integrity(format!(
            "values were computed for triangulation {}, base geometry is {}",
            document.metadata.triangulation_id,
            base.triangulation_id()
        )));
    }

    let ctx = DecodeContext::new(document.metadata.file_version, pool);
    let value_lists = read_value_lists(package, prefix, &document.metadata, &ctx)?;
    base.with_value_lists(value_lists)
}

fn read_value_lists<R: Read + Seek>(
    package: &mut Package<R>,
    prefix: &str,
    metadata: &Metadata,
    ctx: &DecodeContext<'_>,
) -> Result<Vec<ValueList>> {
    metadata
        .values
        .iter()
        .map(|descriptor| {
            let bytes = package.read_entry(&entry_path(prefix, &descriptor.file_name))?;
            let values = read_values_entry(&bytes, &descriptor.data_type, ctx)?;
            Ok(ValueList::new(descriptor.clone(), values))
        })
        .collect()
}

/// Identifier for archives written before model identifiers were stored
fn derive_model_id<R: Read + Seek>(
    package: &mut Package<R>,
    prefix: &str,
    config: &ReaderConfig,
) -> Result<Uuid> {
    let entries = package.entries_under(prefix)?;
    warn!(
        prefix,
        entries = entries.len(),
        "metadata records no model id, deriving one from the archive contents"
    );
    Ok(content_identifier(
        entries
            .iter()
            .map(|(name, data)| (name.as_str(), data.as_slice())),
        config.digest_policy(),
    ))
}

fn verify_fingerprint(stored: Uuid, computed: Uuid, what: &str) -> Result<()> {
    if stored != computed {
        return Err(Error::Integrity(format!(
            "{} fingerprint {} does not match the stored geometry ({})",
            what, stored, computed
        )));
    }
    Ok(())
}
