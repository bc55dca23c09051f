//! Triangulation fingerprint
//!
//! The fingerprint identifies a part's topology: which vertices form which
//! triangles, in which order, split into which meshes. Positions, normals,
//! colors and texture coordinates do not contribute, so attribute-only edits
//! keep the fingerprint while any re-triangulation changes it.
//!
//! Each mesh contributes its index count followed by its indices, all as
//! little-endian `u32`, to one incremental MD5 that is finalized after the
//! last mesh. The count prefix makes the digest sensitive to where one mesh
//! ends and the next begins.

mod portable;

pub use portable::PortableMd5;

use crate::binary::{BufferPool, CHUNK_ELEMENTS};
use crate::index::IndexArray;
use crate::model::Mesh;
use byteorder::{ByteOrder, LittleEndian};
use md5::Digest;
use uuid::Uuid;

/// Incremental 128-bit digest
pub trait IncrementalDigest {
    /// Feed more bytes
    fn update(&mut self, data: &[u8]);

    /// Finalize and return the digest
    fn finish(self: Box<Self>) -> [u8; 16];
}

/// Accelerated MD5 backed by the `md-5` crate
#[derive(Clone, Default)]
pub struct AcceleratedMd5(md5::Md5);

impl IncrementalDigest for AcceleratedMd5 {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finish(self: Box<Self>) -> [u8; 16] {
        let mut out = [0u8; 16];
        out.copy_from_slice(&self.0.finalize());
        out
    }
}

/// Which digest implementation to use
///
/// Both produce identical output; `Portable` exists for deployments whose
/// compliance policy forbids the accelerated implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestPolicy {
    /// `md-5` crate implementation
    #[default]
    Accelerated,
    /// In-crate RFC 1321 implementation
    Portable,
}

impl DigestPolicy {
    /// Create a fresh digest of this kind
    pub fn create(self) -> Box<dyn IncrementalDigest> {
        match self {
            DigestPolicy::Accelerated => Box::<AcceleratedMd5>::default(),
            DigestPolicy::Portable => Box::<PortableMd5>::default(),
        }
    }
}

/// Fingerprint the triangulation of a sequence of meshes
pub fn triangulation_fingerprint<'a, I>(meshes: I, policy: DigestPolicy, pool: &BufferPool) -> Uuid
where
    I: IntoIterator<Item = &'a Mesh>,
{
    fingerprint_indices(meshes.into_iter().map(Mesh::indices), policy, pool)
}

/// Fingerprint a sequence of index arrays, one per mesh
pub fn fingerprint_indices<'a, I>(arrays: I, policy: DigestPolicy, pool: &BufferPool) -> Uuid
where
    I: IntoIterator<Item = &'a IndexArray>,
{
    let mut digest = policy.create();
    let mut chunk = pool.rent_chunk(4);
    let mut staged = vec![0u32; CHUNK_ELEMENTS];

    for indices in arrays {
        digest.update(&(indices.len() as u32).to_le_bytes());
        let mut start = 0;
        loop {
            let n = indices.expand_into(start, &mut staged);
            if n == 0 {
                break;
            }
            let bytes = &mut chunk[..n * 4];
            LittleEndian::write_u32_into(&staged[..n], bytes);
            digest.update(bytes);
            start += n;
        }
    }

    Uuid::from_bytes(digest.finish())
}

/// Identifier derived from archive entry contents
///
/// Used for files that predate stored model identifiers. Entry names and
/// contents are both digested, each prefixed with its length.
pub fn content_identifier<'a, I>(entries: I, policy: DigestPolicy) -> Uuid
where
    I: IntoIterator<Item = (&'a str, &'a [u8])>,
{
    let mut digest = policy.create();
    for (name, data) in entries {
        digest.update(&(name.len() as u64).to_le_bytes());
        digest.update(name.as_bytes());
        digest.update(&(data.len() as u64).to_le_bytes());
        digest.update(data);
    }
    Uuid::from_bytes(digest.finish())
}
