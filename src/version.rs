//! File format versions and the per-version field table
//!
//! Container files carry a four-part version (`major.minor.build.revision`).
//! Whether a file can be read at all depends only on the major component;
//! which optional blocks the binary entries contain depends on
//! `major.minor` and is looked up once per entry in [`FormatFeatures`].

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Four-part file format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileVersion {
    /// Major component; compared for compatibility
    pub major: u32,
    /// Minor component; selects optional blocks
    pub minor: u32,
    /// Build component
    pub build: u32,
    /// Revision component
    pub revision: u32,
}

impl FileVersion {
    /// Version written by this codec
    pub const CURRENT: FileVersion = FileVersion::new(3, 3, 0, 0);

    /// Highest major version this codec understands
    pub const MAX_SUPPORTED_MAJOR: u32 = 3;

    /// Wire revisions this codec reads, oldest first
    pub const KNOWN_REVISIONS: [FileVersion; 6] = [
        FileVersion::new(1, 0, 0, 0),
        FileVersion::new(2, 0, 0, 0),
        FileVersion::new(2, 1, 0, 0),
        FileVersion::new(2, 2, 0, 0),
        FileVersion::new(3, 0, 0, 0),
        FileVersion::new(3, 3, 0, 0),
    ];

    /// Create a version from its four components
    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Whether this codec can read files of this version
    pub fn is_supported(&self) -> bool {
        self.major <= Self::MAX_SUPPORTED_MAJOR
    }

    /// Fail with a version error if this codec cannot read this version
    pub fn ensure_supported(&self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(Error::UnsupportedVersion(format!(
                "file version {} has major version {}, this reader supports up to {}",
                self,
                self.major,
                Self::MAX_SUPPORTED_MAJOR
            )))
        }
    }

    fn at_least(&self, major: u32, minor: u32) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl Default for FileVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for FileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl FromStr for FileVersion {
    type Err = Error;

    /// Parse `major.minor[.build[.revision]]`
    ///
    /// An unparseable version is a version error: without a version the
    /// reader cannot decide whether it may touch the geometry at all.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::UnsupportedVersion(format!("unparseable file version '{}'", s));

        let parts: Vec<&str> = s.trim().split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(invalid());
        }

        let mut components = [0u32; 4];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part.parse::<u32>().map_err(|_| invalid())?;
        }

        Ok(FileVersion::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}

/// Optional block that only exists from some version onward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GatedField {
    Name,
    TextureCoordinates,
    VertexColors,
    AdaptiveIndices,
}

/// First `(major, minor)` carrying each gated field
const FIELD_GATES: [(GatedField, (u32, u32)); 4] = [
    (GatedField::Name, (2, 1)),
    (GatedField::TextureCoordinates, (2, 2)),
    (GatedField::AdaptiveIndices, (3, 0)),
    (GatedField::VertexColors, (3, 3)),
];

/// Wire layout choices for one file version
///
/// Built once per decoded entry so entity readers never compare versions
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatFeatures {
    /// Positions and points are stored as `f64` triples (1.x only)
    pub double_precision_positions: bool,
    /// Entities carry an optional name block
    pub names: bool,
    /// Meshes carry an optional texture coordinate block
    pub texture_coordinates: bool,
    /// Meshes carry an optional per-vertex color block
    pub vertex_colors: bool,
    /// Index width follows the vertex count; otherwise always 32-bit
    pub adaptive_indices: bool,
}

impl FormatFeatures {
    /// Look up the layout for a file version
    pub fn for_version(version: FileVersion) -> Self {
        let since = |field: GatedField| {
            FIELD_GATES
                .iter()
                .find(|(f, _)| *f == field)
                .is_some_and(|(_, (major, minor))| version.at_least(*major, *minor))
        };

        Self {
            double_precision_positions: version.major < 2,
            names: since(GatedField::Name),
            texture_coordinates: since(GatedField::TextureCoordinates),
            vertex_colors: since(GatedField::VertexColors),
            adaptive_indices: since(GatedField::AdaptiveIndices),
        }
    }

    /// Layout written by this codec
    pub fn current() -> Self {
        Self::for_version(FileVersion::CURRENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_four_part_version() {
        let v: FileVersion = "3.3.0.0".parse().unwrap();
        assert_eq!(v, FileVersion::new(3, 3, 0, 0));
        assert_eq!(v.to_string(), "3.3.0.0");
    }

    #[test]
    fn test_parse_short_version_pads_with_zero() {
        let v: FileVersion = "2.1".parse().unwrap();
        assert_eq!(v, FileVersion::new(2, 1, 0, 0));
        assert_eq!(v.to_string(), "2.1.0.0");
    }

    #[test]
    fn test_parse_invalid_versions() {
        for bad in ["", "3", "a.b", "1.2.3.4.5", "1.-2", " . "] {
            let err = bad.parse::<FileVersion>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Version, "input {:?}", bad);
        }
    }

    #[test]
    fn test_only_major_gates_compatibility() {
        assert!(FileVersion::new(3, 99, 7, 1).is_supported());
        assert!(!FileVersion::new(4, 0, 0, 0).is_supported());
        let err = FileVersion::new(4, 0, 0, 0).ensure_supported().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Version);
    }

    #[test]
    fn test_feature_table() {
        let v1 = FormatFeatures::for_version(FileVersion::new(1, 0, 0, 0));
        assert!(v1.double_precision_positions);
        assert!(!v1.names && !v1.texture_coordinates && !v1.vertex_colors);
        assert!(!v1.adaptive_indices);

        let v20 = FormatFeatures::for_version(FileVersion::new(2, 0, 0, 0));
        assert!(!v20.double_precision_positions);
        assert!(!v20.names);

        let v21 = FormatFeatures::for_version(FileVersion::new(2, 1, 0, 0));
        assert!(v21.names && !v21.texture_coordinates);

        let v22 = FormatFeatures::for_version(FileVersion::new(2, 2, 0, 0));
        assert!(v22.texture_coordinates && !v22.adaptive_indices);

        let v30 = FormatFeatures::for_version(FileVersion::new(3, 0, 0, 0));
        assert!(v30.adaptive_indices && !v30.vertex_colors);

        let v33 = FormatFeatures::current();
        assert!(v33.names && v33.texture_coordinates && v33.vertex_colors && v33.adaptive_indices);
        assert!(!v33.double_precision_positions);
    }

    #[test]
    fn test_known_revisions_are_ordered_and_supported() {
        let revisions = FileVersion::KNOWN_REVISIONS;
        assert!(revisions.windows(2).all(|w| w[0] < w[1]));
        assert!(revisions.iter().all(FileVersion::is_supported));
        assert_eq!(*revisions.last().unwrap(), FileVersion::CURRENT);
    }
}
