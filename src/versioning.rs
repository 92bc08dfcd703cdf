//! Per-filename version numbering for project files.
//!
//! Files sharing a name inside one project are treated as versions of the
//! same logical file. Versions are `major.minor` and only the minor part is
//! ever bumped automatically. A name whose highest minor is already
//! `u32::MAX` cannot take another version; the upload is refused.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FileVersion {
    pub major: u32,
    pub minor: u32,
}

impl FileVersion {
    pub const INITIAL: FileVersion = FileVersion { major: 1, minor: 0 };

    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parses `"major.minor"`. Anything else (missing part, sign, extra
    /// component, non-digit) yields `None`.
    pub fn parse(value: &str) -> Option<FileVersion> {
        let (major, minor) = value.trim().split_once('.')?;
        let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(major) || !is_digits(minor) {
            return None;
        }
        Some(FileVersion {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }

    /// The next minor version, or `None` once the minor part is exhausted.
    pub fn next(self) -> Option<FileVersion> {
        Some(FileVersion {
            major: self.major,
            minor: self.minor.checked_add(1)?,
        })
    }
}

impl Ord for FileVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
    }
}

impl PartialOrd for FileVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// What the resolver needs to know about an existing file record.
pub trait VersionedFile {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    fn is_latest(&self) -> bool;
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("version {0} has no successor")]
pub struct VersionExhausted(pub FileVersion);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionResolution {
    pub version: FileVersion,
    /// Id of the sibling currently flagged latest, to be stored as the new
    /// file's `previous_version_id`.
    pub previous_version_id: Option<String>,
}

/// Computes the version for a new upload named `new_name`.
///
/// Matching is exact and case-sensitive. Unparseable sibling versions rank
/// below every parseable one and never win; if no sibling parses, the new
/// file starts at `1.0`. Nothing is mutated: the caller must clear
/// `is_latest` on every sibling before inserting the new record.
pub fn resolve_version<F: VersionedFile>(
    existing: &[F],
    new_name: &str,
) -> Result<VersionResolution, VersionExhausted> {
    let siblings: Vec<&F> = existing.iter().filter(|f| f.name() == new_name).collect();

    let highest = siblings
        .iter()
        .filter_map(|f| FileVersion::parse(f.version()))
        .max();

    let previous_version_id = siblings
        .iter()
        .find(|f| f.is_latest())
        .map(|f| f.id().to_string());

    let version = match highest {
        Some(highest) => highest.next().ok_or(VersionExhausted(highest))?,
        None => FileVersion::INITIAL,
    };

    Ok(VersionResolution {
        version,
        previous_version_id,
    })
}

/// Number of records named `name` that carry the latest flag.
pub fn latest_count<F: VersionedFile>(files: &[F], name: &str) -> usize {
    files
        .iter()
        .filter(|f| f.name() == name && f.is_latest())
        .count()
}
