//! # File I/O Module
//!
//! Descriptor sets can be kept outside the binary as JSON files, so a form
//! can be reconfigured (labels, bounds, messages) without a rebuild.
//!
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Ensure schema compatibility
//! - **Checked loads**: A file with duplicate names or inverted bounds is rejected
//!
//! ## File Format
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "fields": [
//!     { "name": "iso_class", "label": "ISO Class", "default_value": 5.0 }
//!   ]
//! }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use cleanroom_core::descriptors::cleanroom_fields;
//! use cleanroom_core::file_io::{load_descriptor_set, save_descriptor_set};
//! use std::path::Path;
//!
//! let path = Path::new("fields.json");
//! save_descriptor_set(cleanroom_fields(), path)?;
//! let loaded = load_descriptor_set(path)?;
//! assert_eq!(&loaded, cleanroom_fields());
//! # Ok::<(), cleanroom_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::descriptors::DescriptorSet;
use crate::errors::{CalcError, CalcResult};

/// Current schema version for descriptor files
pub const SCHEMA_VERSION: &str = "0.1.0";

#[derive(Serialize)]
struct DescriptorFileRef<'a> {
    version: &'a str,
    fields: &'a DescriptorSet,
}

#[derive(Deserialize)]
struct DescriptorFile {
    version: String,
    fields: DescriptorSet,
}

/// Save a descriptor set to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize to JSON
/// 2. Write to a temporary file (.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename .tmp over the target (atomic on most filesystems)
pub fn save_descriptor_set(set: &DescriptorSet, path: &Path) -> CalcResult<()> {
    let file = DescriptorFileRef {
        version: SCHEMA_VERSION,
        fields: set,
    };
    let json = serde_json::to_string_pretty(&file).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        // Clean up temp file if rename fails
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), fields = set.len(), "saved descriptor set");
    Ok(())
}

/// Load a descriptor set from a file.
///
/// # Returns
///
/// * `Ok(DescriptorSet)` - Successfully loaded and checked set
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON or malformed descriptors
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_descriptor_set(path: &Path) -> CalcResult<DescriptorSet> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    parse_descriptor_set(&contents).map_err(|e| match e {
        CalcError::SerializationError { reason } => CalcError::SerializationError {
            reason: format!("Invalid descriptor file {}: {}", path.display(), reason),
        },
        other => other,
    })
}

/// Parse the contents of a descriptor file.
pub fn parse_descriptor_set(contents: &str) -> CalcResult<DescriptorSet> {
    let file: DescriptorFile =
        serde_json::from_str(contents).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })?;

    validate_version(&file.version)?;

    if file.fields.is_empty() {
        warn!("descriptor file declares no fields");
    }
    Ok(file.fields)
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version is not readable
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::cleanroom_fields;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("cleanroom_test_{}.json", name))
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");

        save_descriptor_set(cleanroom_fields(), &path).unwrap();
        let loaded = load_descriptor_set(&path).unwrap();
        assert_eq!(&loaded, cleanroom_fields());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_path("atomic");
        let tmp_path = path.with_extension("json.tmp");

        save_descriptor_set(cleanroom_fields(), &path).unwrap();

        assert!(!tmp_path.exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = load_descriptor_set(&temp_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_duplicate_fields_rejected_on_parse() {
        let json = r#"{"version": "0.1.0", "fields": [{"name": "a"}, {"name": "a"}]}"#;
        let err = parse_descriptor_set(json).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("0.2.0").is_err()); // Newer minor
        assert!(validate_version("1.0.0").is_err()); // Different major
        assert!(validate_version("banana").is_err());
    }

    #[test]
    fn test_parse_minimal_file() {
        let json = r#"{
            "version": "0.1.0",
            "fields": [
                {"name": "note", "kind": "text"},
                {"name": "x", "min": {"value": 0, "message": "x must be positive"}}
            ]
        }"#;
        let set = parse_descriptor_set(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("x").unwrap().min.as_ref().unwrap().value, 0.0);
    }
}
