//! # File I/O Module
//!
//! Project file operations:
//! - **Atomic saves**: write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: the file's major version must match and its
//!   minor version must not be newer than this build's
//! - **Consistency checks**: every loaded girder is relinked and validated;
//!   the first inconsistency aborts the whole load
//!
//! ## File Format
//!
//! Projects are saved as `.sgp` files containing pretty-printed JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! use splice_core::file_io::{save_project, load_project};
//! use splice_core::project::SplicedProject;
//! use std::path::Path;
//!
//! let project = SplicedProject::new("Engineer", "25-001", "Client");
//! let path = Path::new("viaduct.sgp");
//! save_project(&project, path).unwrap();
//! let loaded = load_project(path).unwrap();
//! assert_eq!(loaded.meta.job_id, "25-001");
//! ```

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::errors::{GirderError, GirderResult};
use crate::project::{SplicedProject, SCHEMA_VERSION};

/// Save a project with atomic write semantics.
///
/// The JSON is written to a sibling `.sgp.tmp` file, synced to disk and
/// renamed over `path`.
pub fn save_project(project: &SplicedProject, path: &Path) -> GirderResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(|e| GirderError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("sgp.tmp");

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| GirderError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| GirderError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| GirderError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        GirderError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(path = %path.display(), girders = project.girder_count(), "project saved");
    Ok(())
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Err(GirderError::VersionMismatch)` - File version is incompatible
/// * `Err(GirderError::SerializationError)` - Invalid JSON
/// * `Err(GirderError::LoadFailed)` - Girder data is inconsistent
/// * `Err(GirderError::FileError)` - I/O error
pub fn load_project(path: &Path) -> GirderResult<SplicedProject> {
    let mut file =
        File::open(path).map_err(|e| GirderError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| GirderError::file_error("read", path.display().to_string(), e.to_string()))?;

    let project = project_from_json(&contents).map_err(|e| match e {
        GirderError::SerializationError { reason } => GirderError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), reason),
        },
        other => other,
    })?;

    info!(path = %path.display(), girders = project.girder_count(), "project loaded");
    Ok(project)
}

/// Parse and check a project from JSON text.
pub fn project_from_json(json: &str) -> GirderResult<SplicedProject> {
    let mut project: SplicedProject = serde_json::from_str(json).map_err(|e| GirderError::SerializationError {
        reason: e.to_string(),
    })?;

    validate_version(&project.meta.version)?;
    restore(&mut project)?;
    Ok(project)
}

/// Rebuild derived links and check the loaded model.
fn restore(project: &mut SplicedProject) -> GirderResult<()> {
    project
        .bridge
        .validate()
        .map_err(|e| GirderError::load_failed(format!("bridge framing: {}", e)))?;

    let mut segment_ids = HashSet::new();
    let mut closure_ids = HashSet::new();
    for id in project.girder_ids() {
        let Some(girder) = project.girders.get_mut(&id) else {
            continue;
        };
        girder.relink();
        girder
            .validate()
            .map_err(|e| GirderError::load_failed(format!("girder {}: {}", id, e)))?;

        for segment in girder.segments() {
            if !segment_ids.insert(segment.id) {
                return Err(GirderError::load_failed(format!("{} is used by more than one girder", segment.id)));
            }
        }
        for closure in girder.closures() {
            if !closure_ids.insert(closure.id) {
                return Err(GirderError::load_failed(format!("{} is used by more than one girder", closure.id)));
            }
        }
        debug!(girder = %id, segments = girder.segment_count(), "girder restored");
    }

    // counters may lag behind IDs written by other tools
    project
        .ids
        .reserve_past(segment_ids.iter().max().copied(), closure_ids.iter().max().copied());
    Ok(())
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> GirderResult<()> {
    let mismatch = || GirderError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };

    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);
    if file_parts.len() < 2 || current_parts.len() < 2 {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // File is newer than we support
    if file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }

    Ok(())
}
