//! Artifact Serializer - durable, reloadable form of a [`ManifestIndex`].
//!
//! # Layout
//!
//! ```text
//! #!omni-manifest format=1
//! # @generated by omni-manifest; regenerate instead of editing
//! # sha256=<hex digest of the payload>
//! {"modules":[{"namespace_path":"App","categories":[{"name":"svc","att
//! ributes":[{"key":"priority","value":"1"}]}],"type_name":"A"}],"catego
//! ries":[{"name":"svc","modules":[0]}]}
//! ```
//!
//! The payload is compact JSON split into lines of at most `chunk_width`
//! bytes. Readers concatenate the payload lines; line breaks carry no
//! meaning. Each distinct module is stored once and buckets refer to it by
//! position, so shared definitions stay shared after loading.
//!
//! Writes go to a temporary file in the target directory that is renamed
//! over the artifact, so readers never see a partial file and a failed
//! write leaves the previous artifact in place.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::definition::ModuleDefinition;
use crate::error::{ManifestError, Result};
use crate::manifest::ManifestIndex;

/// First token of every artifact.
pub const ARTIFACT_MAGIC: &str = "#!omni-manifest";
/// Payload format written by this version.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

const GENERATED_NOTICE: &str = "# @generated by omni-manifest; regenerate instead of editing";
const CHECKSUM_PREFIX: &str = "# sha256=";

/// Payload document of a manifest artifact.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct ArtifactDocument {
    /// Distinct module definitions, referenced by position
    modules: Vec<ModuleDefinition>,
    /// Category buckets in first-use order
    categories: Vec<ArtifactBucket>,
}

/// One category bucket.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct ArtifactBucket {
    /// Category name
    name: String,
    /// Positions in `modules`, in append order
    modules: Vec<usize>,
}

impl ArtifactDocument {
    fn from_index(index: &ManifestIndex) -> Self {
        let mut positions: HashMap<*const ModuleDefinition, usize> = HashMap::new();
        let mut modules = Vec::new();
        let mut categories = Vec::with_capacity(index.len());

        for (name, bucket) in index.iter() {
            let refs = bucket
                .iter()
                .map(|module| {
                    *positions.entry(Arc::as_ptr(module)).or_insert_with(|| {
                        modules.push(ModuleDefinition::clone(module));
                        modules.len() - 1
                    })
                })
                .collect();
            categories.push(ArtifactBucket {
                name: name.to_string(),
                modules: refs,
            });
        }

        Self {
            modules,
            categories,
        }
    }

    fn into_index(self) -> Result<ManifestIndex> {
        let modules: Vec<Arc<ModuleDefinition>> = self.modules.into_iter().map(Arc::new).collect();
        let mut index = ManifestIndex::new();

        for bucket in self.categories {
            if bucket.modules.is_empty() {
                return Err(ManifestError::InvalidArtifact(format!(
                    "category '{}' has no modules",
                    bucket.name
                )));
            }
            if index.contains_category(&bucket.name) {
                return Err(ManifestError::InvalidArtifact(format!(
                    "category '{}' appears twice",
                    bucket.name
                )));
            }
            for position in bucket.modules {
                let module = modules.get(position).ok_or_else(|| {
                    ManifestError::InvalidArtifact(format!(
                        "category '{}' references missing module #{position}",
                        bucket.name
                    ))
                })?;
                index.push(&bucket.name, Arc::clone(module));
            }
        }

        Ok(index)
    }
}

/// Encode an index into artifact text.
///
/// `chunk_width` caps payload line length in bytes; `0` keeps the payload
/// on one line. The output is a pure function of the index, so unchanged
/// input produces byte-identical artifacts.
///
/// # Errors
///
/// Returns [`ManifestError::Encode`] if JSON serialization fails.
pub fn encode_manifest(index: &ManifestIndex, chunk_width: usize) -> Result<String> {
    let payload = serde_json::to_string(&ArtifactDocument::from_index(index))?;
    let digest = payload_digest(&payload);

    let mut out = String::with_capacity(payload.len() + payload.len() / chunk_width.max(1) + 160);
    out.push_str(&format!("{ARTIFACT_MAGIC} format={ARTIFACT_FORMAT_VERSION}\n"));
    out.push_str(GENERATED_NOTICE);
    out.push('\n');
    out.push_str(CHECKSUM_PREFIX);
    out.push_str(&digest);
    out.push('\n');
    for chunk in chunk_payload(&payload, chunk_width) {
        out.push_str(chunk);
        out.push('\n');
    }
    Ok(out)
}

/// Decode artifact text back into an index.
///
/// # Errors
///
/// Returns [`ManifestError::InvalidArtifact`] for a missing or unknown
/// header, a missing payload or malformed JSON, and
/// [`ManifestError::ChecksumMismatch`] for a modified or truncated payload.
pub fn decode_manifest(text: &str) -> Result<ManifestIndex> {
    let mut lines = text.lines();

    let header = lines
        .next()
        .ok_or_else(|| ManifestError::InvalidArtifact("empty artifact".to_string()))?;
    let version = header
        .strip_prefix(ARTIFACT_MAGIC)
        .and_then(|rest| rest.trim().strip_prefix("format="))
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or_else(|| ManifestError::InvalidArtifact("missing artifact header".to_string()))?;
    if version != ARTIFACT_FORMAT_VERSION {
        return Err(ManifestError::InvalidArtifact(format!(
            "unsupported format version {version}"
        )));
    }

    let mut expected_digest = None;
    let mut payload = String::with_capacity(text.len());
    let mut in_header = true;
    for line in lines {
        if in_header && line.starts_with('#') {
            if let Some(digest) = line.strip_prefix(CHECKSUM_PREFIX) {
                expected_digest = Some(digest.trim().to_string());
            }
            continue;
        }
        in_header = false;
        payload.push_str(line);
    }

    if payload.is_empty() {
        return Err(ManifestError::InvalidArtifact("missing payload".to_string()));
    }
    let expected = expected_digest
        .ok_or_else(|| ManifestError::InvalidArtifact("missing checksum".to_string()))?;
    let actual = payload_digest(&payload);
    if !expected.eq_ignore_ascii_case(&actual) {
        return Err(ManifestError::ChecksumMismatch { expected, actual });
    }

    let document: ArtifactDocument = serde_json::from_str(&payload)
        .map_err(|e| ManifestError::InvalidArtifact(format!("malformed payload: {e}")))?;
    document.into_index()
}

/// Encode `index` and atomically replace the artifact at `path`.
///
/// Missing parent directories are created. Returns the number of bytes
/// written.
///
/// # Errors
///
/// Returns [`ManifestError::Write`] if the artifact cannot be written; the
/// previous artifact, if any, is left untouched.
pub fn write_artifact(path: &Path, index: &ManifestIndex, chunk_width: usize) -> Result<u64> {
    let encoded = encode_manifest(index, chunk_width)?;
    let write_err = |source: std::io::Error| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
    tmp.write_all(encoded.as_bytes()).map_err(write_err)?;
    set_artifact_permissions(tmp.as_file(), path).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::info!(
        path = %path.display(),
        bytes = encoded.len(),
        categories = index.len(),
        "wrote manifest artifact"
    );
    Ok(encoded.len() as u64)
}

/// Read and decode the artifact at `path`.
///
/// This is all a runtime consumer needs; it does not touch the discovery
/// pipeline.
///
/// # Errors
///
/// Returns [`ManifestError::Read`] if the file cannot be read, or any
/// [`decode_manifest`] error.
pub fn load_manifest(path: &Path) -> Result<ManifestIndex> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_manifest(&text)
}

/// JSON Schema of the artifact payload document.
#[must_use]
pub fn artifact_schema() -> String {
    let schema = schemars::schema_for!(ArtifactDocument);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

fn payload_digest(payload: &str) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}

/// Split on UTF-8 boundaries into pieces of at most `width` bytes.
///
/// A single character wider than `width` gets a piece of its own.
fn chunk_payload(payload: &str, width: usize) -> Vec<&str> {
    if width == 0 || payload.len() <= width {
        return vec![payload];
    }

    let mut chunks = Vec::with_capacity(payload.len() / width + 1);
    let mut start = 0;
    while start < payload.len() {
        let mut end = (start + width).min(payload.len());
        while !payload.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            end = start
                + payload[start..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

// Keep the mode of an artifact being replaced; new artifacts are 0644
// rather than the 0600 of a fresh temp file.
#[cfg(unix)]
fn set_artifact_permissions(file: &fs::File, target: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match fs::metadata(target) {
        Ok(existing) if existing.is_file() => existing.permissions(),
        _ => fs::Permissions::from_mode(0o644),
    };
    file.set_permissions(permissions)
}

#[cfg(not(unix))]
fn set_artifact_permissions(_file: &fs::File, _target: &Path) -> std::io::Result<()> {
    Ok(())
}
