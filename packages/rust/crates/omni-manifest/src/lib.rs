//! Omni-Manifest - Build-time module discovery for Omni-Dev-Fusion.
//!
//! Walks a source tree, finds classes annotated with an `@module` marker,
//! groups them by category and writes a reloadable manifest artifact that
//! application startup code loads instead of rescanning.
//!
//! # Architecture
//!
//! ```text
//! omni-manifest/src/
//! ├── lib.rs          # Main module and exports
//! ├── category.rs     # @module category grammar
//! ├── definition.rs   # ModuleDefinition
//! ├── extractor.rs    # namespace / marker / class extraction
//! ├── scanner.rs      # ModuleScanner tree walk
//! ├── manifest.rs     # ManifestIndex (category -> modules)
//! ├── artifact.rs     # Artifact encode / decode / atomic write
//! ├── generator.rs    # ManifestGenerator pipeline
//! ├── config.rs       # GeneratorConfig, ManifestSettings
//! ├── error.rs        # ManifestError
//! ├── cli.rs          # Command-line arguments (binary only)
//! └── main.rs         # omni-manifest binary
//! ```
//!
//! # Annotation
//!
//! ```text
//! namespace App;
//!
//! /**
//!  * @module svc(priority=1) admin
//!  */
//! class Mailer
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use omni_manifest::{GeneratorConfig, ManifestGenerator, load_manifest};
//!
//! // Build time
//! let generator = ManifestGenerator::new(GeneratorConfig::for_root("."));
//! generator.dump_to_file()?;
//!
//! // Startup
//! let manifest = load_manifest(Path::new("vendor/modules.manifest"))?;
//! for module in manifest.get("svc").unwrap_or_default() {
//!     println!("{}", module.qualified_name());
//! }
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod artifact;
pub mod category;
pub mod config;
pub mod definition;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod manifest;
pub mod scanner;

// ============================================================================
// Re-exports
// ============================================================================

pub use artifact::{
    ARTIFACT_FORMAT_VERSION, ARTIFACT_MAGIC, artifact_schema, decode_manifest, encode_manifest,
    load_manifest, write_artifact,
};
pub use category::{CategoryAttribute, ModuleCategory, parse_categories};
pub use config::{
    DEFAULT_CHUNK_WIDTH, DEFAULT_EXCLUDED_DIRS, DEFAULT_OUTPUT_PATH, DEFAULT_SETTINGS_FILE,
    DEFAULT_SOURCE_EXTENSION, GeneratorConfig, ManifestSettings, load_settings, project_root,
};
pub use definition::ModuleDefinition;
pub use error::{ManifestError, Result};
pub use extractor::{extract_module, find_module_marker, find_namespaces, find_type_name};
pub use generator::{GenerationReport, ManifestGenerator};
pub use manifest::{ManifestIndex, build_manifest};
pub use scanner::ModuleScanner;

// ============================================================================
// Version
// ============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
