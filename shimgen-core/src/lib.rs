//! shimgen-core: extract C struct and `#define` definitions from a header tree
//!
//! Given a directory of C headers and a list of wanted names, this library
//! finds each definition, follows the `struct` references inside every struct
//! body until the set is closed, and renders one self-contained header with
//! forward declarations, macro shims and dependency-ordered struct bodies.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use shimgen_core::prelude::*;
//!
//! let config = load_config("io_uring.toml".as_ref())?;
//! let request = FindRequest::from_config(&config)?;
//! let header = Shimgen::new("/src/linux/include", request)
//!     .with_output_config(&config.output)?
//!     .generate()?;
//! ```
//!
//! # Module Organization
//!
//! - [`scan`]: Deterministic header discovery
//! - [`locate`]: Per-name definition patterns and tree lookup
//! - [`extract`]: `struct NAME` reference extraction
//! - [`resolve`]: Transitive resolution engine
//! - [`render`]: Shim header rendering
//! - [`vcs`]: Revision metadata for the banner
//! - [`builder`]: Fluent builder API for configuration
//! - [`error`]: Typed error handling
//!
//! # Cargo Features
//!
//! - `git` (default): Banner revision metadata from the `git` CLI

pub mod builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod locate;
pub mod logging;
pub mod prelude;
pub mod render;
pub mod request;
pub mod resolve;
pub mod scan;
pub mod vcs;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{IoResultExt, ShimgenError, ShimgenResult};

// Builder API
pub use builder::Shimgen;

// Configuration
pub use config::{load_config, parse_config, OutputConfig, ShimConfig};

// Logging
pub use logging::{init_logging, log_info, log_warn, LogOptions};

// Request
pub use request::{FindRequest, MacroRole};

// File scanning
pub use scan::{gather_header_files, read_header, HeaderTree, DEFAULT_HEADER_SUFFIX};

// Lookup
pub use extract::extract_refs;
pub use locate::{DefinitionKind, Located, Locator};

// Resolution
pub use resolve::{resolve, FoundMacro, FoundStruct, Resolution, ResolveState, Resolver};

// Rendering
pub use render::{
    declaration_names, is_literal_constant, render, render_macro, Banner, DeclarationOrder,
    RenderOptions, StructOrder, HOST_PREFIX, TARGET_PREFIX,
};

// Revision metadata
pub use vcs::{default_provider, NoVcs, VcsInfo, VcsProvider};
#[cfg(feature = "git")]
pub use vcs::GitCli;
