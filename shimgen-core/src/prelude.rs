//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use shimgen_core::prelude::*;
//! ```
//!
//! This covers a typical extraction run without pulling in the lower-level
//! locator and pattern types.

// Core types
pub use crate::error::{ShimgenError, ShimgenResult};
pub use crate::request::FindRequest;

// Configuration
pub use crate::config::{load_config, ShimConfig};

// Builder API
pub use crate::builder::Shimgen;

// Step-by-step pipeline
pub use crate::resolve::{resolve, Resolution};
pub use crate::render::{render, DeclarationOrder, RenderOptions, StructOrder};
pub use crate::scan::HeaderTree;
