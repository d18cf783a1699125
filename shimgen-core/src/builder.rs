//! Builder pattern API for shim generation.
//!
//! ```rust,ignore
//! use shimgen_core::prelude::*;
//!
//! let request = FindRequest::from_config(&load_config("shim.toml".as_ref())?)?;
//! let header = Shimgen::new("/src/linux/include", request)
//!     .no_header(true)
//!     .generate()?;
//!
//! if let Some(text) = header {
//!     print!("{}", text);
//! }
//! ```

use std::path::PathBuf;

use tracing::info;

use crate::config::OutputConfig;
use crate::error::{ShimgenError, ShimgenResult};
use crate::render::{render, Banner, DeclarationOrder, RenderOptions, StructOrder};
use crate::request::FindRequest;
use crate::resolve::{Resolution, Resolver};
use crate::scan::{HeaderTree, DEFAULT_HEADER_SUFFIX};
use crate::vcs::{default_provider, VcsProvider};

/// Builder for one extraction run.
#[derive(Debug)]
pub struct Shimgen {
    /// Root of the header tree to scan
    root: PathBuf,

    /// What to extract
    request: FindRequest,

    /// File name suffix of scanned headers
    header_suffix: String,

    /// Struct definitions section order
    struct_order: StructOrder,

    /// Forward declarations section order
    declaration_order: DeclarationOrder,

    /// Omit the provenance banner
    no_header: bool,

    /// Command line named in the banner
    command_line: String,

    /// Source of revision metadata for the banner
    vcs: Box<dyn VcsProvider>,
}

impl Shimgen {
    /// Create a builder for `root` and `request`.
    pub fn new(root: impl Into<PathBuf>, request: FindRequest) -> Self {
        Self {
            root: root.into(),
            request,
            header_suffix: DEFAULT_HEADER_SUFFIX.to_string(),
            struct_order: StructOrder::default(),
            declaration_order: DeclarationOrder::default(),
            no_header: false,
            command_line: std::env::args_os()
                .map(|a| a.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" "),
            vcs: default_provider(),
        }
    }

    /// Apply the `[output]` table of a config file.
    pub fn with_output_config(mut self, output: &OutputConfig) -> ShimgenResult<Self> {
        if let Some(order) = &output.struct_order {
            self.struct_order = order
                .parse::<StructOrder>()
                .map_err(|e| ShimgenError::invalid_request(e))?;
        }
        if let Some(order) = &output.declaration_order {
            self.declaration_order = order
                .parse::<DeclarationOrder>()
                .map_err(|e| ShimgenError::invalid_request(e))?;
        }
        if let Some(no_header) = output.no_header {
            self.no_header = no_header;
        }
        Ok(self)
    }

    /// Only scan files whose name ends in `suffix` (default `.h`).
    pub fn header_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.header_suffix = suffix.into();
        self
    }

    pub fn struct_order(mut self, order: StructOrder) -> Self {
        self.struct_order = order;
        self
    }

    pub fn declaration_order(mut self, order: DeclarationOrder) -> Self {
        self.declaration_order = order;
        self
    }

    /// Omit the banner entirely.
    pub fn no_header(mut self, enabled: bool) -> Self {
        self.no_header = enabled;
        self
    }

    /// Command line shown in the banner (defaults to the process arguments).
    pub fn command_line(mut self, command_line: impl Into<String>) -> Self {
        self.command_line = command_line.into();
        self
    }

    /// Replace the revision metadata provider.
    pub fn vcs(mut self, provider: Box<dyn VcsProvider>) -> Self {
        self.vcs = provider;
        self
    }

    /// Scan the tree and resolve the request.
    pub fn resolve(&self) -> ShimgenResult<(HeaderTree, Resolution)> {
        let tree = HeaderTree::open(&self.root, &self.header_suffix)?;
        let resolution = Resolver::new(&tree, &self.request).resolve()?;
        info!(
            structs = resolution.structs.len(),
            macros = resolution.macros.len(),
            "resolution complete"
        );
        Ok((tree, resolution))
    }

    /// Render options for this run, querying revision metadata if a banner is wanted.
    pub fn render_options(&self) -> RenderOptions {
        let banner = (!self.no_header).then(|| {
            Banner::new(self.command_line.clone(), self.vcs.revision_info(&self.root))
        });
        RenderOptions {
            struct_order: self.struct_order,
            declaration_order: self.declaration_order,
            banner,
        }
    }

    /// Run the extraction. `Ok(None)` means nothing was found to emit.
    pub fn generate(&self) -> ShimgenResult<Option<String>> {
        let (tree, resolution) = self.resolve()?;
        Ok(render(&resolution, &self.request, &tree, &self.render_options()))
    }
}
