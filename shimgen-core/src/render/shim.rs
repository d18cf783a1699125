//! `#undef`/`#define` pairs with host and target shims.
//!
//! A host shim keeps the value from the scanned header reachable as a typed
//! `HOST_`-prefixed constant before the macro is redefined. Target macros are
//! renamed under `TARGET_` instead and never get a host shim.

use std::borrow::Cow;

use crate::request::MacroRole;
use crate::resolve::FoundMacro;

use super::literal::{is_literal_constant, strip_trailing_comment};

pub const HOST_PREFIX: &str = "HOST_";
pub const TARGET_PREFIX: &str = "TARGET_";

/// Close a block comment the captured text leaves open.
///
/// A `#define` line ending in `/* ...` continues its comment on the next
/// line of the source header; reusing it verbatim would swallow whatever
/// follows in the output.
pub fn close_open_comment(text: &str) -> Cow<'_, str> {
    let Some(open) = text.rfind("/*") else {
        return Cow::Borrowed(text);
    };
    if text[open + 2..].contains("*/") {
        return Cow::Borrowed(text);
    }
    let mut fixed = text.to_string();
    if !fixed.ends_with(|c: char| c == ' ' || c == '\t') {
        fixed.push(' ');
    }
    fixed.push_str("*/");
    Cow::Owned(fixed)
}

/// Whether a non-target macro gets a host shim.
pub fn wants_host_shim(found: &FoundMacro, role: MacroRole) -> bool {
    match role {
        MacroRole::Target => false,
        MacroRole::ForceHost => true,
        MacroRole::Plain => is_literal_constant(strip_trailing_comment(&found.text)),
    }
}

/// Lines emitted for one macro. `origin` is the source path shown in the
/// provenance comment.
pub fn render_macro(found: &FoundMacro, role: MacroRole, origin: &str) -> Vec<String> {
    let provenance = format!("/* found in: {} */", origin);
    let define = |name: &str| format!("#define {}{}", name, close_open_comment(&found.text));
    let name = found.name.as_str();

    if role == MacroRole::Target {
        let target = format!("{}{}", TARGET_PREFIX, name);
        return vec![
            format!("#if defined({})", target),
            format!("#undef {}", target),
            format!("#endif {}", provenance),
            define(&target),
        ];
    }

    if wants_host_shim(found, role) {
        let host = format!("{}{}", HOST_PREFIX, name);
        vec![
            format!("#if defined({}) && !defined({})", name, host),
            format!("static const typeof({}) {} = {};", name, host, name),
            format!("#endif {}", provenance),
            format!("#undef {}", name),
            define(name),
        ]
    } else {
        vec![format!("#undef {} {}", name, provenance), define(name)]
    }
}
