//! Rendering of a [`Resolution`] into one self-contained header.
//!
//! Sections, in order: optional banner, forward declarations, macro shims,
//! struct definitions. Each struct body is preceded by a comment naming the
//! file it came from.

pub mod banner;
pub mod literal;
pub mod shim;

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::request::FindRequest;
use crate::resolve::{FoundStruct, Resolution};
use crate::scan::HeaderTree;

pub use banner::Banner;
pub use literal::is_literal_constant;
pub use shim::{close_open_comment, render_macro, HOST_PREFIX, TARGET_PREFIX};

/// Order of the struct definitions section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StructOrder {
    /// Discovery order: every struct after the structs it references.
    #[default]
    Discovery,
    /// Reverse discovery order: dependents first.
    Reverse,
}

impl FromStr for StructOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discovery" => Ok(Self::Discovery),
            "reverse" => Ok(Self::Reverse),
            other => Err(format!(
                "unknown struct order '{}' (expected \"discovery\" or \"reverse\")",
                other
            )),
        }
    }
}

impl fmt::Display for StructOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Discovery => "discovery",
            Self::Reverse => "reverse",
        })
    }
}

/// Order of the forward declarations section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeclarationOrder {
    /// Dependencies in discovery order, then opaque references, then the
    /// requested structs in request order.
    #[default]
    RequestedLast,
    /// Every found struct in discovery order, then opaque references.
    Discovery,
}

impl FromStr for DeclarationOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested-last" => Ok(Self::RequestedLast),
            "discovery" => Ok(Self::Discovery),
            other => Err(format!(
                "unknown declaration order '{}' (expected \"requested-last\" or \"discovery\")",
                other
            )),
        }
    }
}

impl fmt::Display for DeclarationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RequestedLast => "requested-last",
            Self::Discovery => "discovery",
        })
    }
}

/// Rendering policy and the optional banner.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub struct_order: StructOrder,
    pub declaration_order: DeclarationOrder,
    /// `None` omits the banner entirely.
    pub banner: Option<Banner>,
}

/// Names to forward-declare, each exactly once.
pub fn declaration_names<'r>(
    resolution: &'r Resolution,
    request: &FindRequest,
    order: DeclarationOrder,
) -> Vec<&'r str> {
    let opaque = resolution.opaque.iter().map(String::as_str);
    match order {
        DeclarationOrder::Discovery => resolution
            .structs
            .iter()
            .map(|s| s.name.as_str())
            .chain(opaque)
            .collect(),
        DeclarationOrder::RequestedLast => {
            let deps = resolution
                .structs
                .iter()
                .filter(|s| !request.is_requested_struct(&s.name))
                .map(|s| s.name.as_str());
            let requested = request
                .structs()
                .iter()
                .filter_map(|name| resolution.find_struct(name))
                .map(|s| s.name.as_str());
            deps.chain(opaque).chain(requested).collect()
        }
    }
}

/// Render the resolution, or `None` (with a warning) when nothing was found.
pub fn render(
    resolution: &Resolution,
    request: &FindRequest,
    tree: &HeaderTree,
    options: &RenderOptions,
) -> Option<String> {
    if resolution.is_empty() && resolution.opaque.is_empty() {
        warn!("no structs or defines found");
        return None;
    }

    let mut out: Vec<String> = Vec::new();

    if let Some(banner) = &options.banner {
        out.extend(banner.lines());
    }

    let decls = declaration_names(resolution, request, options.declaration_order);
    if !decls.is_empty() {
        out.push(String::new());
        out.push("/* Forward declarations: */".to_string());
        out.extend(decls.iter().map(|name| format!("struct {};", name)));
    }

    if !resolution.macros.is_empty() {
        out.push(String::new());
        out.push("/* Defines: */".to_string());
        for m in &resolution.macros {
            let origin = tree.display_path(&m.file);
            out.extend(render_macro(m, request.macro_role(&m.name), &origin));
        }
    }

    if !resolution.structs.is_empty() {
        out.push(String::new());
        out.push("/* Struct definitions: */".to_string());
        let mut structs: Vec<&FoundStruct> = resolution.structs.iter().collect();
        if options.struct_order == StructOrder::Reverse {
            structs.reverse();
        }
        for s in structs {
            out.push(String::new());
            out.push(format!(
                "/* '{}' found in: {} */",
                s.name,
                tree.display_path(&s.file)
            ));
            out.push(s.text.clone());
        }
    }

    let mut text = out.join("\n");
    text.push('\n');
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::FoundMacro;
    use std::path::PathBuf;

    fn request(structs: &[&str], defines: &[&str], target: &[&str]) -> FindRequest {
        let v = |s: &[&str]| s.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        FindRequest::new(v(structs), v(defines), vec![], v(target), vec![]).unwrap()
    }

    fn found_struct(name: &str, file: &str) -> FoundStruct {
        FoundStruct {
            name: name.to_string(),
            text: format!("struct {} {{\n\tint x;\n}};", name),
            file: PathBuf::from(file),
        }
    }

    fn tree() -> HeaderTree {
        // Rendering only needs the root for relative paths.
        HeaderTree::from_parts(PathBuf::from("/src/include"), Vec::new())
    }

    #[test]
    fn test_order_policies_parse() {
        assert_eq!("reverse".parse::<StructOrder>(), Ok(StructOrder::Reverse));
        assert_eq!(
            "requested-last".parse::<DeclarationOrder>(),
            Ok(DeclarationOrder::RequestedLast)
        );
        assert!("sideways".parse::<StructOrder>().is_err());
        assert_eq!(StructOrder::default().to_string(), "discovery");
    }

    #[test]
    fn test_declarations_requested_last() {
        let res = Resolution {
            structs: vec![
                found_struct("dep", "/src/include/d.h"),
                found_struct("b", "/src/include/b.h"),
                found_struct("a", "/src/include/a.h"),
            ],
            macros: vec![],
            opaque: vec!["sockaddr".into()],
        };
        let req = request(&["a", "b"], &[], &[]);
        assert_eq!(
            declaration_names(&res, &req, DeclarationOrder::RequestedLast),
            vec!["dep", "sockaddr", "a", "b"]
        );
        assert_eq!(
            declaration_names(&res, &req, DeclarationOrder::Discovery),
            vec!["dep", "b", "a", "sockaddr"]
        );
    }

    #[test]
    fn test_full_render_without_banner() {
        let res = Resolution {
            structs: vec![
                found_struct("b", "/src/include/x/b.h"),
                found_struct("a", "/src/include/a.h"),
            ],
            macros: vec![FoundMacro {
                name: "LIMIT".into(),
                text: " 42".into(),
                file: PathBuf::from("/src/include/a.h"),
            }],
            opaque: vec![],
        };
        let req = request(&["a"], &["LIMIT"], &[]);
        let text = render(&res, &req, &tree(), &RenderOptions::default()).unwrap();
        let expected = "
/* Forward declarations: */
struct b;
struct a;

/* Defines: */
#if defined(LIMIT) && !defined(HOST_LIMIT)
static const typeof(LIMIT) HOST_LIMIT = LIMIT;
#endif /* found in: include/a.h */
#undef LIMIT
#define LIMIT 42

/* Struct definitions: */

/* 'b' found in: include/x/b.h */
struct b {
\tint x;
};

/* 'a' found in: include/a.h */
struct a {
\tint x;
};
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_reverse_struct_order() {
        let res = Resolution {
            structs: vec![
                found_struct("b", "/src/include/b.h"),
                found_struct("a", "/src/include/a.h"),
            ],
            macros: vec![],
            opaque: vec![],
        };
        let req = request(&["a"], &[], &[]);
        let options = RenderOptions {
            struct_order: StructOrder::Reverse,
            ..RenderOptions::default()
        };
        let text = render(&res, &req, &tree(), &options).unwrap();
        let a = text.find("struct a {").unwrap();
        let b = text.find("struct b {").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_banner_comes_first() {
        let res = Resolution {
            structs: vec![found_struct("a", "/src/include/a.h")],
            macros: vec![],
            opaque: vec![],
        };
        let options = RenderOptions {
            banner: Some(Banner::new("shimgen include shim.toml", None)),
            ..RenderOptions::default()
        };
        let text = render(&res, &request(&["a"], &[], &[]), &tree(), &options).unwrap();
        assert!(text.starts_with("#pragma once /* Auto generated by: shimgen include shim.toml */\n\n/* Forward declarations: */\nstruct a;\n"));
    }

    #[test]
    fn test_nothing_found_renders_nothing() {
        let res = Resolution::default();
        assert!(render(&res, &request(&[], &[], &[]), &tree(), &RenderOptions::default()).is_none());
    }
}
