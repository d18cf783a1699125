//! "Do not edit" banner naming how the header was produced.

use crate::vcs::VcsInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// The invoking command line.
    pub command_line: String,
    pub vcs: Option<VcsInfo>,
}

impl Banner {
    pub fn new(command_line: impl Into<String>, vcs: Option<VcsInfo>) -> Self {
        Self {
            command_line: command_line.into(),
            vcs,
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "#pragma once /* Auto generated by: {} */",
            comment_safe(&self.command_line)
        )];
        if let Some(vcs) = &self.vcs {
            lines.push(format!(
                "/* From Git revision: {} branch: {} */",
                comment_safe(&vcs.revision),
                comment_safe(&vcs.branch)
            ));
        }
        lines
    }
}

/// Text that cannot terminate the surrounding block comment.
fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_without_vcs() {
        let b = Banner::new("shimgen include shim.toml", None);
        assert_eq!(
            b.lines(),
            vec!["#pragma once /* Auto generated by: shimgen include shim.toml */"]
        );
    }

    #[test]
    fn test_banner_with_vcs() {
        let b = Banner::new(
            "shimgen inc cfg.toml",
            Some(VcsInfo {
                revision: "0123abcd".into(),
                branch: "main".into(),
            }),
        );
        assert_eq!(
            b.lines()[1],
            "/* From Git revision: 0123abcd branch: main */"
        );
    }

    #[test]
    fn test_command_line_cannot_close_comment() {
        let b = Banner::new("shimgen 'inc/*/' x.toml", None);
        assert!(!b.lines()[0][..b.lines()[0].len() - 2].contains("*/"));
    }
}
