//! Owned query-result types.
//!
//! Every resolver returns owned data so callers never hold lifetimes into
//! the parsed document. All types serialize for `--json` output.

use serde::Serialize;

use crate::groups::split_group_tags;

/// One parameter of a command: optional type token plus parameter name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    /// Type token (e.g. "GLenum"), when the declaration carries one.
    pub ctype: Option<String>,
    /// Parameter name.
    pub name: String,
}

/// A command (function) definition from the `<commands>` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionEntry {
    /// Command name (case-insensitive identity).
    pub name: String,
    /// Return type token, if any ("void" commands may omit it).
    pub return_type: Option<String>,
    /// Parameters in declaration order.
    pub params: Vec<Param>,
    /// Name of the command this one aliases, if declared.
    pub alias_of: Option<String>,
}

impl FunctionEntry {
    /// Render a C-style signature, e.g. `void glFoo (GLenum mode, GLint x)`.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        if let Some(ret) = &self.return_type {
            out.push_str(ret);
            out.push(' ');
        }
        out.push_str(&self.name);
        out.push_str(" (");
        if self.params.is_empty() {
            out.push_str("void");
        } else {
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if let Some(ctype) = &param.ctype {
                    out.push_str(ctype);
                    out.push(' ');
                }
                out.push_str(&param.name);
            }
        }
        out.push(')');
        out
    }
}

/// An enum constant definition from an `<enums>` container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantEntry {
    /// Constant name (case-insensitive identity within its container).
    pub name: String,
    /// Decoded numeric value. Equal values are the alias signal.
    pub value: u64,
    /// The value attribute exactly as written in the registry.
    pub raw_value: String,
    /// The comma-delimited `group` attribute, unsplit, if present.
    pub group_attr: Option<String>,
}

impl ConstantEntry {
    /// Group tags this constant carries, split and deduplicated.
    pub fn groups(&self) -> Vec<String> {
        self.group_attr
            .as_deref()
            .map(split_group_tags)
            .unwrap_or_default()
    }
}

/// A located symbol: either a command or an enum constant.
///
/// Commands are searched before constants, matching the registry's own
/// convention that the two namespaces do not overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Symbol {
    Function(FunctionEntry),
    Constant(ConstantEntry),
}

/// Identity of a versioned feature set (`<feature api=.. name=.. number=..>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureInfo {
    /// API family tag, e.g. "gl" or "gles2".
    pub api: String,
    /// Feature name, e.g. "GL_VERSION_3_0".
    pub name: String,
    /// Version number as written, e.g. "3.0".
    pub number: String,
}

/// What a feature set does with a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Require,
    Deprecate,
    Remove,
}

impl ActionKind {
    /// All kinds, in the order they are tested within a feature.
    pub const ALL: [ActionKind; 3] = [ActionKind::Require, ActionKind::Deprecate, ActionKind::Remove];

    /// The element tag carrying this action in the registry.
    pub fn tag(self) -> &'static str {
        match self {
            ActionKind::Require => "require",
            ActionKind::Deprecate => "deprecate",
            ActionKind::Remove => "remove",
        }
    }

    /// Human-readable label used by the report output.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Require => "Core in",
            ActionKind::Deprecate => "Deprecated in",
            ActionKind::Remove => "Removed in",
        }
    }
}

/// One provenance record: a feature set acting on the queried symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Origin {
    pub feature: FeatureInfo,
    pub action: ActionKind,
}

/// An extension that provides a symbol through its require list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionInfo {
    /// Extension name, e.g. "GL_ARB_vertex_buffer_object".
    pub name: String,
    /// The `supported` tag: API families the extension applies to.
    pub supported: String,
}

/// Result of function alias resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionAliases {
    /// The canonical entry the alias chain resolves to.
    pub canonical: FunctionEntry,
    /// Every other name for the same command, the queried name excluded.
    pub aliases: Vec<String>,
}

/// Result of constant alias resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstantAliases {
    /// The defining entry for the queried name.
    pub entry: ConstantEntry,
    /// Same-valued siblings in the same container, the queried name excluded.
    pub aliases: Vec<String>,
}

/// A constant surfaced by a group query, with its provenance attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMatch {
    pub constant: ConstantEntry,
    pub origins: Vec<Origin>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_with_params() {
        let entry = FunctionEntry {
            name: "glFoo".into(),
            return_type: Some("void".into()),
            params: vec![
                Param { ctype: Some("GLenum".into()), name: "mode".into() },
                Param { ctype: Some("GLint".into()), name: "x".into() },
            ],
            alias_of: None,
        };
        assert_eq!(entry.signature(), "void glFoo (GLenum mode, GLint x)");
    }

    #[test]
    fn signature_without_params_is_void() {
        let entry = FunctionEntry {
            name: "glFinish".into(),
            return_type: Some("void".into()),
            params: Vec::new(),
            alias_of: None,
        };
        assert_eq!(entry.signature(), "void glFinish (void)");
    }

    #[test]
    fn signature_without_return_type() {
        let entry = FunctionEntry {
            name: "glBar".into(),
            return_type: None,
            params: vec![Param { ctype: None, name: "n".into() }],
            alias_of: None,
        };
        assert_eq!(entry.signature(), "glBar (n)");
    }

    #[test]
    fn constant_groups_split() {
        let entry = ConstantEntry {
            name: "GL_X".into(),
            value: 1,
            raw_value: "0x1".into(),
            group_attr: Some("AttribMask,GetPName".into()),
        };
        assert_eq!(entry.groups(), vec!["AttribMask", "GetPName"]);
    }

    #[test]
    fn constant_without_group_attr() {
        let entry = ConstantEntry {
            name: "GL_X".into(),
            value: 1,
            raw_value: "0x1".into(),
            group_attr: None,
        };
        assert!(entry.groups().is_empty());
    }

    #[test]
    fn action_kind_order() {
        assert_eq!(
            ActionKind::ALL,
            [ActionKind::Require, ActionKind::Deprecate, ActionKind::Remove]
        );
        assert_eq!(ActionKind::Remove.label(), "Removed in");
        assert_eq!(ActionKind::Deprecate.tag(), "deprecate");
    }
}
