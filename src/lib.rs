//! # gl-xref
//!
//! Symbol cross-reference for Khronos-style API registry XML files.
//!
//! Given a parsed `gl.xml`-convention registry, this library answers
//! "what is this symbol, and where did it come from?": which command or
//! enum constant defines it, which entries alias it, which API versions
//! require/deprecate/remove it, which extension provides it, and which
//! enum groups it belongs to.
//!
//! The registry document is parsed once (by `roxmltree`) and treated as
//! immutable; every query is a pure scan over the tree, so queries may be
//! repeated in any order.
//!
//! ## Example
//!
//! ```
//! use gl_xref::Registry;
//!
//! let xml = r#"<registry>
//!     <enums namespace="GL">
//!         <enum name="GL_POINTS" value="0x0000" group="PrimitiveType"/>
//!     </enums>
//! </registry>"#;
//!
//! let doc = roxmltree::Document::parse(xml).unwrap();
//! let registry = Registry::new(&doc);
//!
//! let entry = registry.locate_constant("GL_POINTS").unwrap().unwrap();
//! assert_eq!(entry.value, 0);
//! assert_eq!(entry.groups(), vec!["PrimitiveType"]);
//! ```

use thiserror::Error;

pub mod groups;
pub mod provenance;
pub mod registry;
pub mod resolve;
pub mod types;

pub use registry::Registry;
pub use types::{
    ActionKind, ConstantAliases, ConstantEntry, ExtensionInfo, FeatureInfo, FunctionAliases,
    FunctionEntry, GroupMatch, Origin, Param, Symbol,
};

/// Error types for cross-reference operations.
///
/// A symbol that simply isn't in the registry is *not* an error; lookups
/// report that as `None` or an empty list. Errors mean the document itself
/// broke the registry schema's contract.
#[derive(Error, Debug)]
pub enum XrefError {
    /// The registry text is not well-formed XML.
    #[error("failed to parse registry XML: {0}")]
    Parse(String),

    /// An entry the algorithm matched is missing a required attribute or
    /// child (e.g. a `<command>` without a `<proto><name>`).
    #[error("malformed registry: {0}")]
    Malformed(String),
}
