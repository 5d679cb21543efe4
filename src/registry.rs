//! Section index over a parsed registry document.
//!
//! The registry root interleaves several independently-organized sections;
//! `Registry::new` walks it once and captures a pointer to each section the
//! resolvers need. The index is immutable and is passed by reference into
//! every query, so repeated queries share one parsed tree with no
//! process-wide state.

use roxmltree::{Document, Node};

use crate::types::FeatureInfo;
use crate::XrefError;

/// Immutable index of the registry's sections.
///
/// Holds the ordered `<enums>` containers, the `<commands>` block, the
/// ordered `<feature>` sets, and the `<extensions>` block. The `<types>`
/// section carries free-form declarations the cross-referencer never
/// reads, so it is not indexed.
#[derive(Debug, Clone)]
pub struct Registry<'a, 'input: 'a> {
    pub(crate) enums: Vec<Node<'a, 'input>>,
    pub(crate) commands: Option<Node<'a, 'input>>,
    pub(crate) features: Vec<Node<'a, 'input>>,
    pub(crate) extensions: Option<Node<'a, 'input>>,
}

impl<'a, 'input: 'a> Registry<'a, 'input> {
    /// Build the section index from a parsed document.
    ///
    /// Sections absent from the document simply stay empty; the matching
    /// queries then report not-found.
    pub fn new(doc: &'a Document<'input>) -> Self {
        let root = doc.root_element();

        let mut enums = Vec::new();
        let mut commands = None;
        let mut features = Vec::new();
        let mut extensions = None;

        for child in root.children().filter(Node::is_element) {
            match child.tag_name().name() {
                "enums" => enums.push(child),
                "commands" => commands = commands.or(Some(child)),
                "feature" => features.push(child),
                "extensions" => extensions = extensions.or(Some(child)),
                _ => {}
            }
        }

        Self { enums, commands, features, extensions }
    }

    /// List every feature set declared in the registry, in document order.
    pub fn features(&self) -> Result<Vec<FeatureInfo>, XrefError> {
        self.features.iter().map(|node| feature_info(*node)).collect()
    }

    /// Iterate `<command>` entries in document order.
    pub(crate) fn command_nodes(&self) -> impl Iterator<Item = Node<'a, 'input>> + '_ {
        self.commands
            .into_iter()
            .flat_map(|section| section.children().filter(|n| n.has_tag_name("command")))
    }

    /// Iterate `(container, entry)` pairs for every `<enum>` in every
    /// `<enums>` container, in document order.
    pub(crate) fn enum_nodes(
        &self,
    ) -> impl Iterator<Item = (Node<'a, 'input>, Node<'a, 'input>)> + '_ {
        self.enums.iter().copied().flat_map(|container| {
            container
                .children()
                .filter(|n| n.has_tag_name("enum"))
                .map(move |entry| (container, entry))
        })
    }
}

/// Decode the identity attributes of a `<feature>` node.
///
/// Provenance reporting reads all three, so a feature missing any of them
/// is a schema violation worth failing on.
pub(crate) fn feature_info(node: Node) -> Result<FeatureInfo, XrefError> {
    let api = require_attr(node, "api")?;
    let name = require_attr(node, "name")?;
    let number = require_attr(node, "number")?;
    Ok(FeatureInfo {
        api: api.to_string(),
        name: name.to_string(),
        number: number.to_string(),
    })
}

/// Fetch an attribute the schema makes mandatory, or fail with a message
/// naming the offending element.
pub(crate) fn require_attr<'a>(node: Node<'a, '_>, attr: &str) -> Result<&'a str, XrefError> {
    node.attribute(attr).ok_or_else(|| {
        XrefError::Malformed(format!(
            "<{}> element is missing its '{}' attribute",
            node.tag_name().name(),
            attr
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGISTRY: &str = r#"<registry>
        <types><type name="GLenum"/></types>
        <enums namespace="GL" group="AttribMask">
            <enum name="GL_CURRENT_BIT" value="0x00000001"/>
        </enums>
        <enums namespace="GL">
            <enum name="GL_POINTS" value="0x0000"/>
            <enum name="GL_LINES" value="0x0001"/>
        </enums>
        <commands namespace="GL">
            <command><proto>void <name>glFlush</name></proto></command>
        </commands>
        <feature api="gl" name="GL_VERSION_1_0" number="1.0">
            <require><enum name="GL_POINTS"/></require>
        </feature>
        <feature api="gles2" name="GL_ES_VERSION_2_0" number="2.0"/>
        <extensions>
            <extension name="GL_EXT_dummy" supported="gl"/>
        </extensions>
    </registry>"#;

    #[test]
    fn index_captures_all_sections() {
        let doc = Document::parse(REGISTRY).unwrap();
        let registry = Registry::new(&doc);

        assert_eq!(registry.enums.len(), 2);
        assert!(registry.commands.is_some());
        assert_eq!(registry.features.len(), 2);
        assert!(registry.extensions.is_some());

        assert_eq!(registry.command_nodes().count(), 1);
        assert_eq!(registry.enum_nodes().count(), 3);
    }

    #[test]
    fn missing_sections_stay_empty() {
        let doc = Document::parse("<registry/>").unwrap();
        let registry = Registry::new(&doc);

        assert!(registry.enums.is_empty());
        assert!(registry.commands.is_none());
        assert_eq!(registry.features().unwrap().len(), 0);
        assert_eq!(registry.enum_nodes().count(), 0);
    }

    #[test]
    fn features_listed_in_document_order() {
        let doc = Document::parse(REGISTRY).unwrap();
        let registry = Registry::new(&doc);

        let features = registry.features().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name, "GL_VERSION_1_0");
        assert_eq!(features[0].api, "gl");
        assert_eq!(features[0].number, "1.0");
        assert_eq!(features[1].name, "GL_ES_VERSION_2_0");
    }

    #[test]
    fn feature_missing_number_is_malformed() {
        let doc =
            Document::parse(r#"<registry><feature api="gl" name="GL_VERSION_1_0"/></registry>"#)
                .unwrap();
        let registry = Registry::new(&doc);

        let err = registry.features().unwrap_err();
        assert!(err.to_string().contains("number"));
    }
}
