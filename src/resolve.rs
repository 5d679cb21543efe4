//! Symbol location and alias resolution.
//!
//! Lookups are ordered linear scans over the indexed sections, so document
//! declaration order is the tie-break whenever a name (illegally) appears
//! twice. Aliasing is encoded two incompatible ways in the registry and
//! each kind gets its own algorithm:
//!
//! * Commands carry an explicit `<alias name="..">` back-reference pointing
//!   at their canonical entry. Resolution canonicalizes first, then scans
//!   forward collecting every command that points back at the canonical
//!   name.
//! * Enum constants are aliased purely by equal numeric value within one
//!   `<enums>` container. Any `alias` attribute on the entry is ignored:
//!   distinct names map to the same concept in informal ways that
//!   attribute does not capture, and value equality is the robust signal
//!   for this dataset.

use roxmltree::Node;

use crate::registry::{require_attr, Registry};
use crate::types::{ConstantAliases, ConstantEntry, FunctionAliases, FunctionEntry, Param, Symbol};
use crate::XrefError;

impl<'a, 'input: 'a> Registry<'a, 'input> {
    /// Find the defining `<command>` entry for a name, case-insensitive.
    pub fn locate_function(&self, name: &str) -> Result<Option<FunctionEntry>, XrefError> {
        match self.find_command_node(name)? {
            Some(node) => Ok(Some(function_entry(node)?)),
            None => Ok(None),
        }
    }

    /// Find the defining `<enum>` entry for a name, case-insensitive.
    pub fn locate_constant(&self, name: &str) -> Result<Option<ConstantEntry>, XrefError> {
        match self.find_enum_node(name)? {
            Some((_, node)) => Ok(Some(constant_entry(node)?)),
            None => Ok(None),
        }
    }

    /// Find a symbol of either kind. Commands are searched first, then
    /// constants, matching the registry convention that the namespaces do
    /// not overlap.
    pub fn locate(&self, name: &str) -> Result<Option<Symbol>, XrefError> {
        if let Some(function) = self.locate_function(name)? {
            return Ok(Some(Symbol::Function(function)));
        }
        if let Some(constant) = self.locate_constant(name)? {
            return Ok(Some(Symbol::Constant(constant)));
        }
        Ok(None)
    }

    /// Resolve every other name for a command.
    ///
    /// If the located entry carries an alias back-reference, resolution
    /// jumps to that target first (failing closed: an unresolvable target
    /// leaves the located entry as canonical). The forward scan then
    /// collects every later command pointing back at the canonical name.
    /// The queried name itself never appears in the alias list, so the
    /// result is the same whichever member of the alias family is queried.
    pub fn resolve_function_aliases(
        &self,
        name: &str,
    ) -> Result<Option<FunctionAliases>, XrefError> {
        let Some(located) = self.find_command_node(name)? else {
            return Ok(None);
        };

        let canonical_node = match command_alias(located)? {
            Some(target) => self.find_command_node(target)?.unwrap_or(located),
            None => located,
        };
        let canonical_name = command_name(canonical_node)?.to_string();

        let mut aliases = Vec::new();
        if !canonical_name.eq_ignore_ascii_case(name) {
            aliases.push(canonical_name.clone());
        }

        let mut past_canonical = false;
        for command in self.command_nodes() {
            if !past_canonical {
                if command == canonical_node {
                    past_canonical = true;
                }
                continue;
            }
            let Some(target) = command_alias(command)? else {
                continue;
            };
            if target.eq_ignore_ascii_case(&canonical_name) {
                let alias_name = command_name(command)?;
                if !alias_name.eq_ignore_ascii_case(name) {
                    aliases.push(alias_name.to_string());
                }
            }
        }

        Ok(Some(FunctionAliases {
            canonical: function_entry(canonical_node)?,
            aliases,
        }))
    }

    /// Resolve every other name for a constant by value equality.
    ///
    /// Scans the defining entry's whole container from its first entry, so
    /// aliases declared before the queried name are found too. The queried
    /// name is excluded from the result.
    pub fn resolve_constant_aliases(
        &self,
        name: &str,
    ) -> Result<Option<ConstantAliases>, XrefError> {
        let Some((container, located)) = self.find_enum_node(name)? else {
            return Ok(None);
        };
        let entry = constant_entry(located)?;

        let mut aliases = Vec::new();
        for sibling in container.children().filter(|n| n.has_tag_name("enum")) {
            let Some(sibling_name) = sibling.attribute("name") else {
                continue;
            };
            if sibling_name.eq_ignore_ascii_case(name) {
                continue;
            }
            if decoded_value(sibling)? == entry.value {
                aliases.push(sibling_name.to_string());
            }
        }

        Ok(Some(ConstantAliases { entry, aliases }))
    }

    pub(crate) fn find_command_node(
        &self,
        name: &str,
    ) -> Result<Option<Node<'a, 'input>>, XrefError> {
        for command in self.command_nodes() {
            if command_name(command)?.eq_ignore_ascii_case(name) {
                return Ok(Some(command));
            }
        }
        Ok(None)
    }

    pub(crate) fn find_enum_node(
        &self,
        name: &str,
    ) -> Result<Option<(Node<'a, 'input>, Node<'a, 'input>)>, XrefError> {
        for (container, entry) in self.enum_nodes() {
            // Entries with no name (e.g. reserved ranges) can never match.
            if entry
                .attribute("name")
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
            {
                return Ok(Some((container, entry)));
            }
        }
        Ok(None)
    }
}

/// The command's defining name, from its `<proto><name>` child.
pub(crate) fn command_name<'a>(command: Node<'a, '_>) -> Result<&'a str, XrefError> {
    let proto = command
        .children()
        .find(|n| n.has_tag_name("proto"))
        .ok_or_else(|| XrefError::Malformed("<command> entry is missing its <proto> child".into()))?;
    proto
        .children()
        .find(|n| n.has_tag_name("name"))
        .and_then(|n| n.text())
        .ok_or_else(|| XrefError::Malformed("<proto> is missing its <name> child".into()))
}

/// The command's alias back-reference target, if declared.
fn command_alias<'a>(command: Node<'a, '_>) -> Result<Option<&'a str>, XrefError> {
    match command.children().find(|n| n.has_tag_name("alias")) {
        Some(alias) => require_attr(alias, "name").map(Some),
        None => Ok(None),
    }
}

/// Build an owned [`FunctionEntry`] from a `<command>` node.
pub(crate) fn function_entry(command: Node) -> Result<FunctionEntry, XrefError> {
    let name = command_name(command)?.to_string();

    let proto = command
        .children()
        .find(|n| n.has_tag_name("proto"))
        .ok_or_else(|| XrefError::Malformed("<command> entry is missing its <proto> child".into()))?;

    // The return type is either a <ptype> token or bare text before the
    // name ("void " for untyped commands).
    let return_type = proto
        .children()
        .find(|n| n.has_tag_name("ptype"))
        .and_then(|n| n.text())
        .or_else(|| proto.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    let mut params = Vec::new();
    for param in command.children().filter(|n| n.has_tag_name("param")) {
        let param_name = param
            .children()
            .find(|n| n.has_tag_name("name"))
            .and_then(|n| n.text())
            .ok_or_else(|| {
                XrefError::Malformed(format!("<param> of '{name}' is missing its <name> child"))
            })?;
        let ctype = param
            .children()
            .find(|n| n.has_tag_name("ptype"))
            .and_then(|n| n.text())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        params.push(Param { ctype, name: param_name.to_string() });
    }

    let alias_of = command_alias(command)?.map(String::from);

    Ok(FunctionEntry { name, return_type, params, alias_of })
}

/// Build an owned [`ConstantEntry`] from an `<enum>` node.
pub(crate) fn constant_entry(entry: Node) -> Result<ConstantEntry, XrefError> {
    let name = require_attr(entry, "name")?.to_string();
    let raw_value = require_attr(entry, "value")?;
    let value = parse_enum_value(raw_value).ok_or_else(|| {
        XrefError::Malformed(format!("enum '{name}' has unparsable value '{raw_value}'"))
    })?;
    Ok(ConstantEntry {
        name,
        value,
        raw_value: raw_value.to_string(),
        group_attr: entry.attribute("group").map(String::from),
    })
}

/// The decoded numeric value of an `<enum>` node.
fn decoded_value(entry: Node) -> Result<u64, XrefError> {
    let raw = require_attr(entry, "value")?;
    parse_enum_value(raw).ok_or_else(|| {
        XrefError::Malformed(format!(
            "enum '{}' has unparsable value '{raw}'",
            entry.attribute("name").unwrap_or("?")
        ))
    })
}

/// Decode a registry value attribute as a fixed-width hexadecimal number.
///
/// Accepts an optional sign and `0x`/`0X` prefix, then reads leading hex
/// digits; trailing width-suffix characters (`u`, `ull`) are ignored.
/// Negative values wrap into 64 bits.
pub(crate) fn parse_enum_value(raw: &str) -> Option<u64> {
    let text = raw.trim();
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let text = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    let end = text
        .find(|c: char| !c.is_ascii_hexdigit())
        .unwrap_or(text.len());
    let digits = &text[..end];
    if digits.is_empty() {
        return None;
    }

    let value = u64::from_str_radix(digits, 16).ok()?;
    Some(if negative { value.wrapping_neg() } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    const REGISTRY: &str = r#"<registry>
        <enums namespace="GL" group="TestGroup">
            <enum name="GL_FOO" value="0x1"/>
            <enum name="GL_BAR" value="0x1"/>
            <enum name="GL_BAZ" value="0x2"/>
        </enums>
        <enums namespace="GL">
            <enum name="GL_OTHER" value="0x1"/>
        </enums>
        <commands namespace="GL">
            <command>
                <proto>void <name>glFoo</name></proto>
                <param><ptype>GLenum</ptype> <name>mode</name></param>
            </command>
            <command>
                <proto>void <name>glFooEXT</name></proto>
                <param><ptype>GLenum</ptype> <name>mode</name></param>
                <alias name="glFoo"/>
            </command>
            <command>
                <proto>void <name>glFooARB</name></proto>
                <param><ptype>GLenum</ptype> <name>mode</name></param>
                <alias name="glFoo"/>
            </command>
            <command>
                <proto><ptype>GLboolean</ptype> <name>glIsThing</name></proto>
            </command>
            <command>
                <proto>void <name>glOrphan</name></proto>
                <alias name="glDoesNotExist"/>
            </command>
        </commands>
    </registry>"#;

    fn parse(xml: &str) -> Document {
        Document::parse(xml).unwrap()
    }

    #[test]
    fn locate_function_is_case_insensitive() {
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        let entry = registry.locate_function("GLFOO").unwrap().unwrap();
        assert_eq!(entry.name, "glFoo");
        assert_eq!(entry.return_type.as_deref(), Some("void"));
        assert_eq!(entry.params.len(), 1);
        assert_eq!(entry.params[0].ctype.as_deref(), Some("GLenum"));
        assert_eq!(entry.params[0].name, "mode");
        assert!(entry.alias_of.is_none());
    }

    #[test]
    fn locate_function_reads_ptype_return() {
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        let entry = registry.locate_function("glIsThing").unwrap().unwrap();
        assert_eq!(entry.return_type.as_deref(), Some("GLboolean"));
        assert!(entry.params.is_empty());
    }

    #[test]
    fn locate_constant_is_case_insensitive() {
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        let entry = registry.locate_constant("gl_bar").unwrap().unwrap();
        assert_eq!(entry.name, "GL_BAR");
        assert_eq!(entry.value, 1);
        assert_eq!(entry.raw_value, "0x1");
    }

    #[test]
    fn locate_missing_symbol_is_none() {
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        assert!(registry.locate_function("glNope").unwrap().is_none());
        assert!(registry.locate_constant("GL_NOPE").unwrap().is_none());
        assert!(registry.locate("nothing").unwrap().is_none());
    }

    #[test]
    fn locate_prefers_functions_over_constants() {
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        match registry.locate("glFoo").unwrap().unwrap() {
            Symbol::Function(f) => assert_eq!(f.name, "glFoo"),
            Symbol::Constant(_) => panic!("expected a function"),
        }
        match registry.locate("GL_FOO").unwrap().unwrap() {
            Symbol::Constant(c) => assert_eq!(c.name, "GL_FOO"),
            Symbol::Function(_) => panic!("expected a constant"),
        }
    }

    #[test]
    fn duplicate_names_resolve_to_first_in_document_order() {
        let xml = r#"<registry>
            <enums><enum name="GL_DUP" value="0x10"/></enums>
            <enums><enum name="GL_DUP" value="0x20"/></enums>
        </registry>"#;
        let doc = parse(xml);
        let registry = Registry::new(&doc);

        let entry = registry.locate_constant("GL_DUP").unwrap().unwrap();
        assert_eq!(entry.value, 0x10);
    }

    #[test]
    fn function_aliases_from_canonical() {
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        let resolved = registry.resolve_function_aliases("glFoo").unwrap().unwrap();
        assert_eq!(resolved.canonical.name, "glFoo");
        assert_eq!(resolved.aliases, vec!["glFooEXT", "glFooARB"]);
    }

    #[test]
    fn function_aliases_from_alias_are_query_independent() {
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        let resolved = registry.resolve_function_aliases("glFooEXT").unwrap().unwrap();
        assert_eq!(resolved.canonical.name, "glFoo");
        assert_eq!(resolved.aliases, vec!["glFoo", "glFooARB"]);

        let resolved = registry.resolve_function_aliases("glFooARB").unwrap().unwrap();
        assert_eq!(resolved.canonical.name, "glFoo");
        assert_eq!(resolved.aliases, vec!["glFoo", "glFooEXT"]);
    }

    #[test]
    fn unresolvable_alias_target_fails_closed() {
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        let resolved = registry.resolve_function_aliases("glOrphan").unwrap().unwrap();
        assert_eq!(resolved.canonical.name, "glOrphan");
        assert!(resolved.aliases.is_empty());
    }

    #[test]
    fn constant_aliases_are_symmetric_and_self_excluding() {
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        let resolved = registry.resolve_constant_aliases("GL_FOO").unwrap().unwrap();
        assert_eq!(resolved.aliases, vec!["GL_BAR"]);

        let resolved = registry.resolve_constant_aliases("GL_BAR").unwrap().unwrap();
        assert_eq!(resolved.aliases, vec!["GL_FOO"]);
    }

    #[test]
    fn constant_aliases_stay_within_one_container() {
        // GL_OTHER has the same value as GL_FOO but lives in a different
        // <enums> container, so it is not an alias.
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        let resolved = registry.resolve_constant_aliases("GL_OTHER").unwrap().unwrap();
        assert!(resolved.aliases.is_empty());
    }

    #[test]
    fn constant_without_same_value_has_no_aliases() {
        let doc = parse(REGISTRY);
        let registry = Registry::new(&doc);

        let resolved = registry.resolve_constant_aliases("GL_BAZ").unwrap().unwrap();
        assert!(resolved.aliases.is_empty());
    }

    #[test]
    fn alias_detection_compares_decoded_values_not_text() {
        let xml = r#"<registry>
            <enums>
                <enum name="GL_A" value="0x0001"/>
                <enum name="GL_B" value="0x1"/>
            </enums>
        </registry>"#;
        let doc = parse(xml);
        let registry = Registry::new(&doc);

        let resolved = registry.resolve_constant_aliases("GL_A").unwrap().unwrap();
        assert_eq!(resolved.aliases, vec!["GL_B"]);
    }

    #[test]
    fn malformed_command_fails_fast() {
        let xml = r#"<registry>
            <commands><command><proto>void </proto></command></commands>
        </registry>"#;
        let doc = parse(xml);
        let registry = Registry::new(&doc);

        assert!(registry.locate_function("anything").is_err());
    }

    #[test]
    fn malformed_enum_value_fails_fast() {
        let xml = r#"<registry>
            <enums><enum name="GL_BAD" value="zzz"/></enums>
        </registry>"#;
        let doc = parse(xml);
        let registry = Registry::new(&doc);

        let err = registry.locate_constant("GL_BAD").unwrap_err();
        assert!(err.to_string().contains("GL_BAD"));
    }

    #[test]
    fn parse_enum_value_variants() {
        assert_eq!(parse_enum_value("0x0001"), Some(1));
        assert_eq!(parse_enum_value("10"), Some(0x10)); // base 16 throughout
        assert_eq!(parse_enum_value("0xFFFFFFFFu"), Some(0xFFFF_FFFF));
        assert_eq!(
            parse_enum_value("0xFFFFFFFFFFFFFFFFull"),
            Some(u64::MAX)
        );
        assert_eq!(parse_enum_value("-1"), Some(u64::MAX));
        assert_eq!(parse_enum_value(""), None);
        assert_eq!(parse_enum_value("ull"), None);
    }
}
