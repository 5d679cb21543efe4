//! Provenance resolution: which feature sets and extensions carry a symbol.

use crate::registry::{feature_info, require_attr, Registry};
use crate::types::{ActionKind, ExtensionInfo, Origin};
use crate::XrefError;

impl<'a, 'input: 'a> Registry<'a, 'input> {
    /// Report every feature set that requires, deprecates, or removes the
    /// named symbol.
    ///
    /// Results are ordered by feature declaration order, and within a
    /// feature by the require/deprecate/remove test order. Each
    /// (feature, action) pair is reported at most once, but the same name
    /// can surface across several features: required in one version and
    /// removed in a later one are both reported.
    pub fn find_origin(&self, name: &str) -> Result<Vec<Origin>, XrefError> {
        let mut origins = Vec::new();

        for feature in &self.features {
            for action in ActionKind::ALL {
                let hit = feature
                    .children()
                    .filter(|block| block.has_tag_name(action.tag()))
                    .flat_map(|block| block.children().filter(|n| n.is_element()))
                    .any(|entry| {
                        entry
                            .attribute("name")
                            .is_some_and(|n| n.eq_ignore_ascii_case(name))
                    });
                if hit {
                    origins.push(Origin { feature: feature_info(*feature)?, action });
                }
            }
        }

        Ok(origins)
    }

    /// Find the first extension whose require list contains the named
    /// symbol.
    ///
    /// A symbol can legitimately belong to more than one extension; only
    /// the first in document order is reported. Known approximation.
    pub fn find_extension(&self, name: &str) -> Result<Option<ExtensionInfo>, XrefError> {
        let extensions = self
            .extensions
            .into_iter()
            .flat_map(|section| section.children().filter(|n| n.has_tag_name("extension")));

        for extension in extensions {
            let hit = extension
                .children()
                .filter(|block| block.has_tag_name("require"))
                .flat_map(|block| block.children().filter(|n| n.is_element()))
                .any(|entry| {
                    entry
                        .attribute("name")
                        .is_some_and(|n| n.eq_ignore_ascii_case(name))
                });
            if hit {
                return Ok(Some(ExtensionInfo {
                    name: require_attr(extension, "name")?.to_string(),
                    supported: require_attr(extension, "supported")?.to_string(),
                }));
            }
        }

        Ok(None)
    }
}
