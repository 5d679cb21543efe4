//! Enum group aggregation.
//!
//! Groups are free-form classification tags packed into the `group`
//! attribute of enum entries, comma-delimited. Nothing declares them; they
//! exist only by being mentioned, so the aggregate queries scan every
//! constant in the document.

use std::collections::BTreeMap;

use crate::registry::Registry;
use crate::types::GroupMatch;
use crate::{resolve, XrefError};

/// Split a comma-delimited group attribute into tags.
///
/// Empty tokens from leading/trailing/doubled delimiters are dropped, and
/// tags are deduplicated case-insensitively (first-seen casing wins).
pub(crate) fn split_group_tags(attr: &str) -> Vec<String> {
    let mut seen = Vec::new();
    let mut tags = Vec::new();
    for token in attr.split(',').filter(|t| !t.is_empty()) {
        let key = token.to_ascii_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            tags.push(token.to_string());
        }
    }
    tags
}

impl<'a, 'input: 'a> Registry<'a, 'input> {
    /// The group tags of a named constant, or `None` if the constant is
    /// not in the registry. A constant with no group attribute yields an
    /// empty list.
    pub fn groups_of(&self, name: &str) -> Result<Option<Vec<String>>, XrefError> {
        Ok(self.locate_constant(name)?.map(|entry| entry.groups()))
    }

    /// Every distinct group tag mentioned anywhere in the registry,
    /// case-insensitively deduplicated and sorted.
    pub fn all_groups(&self) -> Vec<String> {
        let mut groups: BTreeMap<String, String> = BTreeMap::new();
        for (_, entry) in self.enum_nodes() {
            if let Some(attr) = entry.attribute("group") {
                for tag in split_group_tags(attr) {
                    groups.entry(tag.to_ascii_lowercase()).or_insert(tag);
                }
            }
        }
        groups.into_values().collect()
    }

    /// Every constant whose group attribute contains `fragment` as a
    /// case-insensitive substring, with its provenance attached.
    ///
    /// Substring matching is deliberate: a coarse query like "Buffer"
    /// surfaces every group whose name contains that word.
    pub fn constants_in_group_matching(
        &self,
        fragment: &str,
    ) -> Result<Vec<GroupMatch>, XrefError> {
        let needle = fragment.to_ascii_lowercase();
        let mut matches = Vec::new();

        for (_, entry) in self.enum_nodes() {
            let Some(attr) = entry.attribute("group") else {
                continue;
            };
            if !attr.to_ascii_lowercase().contains(&needle) {
                continue;
            }
            let constant = resolve::constant_entry(entry)?;
            let origins = self.find_origin(&constant.name)?;
            matches.push(GroupMatch { constant, origins });
        }

        Ok(matches)
    }
}
