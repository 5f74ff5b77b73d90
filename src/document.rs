//! The finalized style guide produced by one parse run

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{KssError, Result};
use crate::section::Section;
use crate::tree::ReferenceTree;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StyleguideDocument {
    sections: BTreeMap<String, Section>,
    consumed_extends: Vec<Section>,
    consumed_replaces: Vec<Section>,
}

impl StyleguideDocument {
    pub(crate) fn new(
        sections: BTreeMap<String, Section>,
        consumed_extends: Vec<Section>,
        consumed_replaces: Vec<Section>,
    ) -> Self {
        Self {
            sections,
            consumed_extends,
            consumed_replaces,
        }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Reference to section map, ordered by reference string
    pub fn section_map(&self) -> &BTreeMap<String, Section> {
        &self.sections
    }

    pub fn into_section_map(self) -> BTreeMap<String, Section> {
        self.sections
    }

    pub fn consumed_extends(&self) -> &[Section] {
        &self.consumed_extends
    }

    pub fn consumed_replaces(&self) -> &[Section] {
        &self.consumed_replaces
    }

    pub fn section(&self, reference: &str) -> Result<&Section> {
        self.sections
            .get(reference)
            .ok_or_else(|| KssError::SectionNotFound(reference.to_string()))
    }

    /// Sections at or below `prefix`, matched segment-wise; `None` means all
    pub fn sections(&self, prefix: Option<&str>) -> Vec<&Section> {
        self.sections
            .iter()
            .filter(|(reference, _)| prefix.map_or(true, |p| is_under(reference, p)))
            .map(|(_, section)| section)
            .collect()
    }

    /// Same filter as [`sections`](Self::sections), in tree order
    pub fn iter_sorted_sections(&self, prefix: Option<&str>) -> Vec<&Section> {
        self.tree()
            .iter_sorted_sections()
            .into_iter()
            .filter(|section| match (prefix, section.reference()) {
                (None, _) => true,
                (Some(p), Some(reference)) => is_under(reference, p),
                (Some(_), None) => false,
            })
            .collect()
    }

    pub fn tree(&self) -> ReferenceTree<'_> {
        ReferenceTree::build(self.sections.values())
    }
}

fn is_under(reference: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('.');
    reference == prefix
        || reference
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.'))
}
