//! Collects parsed sections from every file into one document
//!
//! Plain sections are indexed as they arrive. Extend and replace blocks are
//! queued and applied in encounter order once everything has been indexed,
//! so a merge may target a section defined in a later file.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::document::StyleguideDocument;
use crate::error::{KssError, Result};
use crate::section::{MergeEngine, MergeType, Section};

#[derive(Debug, Default)]
pub struct MultiBlockAssembler {
    sections: BTreeMap<String, Section>,
    pending_merges: Vec<Section>,
    dropped: usize,
}

impl MultiBlockAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, section: Section) -> Result<()> {
        if section.merge_type.is_merge() {
            section.require_reference()?;
            self.pending_merges.push(section);
            return Ok(());
        }

        let Some(reference) = section.reference().map(str::to_string) else {
            tracing::trace!(
                "Dropping comment block without a reference in {}",
                section.source_filename
            );
            self.dropped += 1;
            return Ok(());
        };

        match self.sections.entry(reference) {
            Entry::Occupied(existing) => Err(KssError::DuplicateReference {
                reference: existing.key().clone(),
                first_file: existing.get().source_filename.clone(),
                second_file: section.source_filename,
            }),
            Entry::Vacant(slot) => {
                slot.insert(section);
                Ok(())
            }
        }
    }

    pub fn add_all<I>(&mut self, sections: I) -> Result<()>
    where
        I: IntoIterator<Item = Section>,
    {
        for section in sections {
            self.add(section)?;
        }
        Ok(())
    }

    /// Apply queued merges and hand back the finished document
    pub fn finish(mut self) -> Result<StyleguideDocument> {
        let mut consumed_extends = Vec::new();
        let mut consumed_replaces = Vec::new();

        for source in std::mem::take(&mut self.pending_merges) {
            let reference = source.require_reference()?.normalized.clone();

            let Some(target) = self.sections.get_mut(&reference) else {
                return Err(match source.merge_type {
                    MergeType::Replace => KssError::ReplaceTargetMissing {
                        reference,
                        filename: source.source_filename,
                    },
                    _ => KssError::ExtendTargetMissing {
                        reference,
                        filename: source.source_filename,
                    },
                });
            };

            MergeEngine::merge_into(target, &source)?;

            if source.merge_type.is_extend() {
                consumed_extends.push(source);
            } else {
                consumed_replaces.push(source);
            }
        }

        tracing::info!(
            "Assembled {} sections ({} extends, {} replaces merged, {} blocks without reference)",
            self.sections.len(),
            consumed_extends.len(),
            consumed_replaces.len(),
            self.dropped
        );

        Ok(StyleguideDocument::new(
            self.sections,
            consumed_extends,
            consumed_replaces,
        ))
    }
}

/// One-shot assembly of an ordered block list
pub fn assemble<I>(sections: I) -> Result<StyleguideDocument>
where
    I: IntoIterator<Item = Section>,
{
    let mut assembler = MultiBlockAssembler::new();
    assembler.add_all(sections)?;
    assembler.finish()
}
