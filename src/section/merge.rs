//! Folding extend/replace blocks into the section they target.

use super::{MergeType, Modifier, Section, Snippet};
use crate::error::{KssError, Result};

pub struct MergeEngine;

impl MergeEngine {
    /// Apply `source` (an extend or replace block) to `target`
    ///
    /// Both must carry the same normalized reference. The caller looks the
    /// target up; this only checks that the pairing is valid.
    pub fn merge_into(target: &mut Section, source: &Section) -> Result<()> {
        let target_reference = target.require_reference()?.normalized.clone();
        if source.merge_type == MergeType::Plain {
            return Err(KssError::InvalidMergeKind {
                reference: target_reference,
                merge_type: source.merge_type.to_string(),
            });
        }
        let source_reference = source.require_reference()?.normalized.clone();

        if source_reference != target_reference {
            return Err(KssError::InvalidMergeTarget {
                source_reference,
                target_reference,
            });
        }

        match source.merge_type {
            MergeType::ExtendBefore => Self::extend(target, source, true),
            MergeType::ExtendAfter => Self::extend(target, source, false),
            MergeType::Replace => Self::replace(target, source),
            MergeType::Plain => {}
        }

        tracing::debug!(
            "Merged {} block from {} into {}",
            source.merge_type,
            source.source_filename,
            target_reference
        );

        Ok(())
    }

    fn extend(target: &mut Section, source: &Section, before: bool) {
        if let Some(source_title) = source.title.as_deref().filter(|t| !t.is_empty()) {
            target.title = Some(match target.title.as_deref() {
                Some(existing) if before => format!("{} {}", source_title, existing),
                Some(existing) => format!("{} {}", existing, source_title),
                None => source_title.to_string(),
            });
        }

        target.description = if before {
            join_paragraphs(&source.description, &target.description)
        } else {
            join_paragraphs(&target.description, &source.description)
        };

        splice(&mut target.examples, &source.examples, before);
        splice(&mut target.markups, &source.markups, before);

        // Every target modifier keeps one variant per section snippet
        for modifier in target.modifiers.iter_mut() {
            let (examples, markups) = match find_modifier(&source.modifiers, &modifier.name) {
                Some(declared) => (declared.examples.clone(), declared.markups.clone()),
                None => (
                    variants(&source.examples, modifier),
                    variants(&source.markups, modifier),
                ),
            };
            splice(&mut modifier.examples, &examples, before);
            splice(&mut modifier.markups, &markups, before);
        }
    }

    fn replace(target: &mut Section, source: &Section) {
        target.title = source.title.clone();
        target.description = source.description.clone();
        target.examples = source.examples.clone();
        target.markups = source.markups.clone();
        target.modifiers = source.modifiers.clone();
    }
}

fn find_modifier<'a>(modifiers: &'a [Modifier], name: &str) -> Option<&'a Modifier> {
    modifiers.iter().find(|m| m.name == name)
}

fn variants(snippets: &[Snippet], modifier: &Modifier) -> Vec<Snippet> {
    snippets.iter().map(|s| s.variant_for(modifier)).collect()
}

fn splice(existing: &mut Vec<Snippet>, incoming: &[Snippet], before: bool) {
    if before {
        existing.splice(0..0, incoming.iter().cloned());
    } else {
        existing.extend(incoming.iter().cloned());
    }
}

fn join_paragraphs(first: &str, second: &str) -> String {
    match (first.trim().is_empty(), second.trim().is_empty()) {
        (true, true) => String::new(),
        (false, true) => first.to_string(),
        (true, false) => second.to_string(),
        (false, false) => format!("{}\n\n{}", first, second),
    }
}
