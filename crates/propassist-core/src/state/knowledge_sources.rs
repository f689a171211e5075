//! Operator-selected knowledge-source filter.

use crate::error::{PropAssistError, Result};
use crate::knowledge_source::KnowledgeSource;

/// Ordered set of selected sources, or the distinguished `All` marker.
///
/// The selection is never empty: removing the last concrete source reverts
/// to `All`, and `All` never coexists with a concrete source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeSourceSelection {
    selected: Vec<KnowledgeSource>,
}

impl Default for KnowledgeSourceSelection {
    fn default() -> Self {
        Self {
            selected: vec![KnowledgeSource::All],
        }
    }
}

impl KnowledgeSourceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection from an arbitrary list, normalizing it.
    pub fn from_sources(sources: impl IntoIterator<Item = KnowledgeSource>) -> Result<Self> {
        let mut selection = Self::default();
        selection.set(sources)?;
        Ok(selection)
    }

    pub fn is_all(&self) -> bool {
        self.selected.contains(&KnowledgeSource::All)
    }

    pub fn contains(&self, source: KnowledgeSource) -> bool {
        self.selected.contains(&source)
    }

    pub fn selected(&self) -> &[KnowledgeSource] {
        &self.selected
    }

    /// Resets the selection to `All`.
    pub fn select_all(&mut self) {
        self.selected = vec![KnowledgeSource::All];
    }

    /// Toggles one source as the selector popover does.
    ///
    /// Toggling `All` selects only `All`. Toggling a concrete source removes
    /// `All` and adds or removes that source.
    pub fn toggle(&mut self, source: KnowledgeSource) -> Result<()> {
        ensure_selectable(source)?;

        if source == KnowledgeSource::All {
            self.select_all();
            return Ok(());
        }

        if self.selected.contains(&source) {
            self.selected.retain(|s| *s != source);
        } else {
            self.selected.retain(|s| *s != KnowledgeSource::All);
            self.selected.push(source);
        }

        if self.selected.is_empty() {
            self.select_all();
        }
        Ok(())
    }

    /// Replaces the whole selection.
    ///
    /// Every source is validated before anything changes. Duplicates are
    /// dropped, a list containing `All` collapses to `All`, and an empty list
    /// means `All`.
    pub fn set(&mut self, sources: impl IntoIterator<Item = KnowledgeSource>) -> Result<()> {
        let sources: Vec<KnowledgeSource> = sources.into_iter().collect();
        sources.iter().copied().try_for_each(ensure_selectable)?;

        if sources.is_empty() || sources.contains(&KnowledgeSource::All) {
            self.select_all();
            return Ok(());
        }

        let mut next = Vec::with_capacity(sources.len());
        for source in sources {
            if !next.contains(&source) {
                next.push(source);
            }
        }
        self.selected = next;
        Ok(())
    }

    /// The `knowledge_sources` field of an outbound request.
    pub fn to_request_list(&self) -> Vec<String> {
        if self.is_all() {
            return vec![KnowledgeSource::All.to_string()];
        }
        self.selected.iter().map(ToString::to_string).collect()
    }

    /// Short label for the selector button.
    pub fn summary(&self) -> String {
        if self.is_all() {
            KnowledgeSource::All.label().to_string()
        } else {
            format!("{} sources selected", self.selected.len())
        }
    }
}

fn ensure_selectable(source: KnowledgeSource) -> Result<()> {
    if source.is_selectable() {
        Ok(())
    } else {
        Err(PropAssistError::invalid_input(format!(
            "'{source}' cannot be selected as a knowledge source; use the web search toggle"
        )))
    }
}
