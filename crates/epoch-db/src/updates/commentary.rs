//! Commentary update builder.

use epoch_core::requests::CommentaryPatch;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct CommentaryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentary_text: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_notes: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_context: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl From<CommentaryPatch> for CommentaryUpdate {
    fn from(patch: CommentaryPatch) -> Self {
        Self {
            commentary_text: patch.commentary_text.map(Some),
            design_notes: patch.design_notes.map(Some),
            business_context: patch.business_context.map(Some),
            tags: patch.tags,
        }
    }
}

pub struct CommentaryUpdateBuilder(CommentaryUpdate);

impl CommentaryUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CommentaryUpdate::default())
    }

    #[must_use]
    pub fn commentary_text(mut self, text: Option<String>) -> Self {
        self.0.commentary_text = Some(text);
        self
    }

    #[must_use]
    pub fn design_notes(mut self, notes: Option<String>) -> Self {
        self.0.design_notes = Some(notes);
        self
    }

    #[must_use]
    pub fn business_context(mut self, context: Option<String>) -> Self {
        self.0.business_context = Some(context);
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.0.tags = Some(tags);
        self
    }

    #[must_use]
    pub fn build(self) -> CommentaryUpdate {
        self.0
    }
}

impl Default for CommentaryUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
