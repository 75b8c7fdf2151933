//! Sticky notes pinned to a holder.
//!
//! # Invariants
//! - `order` is unique per holder and compacted to `0..n-1` by the note
//!   service after reordering or deletion.

use crate::model::holder::HolderRef;
use crate::model::validation::ValidationError;
use crate::model::{require_id, Entity, EntityId, HolderScoped};
use serde::{Deserialize, Serialize};

/// Fixed palette for note backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteBackground {
    Red,
    Blue,
    Yellow,
    Green,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: EntityId,
    pub owner_id: String,
    pub holder: HolderRef,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    pub order: u32,
    pub background_color: Option<NoteBackground>,
}

/// Create payload for [`Note`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteDraft {
    pub owner_id: String,
    pub holder: HolderRef,
    pub title: String,
    pub text: String,
    pub order: u32,
    pub background_color: Option<NoteBackground>,
}

impl NoteDraft {
    /// Copy of `note` as a new draft at `order`.
    pub fn copy_of(note: &Note, order: u32) -> Self {
        Self {
            owner_id: note.owner_id.clone(),
            holder: note.holder,
            title: note.title.clone(),
            text: note.text.clone(),
            order,
            background_color: note.background_color,
        }
    }
}

impl Entity for Note {
    type Draft = NoteDraft;
    const COLLECTION: &'static str = "notes";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn from_draft(id: EntityId, draft: &NoteDraft) -> Self {
        Self {
            id,
            owner_id: draft.owner_id.clone(),
            holder: draft.holder,
            title: draft.title.clone(),
            text: draft.text.clone(),
            order: draft.order,
            background_color: draft.background_color,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.id)?;
        require_id(self.holder.id)
    }
}

impl HolderScoped for Note {
    fn holder(&self) -> Option<HolderRef> {
        Some(self.holder)
    }
}
