//! Pieces a holder is working on.

use crate::model::holder::HolderRef;
use crate::model::validation::ValidationError;
use crate::model::{require_id, require_text, Entity, EntityId, HolderScoped};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepertoireItem {
    pub id: EntityId,
    pub owner_id: String,
    pub holder: HolderRef,
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Create payload for [`RepertoireItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepertoireDraft {
    pub owner_id: String,
    pub holder: HolderRef,
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Entity for RepertoireItem {
    type Draft = RepertoireDraft;
    const COLLECTION: &'static str = "repertoire";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn from_draft(id: EntityId, draft: &RepertoireDraft) -> Self {
        Self {
            id,
            owner_id: draft.owner_id.clone(),
            holder: draft.holder,
            title: draft.title.clone(),
            start_date: draft.start_date,
            end_date: draft.end_date,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.id)?;
        require_id(self.holder.id)?;
        require_text("title", &self.title)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(ValidationError::ReversedDateRange { start, end });
            }
        }
        Ok(())
    }
}

impl HolderScoped for RepertoireItem {
    fn holder(&self) -> Option<HolderRef> {
        Some(self.holder)
    }
}
