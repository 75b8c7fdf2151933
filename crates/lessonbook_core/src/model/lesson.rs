//! Lesson records written during or after a holder's lesson.

use crate::model::holder::HolderRef;
use crate::model::validation::ValidationError;
use crate::model::{require_id, Entity, EntityId, HolderScoped};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Attendance outcome of a lesson.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    #[default]
    Held,
    Cancelled,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: EntityId,
    pub owner_id: String,
    pub holder: HolderRef,
    pub date: NaiveDate,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub homework: String,
    #[serde(default)]
    pub status: LessonStatus,
    pub created_at: NaiveDateTime,
}

/// Create payload for [`Lesson`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonDraft {
    pub owner_id: String,
    pub holder: HolderRef,
    pub date: NaiveDate,
    pub content: String,
    pub homework: String,
    pub status: LessonStatus,
    pub created_at: NaiveDateTime,
}

impl Entity for Lesson {
    type Draft = LessonDraft;
    const COLLECTION: &'static str = "lessons";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn from_draft(id: EntityId, draft: &LessonDraft) -> Self {
        Self {
            id,
            owner_id: draft.owner_id.clone(),
            holder: draft.holder,
            date: draft.date,
            content: draft.content.clone(),
            homework: draft.homework.clone(),
            status: draft.status,
            created_at: draft.created_at,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.id)?;
        require_id(self.holder.id)
    }
}

impl HolderScoped for Lesson {
    fn holder(&self) -> Option<HolderRef> {
        Some(self.holder)
    }
}
