//! Teacher to-dos, optionally tied to a holder.

use crate::model::holder::HolderRef;
use crate::model::validation::ValidationError;
use crate::model::{require_id, require_text, Entity, EntityId, HolderScoped};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: EntityId,
    pub owner_id: String,
    pub text: String,
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub holder: Option<HolderRef>,
}

impl Todo {
    /// Open and due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due.is_some_and(|due| due < today)
    }
}

/// Create payload for [`Todo`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoDraft {
    pub owner_id: String,
    pub text: String,
    pub due: Option<NaiveDate>,
    pub holder: Option<HolderRef>,
}

impl Entity for Todo {
    type Draft = TodoDraft;
    const COLLECTION: &'static str = "todos";

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> &str {
        &self.owner_id
    }

    fn from_draft(id: EntityId, draft: &TodoDraft) -> Self {
        Self {
            id,
            owner_id: draft.owner_id.clone(),
            text: draft.text.clone(),
            due: draft.due,
            completed: false,
            holder: draft.holder,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_id(self.id)?;
        require_text("text", &self.text)
    }
}

impl HolderScoped for Todo {
    fn holder(&self) -> Option<HolderRef> {
        self.holder
    }
}
