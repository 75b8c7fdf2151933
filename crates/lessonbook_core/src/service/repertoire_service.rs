//! Repertoire per holder.

use crate::backend::BackendAdapter;
use crate::model::holder::HolderRef;
use crate::model::repertoire::{RepertoireDraft, RepertoireItem};
use crate::model::validation::ValidationError;
use crate::model::EntityId;
use crate::schedule::roster::collation_key;
use crate::store::{OptimisticStore, StoreResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepertoireSortMethod {
    #[default]
    StartDate,
    Title,
}

impl FromStr for RepertoireSortMethod {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "startDate" => Ok(Self::StartDate),
            "title" => Ok(Self::Title),
            other => Err(ValidationError::InvalidSortMethod(other.to_string())),
        }
    }
}

/// Defaults to newest start date first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepertoireSorting {
    pub method: RepertoireSortMethod,
    pub ascending: bool,
}

impl Default for RepertoireSorting {
    fn default() -> Self {
        Self {
            method: RepertoireSortMethod::StartDate,
            ascending: false,
        }
    }
}

pub struct RepertoireService<'s, A: BackendAdapter<RepertoireItem>> {
    store: &'s OptimisticStore<RepertoireItem, A>,
}

impl<'s, A: BackendAdapter<RepertoireItem>> RepertoireService<'s, A> {
    pub fn new(store: &'s OptimisticStore<RepertoireItem, A>) -> Self {
        Self { store }
    }

    /// Items of `holder` ordered by `sorting`.
    pub fn repertoire_of(&self, holder: HolderRef, sorting: RepertoireSorting) -> Vec<RepertoireItem> {
        self.search(holder, "", sorting)
    }

    /// Items of `holder` whose title contains `query`, ignoring case and
    /// umlauts. An empty query matches everything.
    pub fn search(
        &self,
        holder: HolderRef,
        query: &str,
        sorting: RepertoireSorting,
    ) -> Vec<RepertoireItem> {
        let needle = collation_key(query);
        let items: Vec<RepertoireItem> = self
            .store
            .items()
            .into_iter()
            .filter(|item| item.holder == holder)
            .filter(|item| collation_key(&item.title).contains(&needle))
            .collect();
        sort_repertoire(items, sorting)
    }

    /// Items still being worked on: no end date yet.
    pub fn in_progress(&self, holder: HolderRef) -> Vec<RepertoireItem> {
        self.repertoire_of(holder, RepertoireSorting::default())
            .into_iter()
            .filter(|item| item.end_date.is_none())
            .collect()
    }

    pub async fn add(&self, draft: RepertoireDraft) -> StoreResult<RepertoireItem, RepertoireItem> {
        self.store.create(draft).await
    }

    pub async fn edit(&self, item: RepertoireItem) -> StoreResult<RepertoireItem, RepertoireItem> {
        self.store.update(item).await
    }

    pub async fn delete(&self, id: EntityId) -> StoreResult<(), RepertoireItem> {
        self.store.remove(id).await
    }
}

/// Items without a start date go last in either direction; ties keep title
/// order.
pub fn sort_repertoire(
    mut items: Vec<RepertoireItem>,
    sorting: RepertoireSorting,
) -> Vec<RepertoireItem> {
    let directed = |ordering: Ordering| {
        if sorting.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    };
    items.sort_by(|left, right| {
        let title = collation_key(&left.title).cmp(&collation_key(&right.title));
        match sorting.method {
            RepertoireSortMethod::Title => directed(title),
            RepertoireSortMethod::StartDate => match (left.start_date, right.start_date) {
                (Some(a), Some(b)) => directed(a.cmp(&b)).then(title),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => title,
            },
        }
    });
    items
}
