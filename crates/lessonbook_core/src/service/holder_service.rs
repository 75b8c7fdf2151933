//! Student and group use cases.
//!
//! # Responsibility
//! - Present students and groups as one list of [`Holder`]s.
//! - List active and archived holders in a user-selected order.
//! - Archive and reactivate holders (soft delete).
//!
//! Hard deletion cascades into dependent collections and therefore lives on
//! the workspace.

use crate::backend::BackendAdapter;
use crate::model::holder::{Group, Holder, HolderKind, HolderRef, Student};
use crate::schedule::sorting::{sort_holders, Sorting};
use crate::service::ServiceError;
use crate::store::{OptimisticStore, StoreError};
use log::info;

pub struct HolderService<'s, S, G>
where
    S: BackendAdapter<Student>,
    G: BackendAdapter<Group>,
{
    students: &'s OptimisticStore<Student, S>,
    groups: &'s OptimisticStore<Group, G>,
}

impl<'s, S, G> HolderService<'s, S, G>
where
    S: BackendAdapter<Student>,
    G: BackendAdapter<Group>,
{
    pub fn new(students: &'s OptimisticStore<Student, S>, groups: &'s OptimisticStore<Group, G>) -> Self {
        Self { students, groups }
    }

    /// Students first, then groups, each in store order.
    pub fn holders(&self) -> Vec<Holder> {
        self.students
            .items()
            .into_iter()
            .map(Holder::from)
            .chain(self.groups.items().into_iter().map(Holder::from))
            .collect()
    }

    /// Non-archived holders ordered by `sorting`.
    pub fn active(&self, sorting: Sorting) -> Vec<Holder> {
        self.listed(false, sorting)
    }

    /// Archived holders ordered by `sorting`.
    pub fn archived(&self, sorting: Sorting) -> Vec<Holder> {
        self.listed(true, sorting)
    }

    fn listed(&self, archived: bool, sorting: Sorting) -> Vec<Holder> {
        let holders: Vec<Holder> = self
            .holders()
            .into_iter()
            .filter(|holder| holder.is_archived() == archived)
            .collect();
        sort_holders(&holders, sorting)
    }

    pub fn find(&self, holder: HolderRef) -> Option<Holder> {
        match holder.kind {
            HolderKind::Student => self.students.get(holder.id).map(Holder::from),
            HolderKind::Group => self.groups.get(holder.id).map(Holder::from),
        }
    }

    /// Archives every holder in `refs`; returns how many changed.
    pub async fn archive_holders(&self, refs: &[HolderRef]) -> Result<usize, ServiceError> {
        self.set_archived(refs, true).await
    }

    /// Brings archived holders back onto the roster.
    pub async fn reactivate_holders(&self, refs: &[HolderRef]) -> Result<usize, ServiceError> {
        self.set_archived(refs, false).await
    }

    /// Already-matching holders are skipped. Stops at the first failure; the
    /// failing holder is rolled back, earlier ones stay committed.
    async fn set_archived(&self, refs: &[HolderRef], archived: bool) -> Result<usize, ServiceError> {
        let mut changed = 0;
        for holder in refs {
            match holder.kind {
                HolderKind::Student => {
                    let mut student = self
                        .students
                        .get(holder.id)
                        .ok_or(StoreError::<Student>::UnknownId(holder.id))?;
                    if student.archived == archived {
                        continue;
                    }
                    student.archived = archived;
                    self.students.update(student).await?;
                }
                HolderKind::Group => {
                    let mut group = self
                        .groups
                        .get(holder.id)
                        .ok_or(StoreError::<Group>::UnknownId(holder.id))?;
                    if group.archived == archived {
                        continue;
                    }
                    group.archived = archived;
                    self.groups.update(group).await?;
                }
            }
            changed += 1;
        }
        info!(
            "event=holders_archive module=service status=ok archived={} requested={} changed={}",
            archived,
            refs.len(),
            changed
        );
        Ok(changed)
    }
}
