//! Note board use cases.
//!
//! # Responsibility
//! - Keep note `order` unique and compacted to `0..n-1` per holder.
//! - Duplicate a note directly behind its original.
//!
//! # Invariants
//! - Only notes whose `order` actually changes are written back.
//! - Writes are issued one after another; a failed write stops the pass and
//!   keeps what was already committed.

use crate::backend::BackendAdapter;
use crate::model::holder::HolderRef;
use crate::model::note::{Note, NoteDraft};
use crate::model::EntityId;
use crate::store::{OptimisticStore, StoreError, StoreResult};
use log::debug;

pub struct NoteService<'s, A: BackendAdapter<Note>> {
    store: &'s OptimisticStore<Note, A>,
}

impl<'s, A: BackendAdapter<Note>> NoteService<'s, A> {
    pub fn new(store: &'s OptimisticStore<Note, A>) -> Self {
        Self { store }
    }

    /// Notes of `holder` in board order.
    pub fn notes_of(&self, holder: HolderRef) -> Vec<Note> {
        let mut notes: Vec<Note> = self
            .store
            .items()
            .into_iter()
            .filter(|note| note.holder == holder)
            .collect();
        notes.sort_by_key(|note| note.order);
        notes
    }

    /// Order slot for a note appended to the end of the board.
    pub fn next_order(&self, holder: HolderRef) -> u32 {
        self.notes_of(holder)
            .last()
            .map_or(0, |note| note.order.saturating_add(1))
    }

    /// Creates a note at the end of its holder's board, ignoring any order in
    /// `draft`.
    pub async fn add(&self, mut draft: NoteDraft) -> StoreResult<Note, Note> {
        draft.order = self.next_order(draft.holder);
        self.store.create(draft).await
    }

    pub async fn edit(&self, note: Note) -> StoreResult<Note, Note> {
        self.store.update(note).await
    }

    /// Applies `ordered_ids` as the new board order of `holder`.
    ///
    /// Notes of the holder missing from `ordered_ids` keep their relative
    /// order behind the listed ones. Returns the number of notes written.
    ///
    /// # Errors
    /// - `StoreError::UnknownId` when an id is not a note of `holder`;
    ///   nothing is written in that case.
    pub async fn reorder(
        &self,
        holder: HolderRef,
        ordered_ids: &[EntityId],
    ) -> StoreResult<usize, Note> {
        let mut current = self.notes_of(holder);
        let mut arranged = Vec::with_capacity(current.len());
        for id in ordered_ids {
            let index = current
                .iter()
                .position(|note| note.id == *id)
                .ok_or(StoreError::<Note>::UnknownId(*id))?;
            arranged.push(current.remove(index));
        }
        arranged.extend(current);
        self.write_order(holder, arranged).await
    }

    /// Removes a note and closes the gap it leaves in the board order.
    pub async fn remove_and_compact(&self, id: EntityId) -> StoreResult<usize, Note> {
        let note = self.store.get(id).ok_or(StoreError::<Note>::UnknownId(id))?;
        self.store.remove(id).await?;
        let remaining = self.notes_of(note.holder);
        self.write_order(note.holder, remaining).await
    }

    /// Copies a note and places the copy right after the original.
    pub async fn duplicate(&self, id: EntityId) -> StoreResult<Note, Note> {
        let original = self.store.get(id).ok_or(StoreError::<Note>::UnknownId(id))?;
        let copy = self
            .store
            .create(NoteDraft::copy_of(&original, original.order.saturating_add(1)))
            .await?;

        let mut arranged: Vec<Note> = self
            .notes_of(original.holder)
            .into_iter()
            .filter(|note| note.id != copy.id)
            .collect();
        let after = arranged
            .iter()
            .position(|note| note.id == original.id)
            .map_or(arranged.len(), |index| index + 1);
        arranged.insert(after, copy.clone());
        self.write_order(original.holder, arranged).await?;

        Ok(self.store.get(copy.id).unwrap_or(copy))
    }

    async fn write_order(&self, holder: HolderRef, arranged: Vec<Note>) -> StoreResult<usize, Note> {
        let mut written = 0;
        for (slot, mut note) in arranged.into_iter().enumerate() {
            let slot = u32::try_from(slot).unwrap_or(u32::MAX);
            if note.order == slot {
                continue;
            }
            note.order = slot;
            self.store.update(note).await?;
            written += 1;
        }
        debug!(
            "event=notes_reorder module=service status=ok holder={} written={}",
            holder.type_id(),
            written
        );
        Ok(written)
    }
}
