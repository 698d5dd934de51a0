//! Merge server-confirmed mutations back into the local vocabulary list
//!
//! Each function edits the list in place, keeps its order and leaves items the
//! response does not mention untouched. Records whose id is no longer present
//! are skipped, since the item is already gone locally. Responses are applied
//! in the order they arrive, so the last one to land wins.

use serde::{Deserialize, Serialize};

use super::models::{DelayResult, ReviewResult, ScheduleRecord, VocabularyId, VocabularyItem};

/// A mutation the backend has confirmed, with its typed response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    Reviewed { id: VocabularyId, result: ReviewResult },
    Delayed { results: Vec<DelayResult> },
    Reset { records: Vec<ScheduleRecord> },
    Restarted { records: Vec<ScheduleRecord> },
    Deleted { ids: Vec<VocabularyId> },
    Created { item: VocabularyItem },
    Updated { item: VocabularyItem },
}

impl Mutation {
    /// Short label for logs and messages
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::Reviewed { .. } => "review",
            Mutation::Delayed { .. } => "delay",
            Mutation::Reset { .. } => "reset",
            Mutation::Restarted { .. } => "restart",
            Mutation::Deleted { .. } => "delete",
            Mutation::Created { .. } => "create",
            Mutation::Updated { .. } => "update",
        }
    }
}

/// Apply a confirmed mutation to the list
pub fn apply(items: &mut Vec<VocabularyItem>, mutation: Mutation) {
    log::debug!("Reconciling {} into {} items", mutation.kind(), items.len());

    match mutation {
        Mutation::Reviewed { id, result } => apply_review(items, id, &result),
        Mutation::Delayed { results } => apply_delay(items, &results),
        Mutation::Reset { records } | Mutation::Restarted { records } => {
            apply_schedule(items, &records)
        }
        Mutation::Deleted { ids } => apply_delete(items, &ids),
        Mutation::Created { item } => apply_create(items, item),
        Mutation::Updated { item } => apply_update(items, item),
    }
}

/// Replace the scheduling fields of the reviewed item
pub fn apply_review(items: &mut [VocabularyItem], id: VocabularyId, result: &ReviewResult) {
    if let Some(item) = items.iter_mut().find(|v| v.id == id) {
        item.sr_stage = result.sr_stage;
        item.review_date = result.review_date;
        item.modified_at = result.modified_at;
        item.learned = result.learned;
    } else {
        log::debug!("Reviewed item {} no longer in list", id);
    }
}

/// Move due dates of delayed items
pub fn apply_delay(items: &mut [VocabularyItem], results: &[DelayResult]) {
    for item in items.iter_mut() {
        if let Some(result) = results.iter().find(|r| r.id == item.id) {
            item.review_date = result.review_date;
            item.modified_at = result.modified_at;
        }
    }
}

/// Overwrite scheduling state from reset and restart records
///
/// Fields the record leaves out keep their local value.
pub fn apply_schedule(items: &mut [VocabularyItem], records: &[ScheduleRecord]) {
    for item in items.iter_mut() {
        if let Some(record) = records.iter().find(|r| r.id == item.id) {
            item.sr_stage = record.sr_stage;
            item.review_date = record.review_date;
            item.modified_at = record.modified_at;
            if let Some(priority) = record.priority {
                item.priority = priority;
            }
            if let Some(learned) = record.learned {
                item.learned = learned;
            }
        }
    }
}

/// Drop deleted items; ids already gone are ignored
pub fn apply_delete(items: &mut Vec<VocabularyItem>, ids: &[VocabularyId]) {
    items.retain(|item| !ids.contains(&item.id));
}

/// Append a newly created item
pub fn apply_create(items: &mut Vec<VocabularyItem>, item: VocabularyItem) {
    items.push(item);
}

/// Swap in the server's copy of an edited item
pub fn apply_update(items: &mut [VocabularyItem], updated: VocabularyItem) {
    if let Some(slot) = items.iter_mut().find(|v| v.id == updated.id) {
        *slot = updated;
    } else {
        log::debug!("Updated item {} no longer in list", updated.id);
    }
}
