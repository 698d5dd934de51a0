//! Review bucket classification
//!
//! Splits the flat vocabulary list into the groups shown on the dashboard.
//! Each item lands in at most one primary bucket, checked in this order:
//!
//! - `new`: stage 0, and only when some audio exists so audio gets generated
//!   before the first review
//! - `review`: due (`review_date <= now`) and not learned
//! - `rest`: not yet due and not learned
//! - `learned`: everything else that is learned
//!
//! Independently of that, items touched on the current UTC day are counted as
//! started (stage 1) or reviewed (stage above 1) today.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::models::VocabularyItem;

/// Dashboard groups, borrowing from the classified list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyBuckets<'a> {
    pub new: Vec<&'a VocabularyItem>,
    pub review: Vec<&'a VocabularyItem>,
    pub rest: Vec<&'a VocabularyItem>,
    pub started_today: Vec<&'a VocabularyItem>,
    pub reviewed_today: Vec<&'a VocabularyItem>,
    pub learned: Vec<&'a VocabularyItem>,
}

/// Size of each bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCounts {
    pub new: usize,
    pub review: usize,
    pub rest: usize,
    pub started_today: usize,
    pub reviewed_today: usize,
    pub learned: usize,
}

impl VocabularyBuckets<'_> {
    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            new: self.new.len(),
            review: self.review.len(),
            rest: self.rest.len(),
            started_today: self.started_today.len(),
            reviewed_today: self.reviewed_today.len(),
            learned: self.learned.len(),
        }
    }
}

/// Classify `items` as of `now`
pub fn classify(items: &[VocabularyItem], now: DateTime<Utc>) -> VocabularyBuckets<'_> {
    let mut buckets = VocabularyBuckets::default();
    let today = now.date_naive();

    for item in items {
        if item.is_unstarted() {
            if item.has_audio() {
                buckets.new.push(item);
            }
        } else if item.review_date <= now && !item.learned {
            buckets.review.push(item);
        } else if item.review_date > now && !item.learned {
            buckets.rest.push(item);
        } else if item.learned {
            buckets.learned.push(item);
        }

        let touched_today = item.modified_at.date_naive() == today;
        if item.sr_stage == 1 && touched_today {
            buckets.started_today.push(item);
        } else if item.sr_stage > 1 && touched_today {
            buckets.reviewed_today.push(item);
        }
    }

    // sort_by_key is stable, ties keep list order
    buckets.new.sort_by_key(|item| item.priority);
    buckets.rest.sort_by_key(|item| item.review_date);

    buckets
}

/// Classify against the system clock
pub fn classify_now(items: &[VocabularyItem]) -> VocabularyBuckets<'_> {
    classify(items, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::models::Phrase;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn phrase(id: i64, audio: &str) -> Phrase {
        Phrase {
            id,
            text: format!("phrase {}", id),
            audio_url: Some(audio.to_string()),
            locale: None,
        }
    }

    fn item(id: i64, sr_stage: u32) -> VocabularyItem {
        VocabularyItem {
            id,
            original: phrase(id * 2, "a.mp3"),
            translated: phrase(id * 2 + 1, ""),
            sr_stage,
            review_date: now() - Duration::days(1),
            modified_at: now() - Duration::days(10),
            priority: 1,
            learned: false,
        }
    }

    fn ids(bucket: &[&VocabularyItem]) -> Vec<i64> {
        bucket.iter().map(|item| item.id).collect()
    }

    #[test]
    fn test_new_requires_audio() {
        let mut with_audio = item(1, 0);
        with_audio.priority = 2;
        let mut without_audio = item(2, 0);
        without_audio.original.audio_url = Some(String::new());
        without_audio.priority = 1;

        let items = vec![with_audio, without_audio];
        let buckets = classify(&items, now());

        assert_eq!(ids(&buckets.new), vec![1]);
        assert!(buckets.review.is_empty());
        assert!(buckets.rest.is_empty());
        assert!(buckets.learned.is_empty());
    }

    #[test]
    fn test_new_accepts_translated_audio_only() {
        let mut vocab = item(1, 0);
        vocab.original.audio_url = None;
        vocab.translated.audio_url = Some("t.mp3".to_string());

        let items = vec![vocab];
        assert_eq!(ids(&classify(&items, now()).new), vec![1]);
    }

    #[test]
    fn test_new_sorted_by_priority() {
        let mut first = item(1, 0);
        first.priority = 5;
        let mut second = item(2, 0);
        second.priority = 1;

        let items = vec![first, second];
        assert_eq!(ids(&classify(&items, now()).new), vec![2, 1]);
    }

    #[test]
    fn test_new_sort_is_stable_for_equal_priority() {
        let items: Vec<_> = [3, 1, 2, 4]
            .into_iter()
            .map(|id| {
                let mut vocab = item(id, 0);
                vocab.priority = if id == 4 { 0 } else { 7 };
                vocab
            })
            .collect();

        assert_eq!(ids(&classify(&items, now()).new), vec![4, 3, 1, 2]);
    }

    #[test]
    fn test_due_item_goes_to_review() {
        let items = vec![item(3, 2)];
        let buckets = classify(&items, now());

        assert_eq!(ids(&buckets.review), vec![3]);
        assert!(buckets.rest.is_empty());
    }

    #[test]
    fn test_due_exactly_now_is_review() {
        let mut vocab = item(3, 2);
        vocab.review_date = now();

        let items = vec![vocab];
        assert_eq!(ids(&classify(&items, now()).review), vec![3]);
    }

    #[test]
    fn test_future_item_goes_to_rest_sorted_by_date() {
        let mut later = item(4, 2);
        later.review_date = now() + Duration::days(3);
        let mut sooner = item(5, 3);
        sooner.review_date = now() + Duration::days(1);

        let items = vec![later, sooner];
        let buckets = classify(&items, now());

        assert_eq!(ids(&buckets.rest), vec![5, 4]);
        assert!(buckets.review.is_empty());
    }

    #[test]
    fn test_learned_items_leave_review_and_rest() {
        let mut due = item(6, 4);
        due.learned = true;
        let mut future = item(7, 4);
        future.learned = true;
        future.review_date = now() + Duration::days(30);

        let items = vec![due, future];
        let buckets = classify(&items, now());

        assert_eq!(ids(&buckets.learned), vec![6, 7]);
        assert!(buckets.review.is_empty());
        assert!(buckets.rest.is_empty());
    }

    #[test]
    fn test_unstarted_learned_item_stays_out_of_learned() {
        let mut vocab = item(8, 0);
        vocab.learned = true;
        vocab.original.audio_url = None;

        let items = vec![vocab];
        let buckets = classify(&items, now());

        assert_eq!(buckets.counts(), BucketCounts::default());
    }

    #[test]
    fn test_primary_buckets_are_exclusive() {
        let mut items = Vec::new();
        for (id, stage) in (1..=12).zip([0, 0, 1, 2, 3, 1, 2, 0, 5, 4, 1, 2]) {
            let mut vocab = item(id, stage);
            vocab.learned = id % 4 == 0;
            if id % 3 == 0 {
                vocab.review_date = now() + Duration::days(id);
            }
            items.push(vocab);
        }

        let buckets = classify(&items, now());
        for vocab in &items {
            let hits = [&buckets.new, &buckets.review, &buckets.rest, &buckets.learned]
                .iter()
                .filter(|bucket| bucket.iter().any(|v| v.id == vocab.id))
                .count();
            assert!(hits <= 1, "item {} in {} primary buckets", vocab.id, hits);
        }
    }

    #[test]
    fn test_today_buckets_follow_stage() {
        let mut started = item(1, 1);
        started.modified_at = now() - Duration::hours(2);
        let mut reviewed = item(2, 3);
        reviewed.modified_at = now();
        let stale = item(3, 2);

        let items = vec![started, reviewed, stale];
        let buckets = classify(&items, now());

        assert_eq!(ids(&buckets.started_today), vec![1]);
        assert_eq!(ids(&buckets.reviewed_today), vec![2]);
        // today activity does not take the item out of its primary bucket
        assert_eq!(ids(&buckets.review), vec![1, 2, 3]);
    }

    #[test]
    fn test_stage_change_moves_between_today_buckets() {
        let mut vocab = item(1, 1);
        vocab.modified_at = now();
        let mut items = vec![vocab];

        assert_eq!(ids(&classify(&items, now()).started_today), vec![1]);

        items[0].sr_stage = 2;
        let buckets = classify(&items, now());
        assert!(buckets.started_today.is_empty());
        assert_eq!(ids(&buckets.reviewed_today), vec![1]);
    }

    #[test]
    fn test_today_compares_utc_calendar_day() {
        let late_night = Utc.with_ymd_and_hms(2025, 1, 15, 23, 59, 0).unwrap();
        let mut same_day = item(1, 2);
        same_day.modified_at = Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 1).unwrap();
        let mut previous_day = item(2, 2);
        previous_day.modified_at = Utc.with_ymd_and_hms(2025, 1, 14, 23, 59, 59).unwrap();

        let items = vec![same_day, previous_day];
        assert_eq!(ids(&classify(&items, late_night).reviewed_today), vec![1]);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let items: Vec<_> = (1..=6).map(|id| item(id, (id % 3) as u32)).collect();
        assert_eq!(classify(&items, now()), classify(&items, now()));
    }
}
