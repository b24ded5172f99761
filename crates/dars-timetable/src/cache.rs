use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;

use crate::types::ScheduleResult;

/// The last successful refresh and the local day it was made on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub result: ScheduleResult,
    pub valid_for: NaiveDate,
}

/// Single-slot, in-memory schedule cache valid for exactly one calendar day.
///
/// Created empty at startup, overwritten by every successful refresh, never
/// cleared. Readers get a clone so the lock is held only for the copy.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    slot: RwLock<Option<CacheEntry>>,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached result if it was produced on `today`.
    pub fn get(&self, today: NaiveDate) -> Option<ScheduleResult> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .filter(|entry| entry.valid_for == today)
            .map(|entry| entry.result.clone())
    }

    /// Replace the slot wholesale.
    pub fn put(&self, result: ScheduleResult, valid_for: NaiveDate) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(CacheEntry { result, valid_for });
    }

    /// Date of the stored entry, whether or not it is still current.
    pub fn valid_for(&self) -> Option<NaiveDate> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|entry| entry.valid_for)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DaySchedule;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn result(subject: &str) -> ScheduleResult {
        ScheduleResult {
            today: DaySchedule {
                date: date(19),
                subjects: vec![subject.to_string()],
            },
            tomorrow: DaySchedule {
                date: date(20),
                subjects: vec![],
            },
        }
    }

    #[test]
    fn empty_cache_misses() {
        let cache = ScheduleCache::new();
        assert_eq!(cache.get(date(19)), None);
        assert_eq!(cache.valid_for(), None);
    }

    #[test]
    fn hit_only_on_same_day() {
        let cache = ScheduleCache::new();
        cache.put(result("Math"), date(19));

        assert_eq!(cache.get(date(19)), Some(result("Math")));
        assert_eq!(cache.get(date(20)), None);
        assert_eq!(cache.get(date(18)), None);
        assert_eq!(cache.valid_for(), Some(date(19)));
    }

    #[test]
    fn put_overwrites() {
        let cache = ScheduleCache::new();
        cache.put(result("Math"), date(19));
        cache.put(result("Art"), date(20));

        assert_eq!(cache.get(date(19)), None);
        assert_eq!(cache.get(date(20)), Some(result("Art")));
    }
}
