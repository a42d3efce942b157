//! Daily generation quotas.
//!
//! Counters live in process memory and are lost on restart. Each counter
//! resets on the first touch after the calendar day (process-local time
//! zone) changes.

use chrono::{Local, NaiveDate};
use std::sync::Mutex;

use crate::error::AppError;
use crate::models::{GenerationKind, QuotaStatus};

struct Counter {
    count: u32,
    day: NaiveDate,
}

/// Per-kind daily ceilings for image and video generation.
///
/// `check` and the post-success `record` are separate calls with the whole
/// upstream request between them, so two interleaved requests of one kind
/// can both pass the check at the last remaining slot. The mutex guards the
/// counter memory, not that sequence. Accepted for a single-operator
/// deployment.
pub struct DailyQuota {
    image: Mutex<Counter>,
    image_limit: u32,
    video: Mutex<Counter>,
    video_limit: u32,
}

impl DailyQuota {
    pub fn new(image_limit: u32, video_limit: u32) -> Self {
        let today = Local::now().date_naive();
        Self {
            image: Mutex::new(Counter {
                count: 0,
                day: today,
            }),
            image_limit,
            video: Mutex::new(Counter {
                count: 0,
                day: today,
            }),
            video_limit,
        }
    }

    /// Fail fast with `LimitExceeded` when the day's ceiling is reached.
    ///
    /// Does not consume quota; callers `record` only after the generation
    /// succeeds.
    pub fn check(&self, kind: GenerationKind) -> Result<(), AppError> {
        self.check_on(kind, Local::now().date_naive())
    }

    /// Count one successful generation against today's quota.
    pub fn record(&self, kind: GenerationKind) {
        self.record_on(kind, Local::now().date_naive());
    }

    /// Read-only usage view. Applies the day-rollover logic to the returned
    /// numbers without mutating the stored counter.
    pub fn status(&self, kind: GenerationKind) -> QuotaStatus {
        self.status_on(kind, Local::now().date_naive())
    }

    fn slot(&self, kind: GenerationKind) -> (&Mutex<Counter>, u32) {
        match kind {
            GenerationKind::Image => (&self.image, self.image_limit),
            GenerationKind::Video => (&self.video, self.video_limit),
        }
    }

    fn check_on(&self, kind: GenerationKind, today: NaiveDate) -> Result<(), AppError> {
        let (slot, limit) = self.slot(kind);
        let mut counter = slot.lock().expect("quota mutex poisoned");

        if counter.day != today {
            counter.count = 0;
            counter.day = today;
            tracing::info!(kind = %kind, "daily counter reset");
        }

        if counter.count >= limit {
            tracing::warn!(kind = %kind, used = counter.count, limit, "daily limit reached");
            return Err(AppError::LimitExceeded { kind, limit });
        }

        Ok(())
    }

    fn record_on(&self, kind: GenerationKind, today: NaiveDate) {
        let (slot, limit) = self.slot(kind);
        let mut counter = slot.lock().expect("quota mutex poisoned");

        if counter.day != today {
            counter.count = 0;
            counter.day = today;
        }

        counter.count += 1;
        tracing::info!(kind = %kind, used = counter.count, limit, "daily usage");
    }

    fn status_on(&self, kind: GenerationKind, today: NaiveDate) -> QuotaStatus {
        let (slot, limit) = self.slot(kind);
        let counter = slot.lock().expect("quota mutex poisoned");

        let used = if counter.day == today {
            counter.count
        } else {
            0
        };

        QuotaStatus { used, limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    }

    #[test]
    fn check_fails_once_ceiling_is_reached() {
        let quota = DailyQuota::new(2, 5);
        let today = day(0);

        quota.check_on(GenerationKind::Image, today).unwrap();
        quota.record_on(GenerationKind::Image, today);
        quota.check_on(GenerationKind::Image, today).unwrap();
        quota.record_on(GenerationKind::Image, today);

        let err = quota.check_on(GenerationKind::Image, today).unwrap_err();
        assert!(matches!(
            err,
            AppError::LimitExceeded {
                kind: GenerationKind::Image,
                limit: 2
            }
        ));
        // The failed check must not advance the counter.
        assert_eq!(
            quota.status_on(GenerationKind::Image, today),
            QuotaStatus { used: 2, limit: 2 }
        );
    }

    #[test]
    fn kinds_are_counted_independently() {
        let quota = DailyQuota::new(1, 1);
        let today = day(0);

        quota.record_on(GenerationKind::Image, today);
        assert!(quota.check_on(GenerationKind::Image, today).is_err());
        assert!(quota.check_on(GenerationKind::Video, today).is_ok());
    }

    #[test]
    fn counter_resets_after_any_number_of_elapsed_days() {
        let quota = DailyQuota::new(2, 5);

        quota.record_on(GenerationKind::Image, day(0));
        quota.record_on(GenerationKind::Image, day(0));
        assert!(quota.check_on(GenerationKind::Image, day(0)).is_err());

        // Three days later the counter starts from zero again.
        assert!(quota.check_on(GenerationKind::Image, day(3)).is_ok());
        assert_eq!(
            quota.status_on(GenerationKind::Image, day(3)),
            QuotaStatus { used: 0, limit: 2 }
        );
    }

    #[test]
    fn status_is_read_only_and_idempotent() {
        let quota = DailyQuota::new(10, 5);

        quota.record_on(GenerationKind::Video, day(0));

        let first = quota.status_on(GenerationKind::Video, day(0));
        let second = quota.status_on(GenerationKind::Video, day(0));
        assert_eq!(first, QuotaStatus { used: 1, limit: 5 });
        assert_eq!(first, second);

        // A stale-day status reports zero without resetting the stored
        // counter for the old day.
        assert_eq!(
            quota.status_on(GenerationKind::Video, day(1)),
            QuotaStatus { used: 0, limit: 5 }
        );
        assert_eq!(
            quota.status_on(GenerationKind::Video, day(0)),
            QuotaStatus { used: 1, limit: 5 }
        );
    }
}
