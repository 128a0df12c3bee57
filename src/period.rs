//! Custom billing period ("custom month") resolution.
//!
//! A user may configure a monthly cycle that starts on an arbitrary day, e.g.
//! the 21st through the 20th of the following month. Everything that queries
//! date-bounded data goes through [`resolve_period`].

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// End day stored when a cycle starts on the 1st; stands for "last day of month".
pub const LAST_DAY_SENTINEL: u32 = 31;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("{field} must be between 1 and 31, got {value}")]
    DayOutOfRange { field: &'static str, value: u32 },
    #[error("month_start and month_end must both be set or both be empty")]
    HalfConfigured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillingPeriodConfig {
    pub start_day: Option<u32>,
    pub end_day: Option<u32>,
}

impl BillingPeriodConfig {
    pub fn calendar_month() -> Self {
        Self::default()
    }

    /// Custom cycle beginning on `start_day`; the end day is derived.
    pub fn starting_on(start_day: u32) -> Result<Self, PeriodError> {
        check_day("month_start", start_day)?;
        Ok(Self {
            start_day: Some(start_day),
            end_day: Some(derive_end_day(start_day)),
        })
    }

    /// Builds a config from persisted settings, rejecting values the resolver
    /// would otherwise have to guess about.
    pub fn from_settings(
        month_start: Option<u32>,
        month_end: Option<u32>,
    ) -> Result<Self, PeriodError> {
        match (month_start, month_end) {
            (None, None) => Ok(Self::calendar_month()),
            (Some(start), Some(end)) => {
                check_day("month_start", start)?;
                check_day("month_end", end)?;
                Ok(Self {
                    start_day: Some(start),
                    end_day: Some(end),
                })
            }
            _ => Err(PeriodError::HalfConfigured),
        }
    }

    pub fn is_custom(&self) -> bool {
        self.start_day.is_some() && self.end_day.is_some()
    }

    pub fn resolve(&self, reference: NaiveDate) -> ResolvedPeriod {
        resolve_period(reference, self.start_day, self.end_day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ResolvedPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

pub fn derive_end_day(start_day: u32) -> u32 {
    if start_day == 1 {
        LAST_DAY_SENTINEL
    } else {
        start_day - 1
    }
}

/// Returns the cycle containing `reference`.
///
/// Without a complete `(start_day, end_day)` pair this is the calendar month of
/// `reference`. Days that do not exist in the month they land in are clamped
/// to that month's last day, so a 1st–31st cycle in June ends on the 30th.
pub fn resolve_period(
    reference: NaiveDate,
    start_day: Option<u32>,
    end_day: Option<u32>,
) -> ResolvedPeriod {
    let (Some(start_day), Some(end_day)) = (start_day, end_day) else {
        return ResolvedPeriod {
            start_date: day_of_month(reference, 0, 1),
            end_date: day_of_month(reference, 0, LAST_DAY_SENTINEL),
        };
    };

    if start_day <= end_day {
        return ResolvedPeriod {
            start_date: day_of_month(reference, 0, start_day),
            end_date: day_of_month(reference, 0, end_day),
        };
    }

    if reference.day() >= start_day {
        ResolvedPeriod {
            start_date: day_of_month(reference, 0, start_day),
            end_date: day_of_month(reference, 1, end_day),
        }
    } else {
        ResolvedPeriod {
            start_date: day_of_month(reference, -1, start_day),
            end_date: day_of_month(reference, 0, end_day),
        }
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn check_day(field: &'static str, value: u32) -> Result<(), PeriodError> {
    if (1..=31).contains(&value) {
        Ok(())
    } else {
        Err(PeriodError::DayOutOfRange { field, value })
    }
}

/// `day` of the month `offset` months away from `anchor`'s month, clamped into
/// that month. The `unwrap_or` fallbacks are only reachable at the edges of
/// chrono's representable range.
fn day_of_month(anchor: NaiveDate, offset: i32, day: u32) -> NaiveDate {
    let first = anchor.with_day(1).unwrap_or(anchor);
    let month = match offset {
        0 => Some(first),
        n if n > 0 => first.checked_add_months(Months::new(n.unsigned_abs())),
        n => first.checked_sub_months(Months::new(n.unsigned_abs())),
    }
    .unwrap_or(first);

    let last = days_in_month(month.year(), month.month());
    month.with_day(day.clamp(1, last)).unwrap_or(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(start: NaiveDate, end: NaiveDate) -> ResolvedPeriod {
        ResolvedPeriod {
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn unset_config_resolves_to_calendar_month() {
        assert_eq!(
            resolve_period(date(2024, 3, 15), None, None),
            period(date(2024, 3, 1), date(2024, 3, 31))
        );
    }

    #[test]
    fn unset_config_handles_leap_february() {
        assert_eq!(
            resolve_period(date(2024, 2, 10), None, None),
            period(date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            resolve_period(date(2023, 2, 10), None, None),
            period(date(2023, 2, 1), date(2023, 2, 28))
        );
    }

    #[test]
    fn half_configured_falls_back_to_calendar_month() {
        assert_eq!(
            resolve_period(date(2024, 4, 9), Some(21), None),
            period(date(2024, 4, 1), date(2024, 4, 30))
        );
        assert_eq!(
            resolve_period(date(2024, 4, 9), None, Some(20)),
            period(date(2024, 4, 1), date(2024, 4, 30))
        );
    }

    #[test]
    fn wrapping_cycle_after_start_day_ends_next_month() {
        assert_eq!(
            resolve_period(date(2024, 5, 25), Some(21), Some(20)),
            period(date(2024, 5, 21), date(2024, 6, 20))
        );
    }

    #[test]
    fn wrapping_cycle_before_start_day_began_last_month() {
        assert_eq!(
            resolve_period(date(2024, 5, 10), Some(21), Some(20)),
            period(date(2024, 4, 21), date(2024, 5, 20))
        );
    }

    #[test]
    fn wrapping_cycle_rolls_over_year_boundaries() {
        assert_eq!(
            resolve_period(date(2024, 1, 5), Some(21), Some(20)),
            period(date(2023, 12, 21), date(2024, 1, 20))
        );
        assert_eq!(
            resolve_period(date(2023, 12, 28), Some(21), Some(20)),
            period(date(2023, 12, 21), date(2024, 1, 20))
        );
    }

    #[test]
    fn end_day_past_month_length_is_clamped() {
        assert_eq!(
            resolve_period(date(2024, 6, 1), Some(1), Some(derive_end_day(1))),
            period(date(2024, 6, 1), date(2024, 6, 30))
        );
        assert_eq!(
            resolve_period(date(2023, 2, 14), Some(1), Some(31)),
            period(date(2023, 2, 1), date(2023, 2, 28))
        );
    }

    #[test]
    fn start_day_past_month_length_is_clamped() {
        // 31st/30th cycle seen from March: started on the last day of February.
        assert_eq!(
            resolve_period(date(2024, 3, 10), Some(31), Some(30)),
            period(date(2024, 2, 29), date(2024, 3, 30))
        );
    }

    #[test]
    fn non_wrapping_cycle_stays_in_reference_month() {
        assert_eq!(
            resolve_period(date(2024, 7, 2), Some(5), Some(25)),
            period(date(2024, 7, 5), date(2024, 7, 25))
        );
    }

    #[test]
    fn derived_end_day_is_day_before_start() {
        assert_eq!(derive_end_day(1), 31);
        assert_eq!(derive_end_day(2), 1);
        assert_eq!(derive_end_day(21), 20);
        assert_eq!(derive_end_day(31), 30);
    }

    #[test]
    fn derived_cycles_always_contain_reference() {
        let mut day = date(2023, 1, 1);
        let last = date(2025, 12, 31);
        while day <= last {
            for start in 1..=31 {
                let config = BillingPeriodConfig::starting_on(start).unwrap();
                let resolved = config.resolve(day);
                assert!(
                    resolved.contains(day),
                    "{day} not in {resolved:?} for start {start}"
                );
                assert!(resolved.num_days() >= 28 && resolved.num_days() <= 32);
            }

            let calendar = resolve_period(day, None, None);
            assert_eq!(calendar.start_date.day(), 1);
            assert_eq!(calendar.start_date.month(), day.month());
            assert_eq!(
                calendar.end_date.day(),
                days_in_month(day.year(), day.month())
            );
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn resolving_twice_gives_the_same_period() {
        let reference = date(2024, 8, 19);
        let first = resolve_period(reference, Some(15), Some(14));
        let second = resolve_period(reference, Some(15), Some(14));
        assert_eq!(first, second);
    }

    #[test]
    fn settings_validation_rejects_out_of_range_days() {
        assert_eq!(
            BillingPeriodConfig::from_settings(Some(0), Some(31)),
            Err(PeriodError::DayOutOfRange {
                field: "month_start",
                value: 0
            })
        );
        assert_eq!(
            BillingPeriodConfig::from_settings(Some(10), Some(40)),
            Err(PeriodError::DayOutOfRange {
                field: "month_end",
                value: 40
            })
        );
        assert_eq!(
            BillingPeriodConfig::from_settings(Some(10), None),
            Err(PeriodError::HalfConfigured)
        );
        assert!(BillingPeriodConfig::starting_on(32).is_err());
    }

    #[test]
    fn settings_validation_accepts_empty_and_full_pairs() {
        let empty = BillingPeriodConfig::from_settings(None, None).unwrap();
        assert!(!empty.is_custom());

        let custom = BillingPeriodConfig::from_settings(Some(21), Some(20)).unwrap();
        assert!(custom.is_custom());
        assert_eq!(custom, BillingPeriodConfig::starting_on(21).unwrap());
    }

    #[test]
    fn resolved_period_serializes_as_iso_dates() {
        let resolved = resolve_period(date(2024, 5, 25), Some(21), Some(20));
        let json = serde_json::to_value(resolved).unwrap();
        assert_eq!(json["start_date"], "2024-05-21");
        assert_eq!(json["end_date"], "2024-06-20");
    }
}
