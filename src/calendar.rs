use crate::period::days_in_month;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub has_entry: bool,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    pub year: i32,
    pub month: u32,
    pub month_name: &'static str,
    /// Sunday-first rows of seven; `None` pads before the 1st and after the last day.
    pub cells: Vec<Option<CalendarDay>>,
    pub entry_count: usize,
    pub total_days: u32,
}

impl CalendarGrid {
    pub fn build(year: i32, month: u32, entry_days: &[u32], today: NaiveDate) -> Self {
        let total_days = days_in_month(year, month);
        let entries: BTreeSet<u32> = entry_days
            .iter()
            .copied()
            .filter(|day| (1..=total_days).contains(day))
            .collect();

        let leading = NaiveDate::from_ymd_opt(year, month, 1)
            .map_or(0, |first| first.weekday().num_days_from_sunday());

        let mut cells: Vec<Option<CalendarDay>> = (0..leading).map(|_| None).collect();
        let is_current_month = today.year() == year && today.month() == month;
        cells.extend((1..=total_days).map(|day| {
            Some(CalendarDay {
                day,
                has_entry: entries.contains(&day),
                is_today: is_current_month && today.day() == day,
            })
        }));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }

        Self {
            year,
            month,
            month_name: month_name(month),
            cells,
            entry_count: entries.len(),
            total_days,
        }
    }
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.saturating_sub(1) as usize) % 12]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_starts_on_the_right_weekday() {
        // 1 May 2024 was a Wednesday.
        let grid = CalendarGrid::build(2024, 5, &[], date(2024, 5, 10));
        assert_eq!(grid.cells[..3], [None, None, None]);
        assert_eq!(grid.cells[3].map(|c| c.day), Some(1));
        assert_eq!(grid.cells.len() % 7, 0);
        assert_eq!(grid.cells.len() / 7, 5);
        assert_eq!(grid.month_name, "May");
    }

    #[test]
    fn sunday_first_month_has_no_leading_blanks() {
        // 1 September 2024 was a Sunday.
        let grid = CalendarGrid::build(2024, 9, &[], date(2024, 1, 1));
        assert_eq!(grid.cells[0].map(|c| c.day), Some(1));
        assert!(grid.cells.iter().flatten().all(|c| !c.is_today));
    }

    #[test]
    fn entries_are_marked_and_counted_once() {
        let grid = CalendarGrid::build(2024, 2, &[3, 3, 14, 29, 30, 0], date(2024, 2, 14));
        assert_eq!(grid.total_days, 29);
        assert_eq!(grid.entry_count, 3);

        let marked: Vec<u32> = grid
            .cells
            .iter()
            .flatten()
            .filter(|c| c.has_entry)
            .map(|c| c.day)
            .collect();
        assert_eq!(marked, vec![3, 14, 29]);

        let today: Vec<u32> = grid
            .cells
            .iter()
            .flatten()
            .filter(|c| c.is_today)
            .map(|c| c.day)
            .collect();
        assert_eq!(today, vec![14]);
    }
}
