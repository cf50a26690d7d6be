// src/query/streak.rs
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::entity::Reflection;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_reflections: usize,
    pub reflected_today: bool,
}

/// Streak math over reflection dates. The current streak is anchored at
/// `today` or yesterday (a streak survives until a full day is missed) and
/// walks backwards by exact one-day steps; the longest streak scans the
/// whole history. Unparseable dates are ignored.
pub fn reflection_stats(reflections: &[Reflection], today: NaiveDate) -> ReflectionStats {
    let dates: BTreeSet<NaiveDate> = reflections
        .iter()
        .filter_map(|r| NaiveDate::parse_from_str(&r.date, "%Y-%m-%d").ok())
        .collect();

    let reflected_today = dates.contains(&today);

    // Newest first.
    let sorted: Vec<NaiveDate> = dates.into_iter().rev().collect();

    let mut current_streak = 0;
    if let Some(&newest) = sorted.first() {
        if newest == today || newest == today - Duration::days(1) {
            current_streak = 1;
            let mut anchor = newest;
            for &date in &sorted[1..] {
                if date == anchor - Duration::days(1) {
                    current_streak += 1;
                    anchor = date;
                } else {
                    break;
                }
            }
        }
    }

    let mut longest_streak = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for &date in &sorted {
        run = match prev {
            Some(p) if date == p - Duration::days(1) => run + 1,
            _ => 1,
        };
        longest_streak = longest_streak.max(run);
        prev = Some(date);
    }

    ReflectionStats {
        current_streak,
        longest_streak,
        total_reflections: reflections.len(),
        reflected_today,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reflections(dates: &[&str]) -> Vec<Reflection> {
        dates
            .iter()
            .map(|d| Reflection::new(d.to_string(), "entry".to_string()))
            .collect()
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_three_consecutive_days_ending_today() {
        let stats = reflection_stats(
            &reflections(&["2026-08-28", "2026-08-29", "2026-08-30"]),
            day("2026-08-30"),
        );
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
        assert!(stats.reflected_today);
    }

    #[test]
    fn test_streak_survives_until_a_day_is_missed() {
        // Last entry was yesterday: the streak is still alive.
        let stats = reflection_stats(&reflections(&["2026-08-29"]), day("2026-08-30"));
        assert_eq!(stats.current_streak, 1);
        assert!(!stats.reflected_today);
    }

    #[test]
    fn test_stale_entries_give_zero_current_streak() {
        let stats = reflection_stats(&reflections(&["2026-08-28"]), day("2026-08-30"));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 1);
    }

    #[test]
    fn test_longest_streak_in_history() {
        let stats = reflection_stats(
            &reflections(&[
                "2026-08-01",
                "2026-08-02",
                "2026-08-03",
                "2026-08-04",
                "2026-08-20",
                "2026-08-30",
            ]),
            day("2026-08-30"),
        );
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 4);
        assert_eq!(stats.total_reflections, 6);
    }

    #[test]
    fn test_empty_history() {
        let stats = reflection_stats(&[], day("2026-08-30"));
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
        assert!(!stats.reflected_today);
    }
}
