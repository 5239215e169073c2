use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::payment::PaymentFrequency;

/// Day every month can hold; monthly anchors fall back to it when the
/// target month is too short for them.
pub const MONTHLY_ANCHOR_DAY_CAP: u32 = 28;

/// Anchor days applied when a long-term job does not configure its own.
pub const DEFAULT_ANCHOR_DAYS: [u32; 2] = [15, 30];

/// Due-date math shared by bulk generation at contract activation and the
/// single-row extension that runs when a recurring payment is confirmed.
/// Keeping both call sites on these functions keeps the clamping and
/// deduplication rules identical.
pub struct ScheduleService;

impl ScheduleService {
    /// Materializes every due date inside `[start, end]` for the cadence.
    ///
    /// Output is deduplicated and ascending. Monthly cadences emit one date
    /// per anchor day per calendar month; an anchor day the month cannot
    /// hold falls back to day 28, never to the month's last day. Custom
    /// cadences settle in a single installment on the end date.
    pub fn generate_due_dates(
        start: NaiveDate,
        end: NaiveDate,
        frequency: PaymentFrequency,
        anchor_days: &[u32],
    ) -> Vec<NaiveDate> {
        let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

        match frequency {
            PaymentFrequency::Weekly => collect_periodic(&mut dates, start, end, 7),
            PaymentFrequency::Biweekly => collect_periodic(&mut dates, start, end, 14),
            PaymentFrequency::Monthly => {
                let anchors: &[u32] = if anchor_days.is_empty() {
                    &DEFAULT_ANCHOR_DAYS
                } else {
                    anchor_days
                };
                collect_monthly(&mut dates, start, end, anchors);
            }
            PaymentFrequency::Custom => {
                dates.insert(end);
            }
        }

        dates.into_iter().collect()
    }

    /// Next due date after `from`, one cadence step later. Unrecognized
    /// cadences step weekly.
    pub fn next_due_date(from: NaiveDate, frequency: PaymentFrequency) -> NaiveDate {
        match frequency {
            PaymentFrequency::Weekly | PaymentFrequency::Custom => from + Duration::days(7),
            PaymentFrequency::Biweekly => from + Duration::days(14),
            PaymentFrequency::Monthly => {
                let (year, month) = next_month(from.year(), from.month());
                day_in_month(year, month, from.day()).unwrap_or(from + Duration::days(28))
            }
        }
    }

    /// Due date for the follow-up row a recurring confirmation schedules,
    /// or `None` once the next step would land past the job's end date.
    pub fn recurring_follow_up(
        confirmed_due: NaiveDate,
        frequency: PaymentFrequency,
        job_end: Option<NaiveDate>,
    ) -> Option<NaiveDate> {
        let next = Self::next_due_date(confirmed_due, frequency);
        match job_end {
            Some(end) if next > end => None,
            _ => Some(next),
        }
    }
}

fn collect_periodic(dates: &mut BTreeSet<NaiveDate>, start: NaiveDate, end: NaiveDate, step: i64) {
    let mut cursor = start;
    while cursor <= end {
        dates.insert(cursor);
        cursor += Duration::days(step);
    }
}

fn collect_monthly(
    dates: &mut BTreeSet<NaiveDate>,
    start: NaiveDate,
    end: NaiveDate,
    anchors: &[u32],
) {
    let (mut year, mut month) = (start.year(), start.month());

    while (year, month) <= (end.year(), end.month()) {
        for &anchor in anchors {
            if let Some(due) = day_in_month(year, month, anchor) {
                if due >= start && due <= end {
                    dates.insert(due);
                }
            }
        }
        let (next_year, next_month) = next_month(year, month);
        year = next_year;
        month = next_month;
    }
}

/// `day` within the month when the month holds it, day 28 otherwise.
fn day_in_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month, MONTHLY_ANCHOR_DAY_CAP))
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_anchors_keep_valid_days_and_clamp_short_months() {
        let dates = ScheduleService::generate_due_dates(
            date(2024, 1, 1),
            date(2024, 3, 31),
            PaymentFrequency::Monthly,
            &[15, 30],
        );

        // February 2024 has 29 days, yet day 30 still lands on the 28th.
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 15),
                date(2024, 1, 30),
                date(2024, 2, 15),
                date(2024, 2, 28),
                date(2024, 3, 15),
                date(2024, 3, 30),
            ]
        );
    }

    #[test]
    fn monthly_anchors_that_collide_after_clamping_yield_one_row() {
        let dates = ScheduleService::generate_due_dates(
            date(2023, 2, 1),
            date(2023, 2, 28),
            PaymentFrequency::Monthly,
            &[28, 30],
        );

        assert_eq!(dates, vec![date(2023, 2, 28)]);
    }

    #[test]
    fn empty_anchor_set_falls_back_to_the_fifteenth_and_thirtieth() {
        let dates = ScheduleService::generate_due_dates(
            date(2024, 4, 1),
            date(2024, 4, 30),
            PaymentFrequency::Monthly,
            &[],
        );

        assert_eq!(dates, vec![date(2024, 4, 15), date(2024, 4, 30)]);
    }

    #[test]
    fn weekly_steps_by_seven_days_up_to_the_end_date() {
        let dates = ScheduleService::generate_due_dates(
            date(2024, 1, 1),
            date(2024, 1, 22),
            PaymentFrequency::Weekly,
            &[],
        );

        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 8),
                date(2024, 1, 15),
                date(2024, 1, 22),
            ]
        );
    }

    #[test]
    fn biweekly_steps_by_fourteen_days() {
        let dates = ScheduleService::generate_due_dates(
            date(2024, 1, 1),
            date(2024, 1, 31),
            PaymentFrequency::Biweekly,
            &[],
        );

        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 15), date(2024, 1, 29)]
        );
    }

    #[test]
    fn custom_frequency_settles_in_one_installment_on_the_end_date() {
        let dates = ScheduleService::generate_due_dates(
            date(2024, 5, 1),
            date(2024, 5, 20),
            PaymentFrequency::Custom,
            &[],
        );

        assert_eq!(dates, vec![date(2024, 5, 20)]);
    }

    #[test]
    fn inverted_range_produces_no_periodic_dates() {
        let dates = ScheduleService::generate_due_dates(
            date(2024, 2, 1),
            date(2024, 1, 1),
            PaymentFrequency::Weekly,
            &[],
        );

        assert!(dates.is_empty());
    }

    #[test]
    fn follow_up_stops_once_the_job_end_date_is_passed() {
        let due = date(2024, 1, 15);

        let blocked = ScheduleService::recurring_follow_up(
            due,
            PaymentFrequency::Weekly,
            Some(date(2024, 1, 20)),
        );
        assert_eq!(blocked, None);

        let next = ScheduleService::recurring_follow_up(
            due,
            PaymentFrequency::Weekly,
            Some(date(2024, 2, 1)),
        );
        assert_eq!(next, Some(date(2024, 1, 22)));
    }

    #[test]
    fn open_ended_recurrence_always_gets_a_follow_up() {
        let next =
            ScheduleService::recurring_follow_up(date(2024, 1, 15), PaymentFrequency::Biweekly, None);

        assert_eq!(next, Some(date(2024, 1, 29)));
    }

    #[test]
    fn monthly_follow_up_keeps_the_day_when_the_next_month_holds_it() {
        assert_eq!(
            ScheduleService::next_due_date(date(2024, 1, 15), PaymentFrequency::Monthly),
            date(2024, 2, 15)
        );
        assert_eq!(
            ScheduleService::next_due_date(date(2024, 12, 15), PaymentFrequency::Monthly),
            date(2025, 1, 15)
        );
    }

    #[test]
    fn monthly_follow_up_clamps_into_short_months() {
        assert_eq!(
            ScheduleService::next_due_date(date(2024, 1, 30), PaymentFrequency::Monthly),
            date(2024, 2, 28)
        );
    }

    #[test]
    fn unknown_frequency_extends_weekly() {
        assert_eq!(
            ScheduleService::next_due_date(date(2024, 3, 1), PaymentFrequency::Custom),
            date(2024, 3, 8)
        );
    }
}
