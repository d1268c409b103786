//! Schedule entity and the taking-time calculator.
//!
//! A schedule spreads `frequency` daily doses across a fixed 08:00–22:00
//! window. The taking times are computed once, when the schedule is created,
//! and the entity answers two questions afterwards: is it active on a given
//! day, and which of its doses fall inside a lookahead window.

use std::fmt;

use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use super::errors::ScheduleError;

pub const MIN_FREQUENCY: i64 = 1;
pub const MAX_FREQUENCY: i64 = 15;

const WINDOW_START_HOUR: u32 = 8;
const WINDOW_END_HOUR: u32 = 22;
const ROUNDING_STEP_MINUTES: u32 = 15;

/// A time of day at which a dose is taken. Minute resolution, no date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TakingTime {
    hour: u32,
    minute: u32,
}

impl TakingTime {
    /// Returns `None` unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    /// Parse an `HH:MM` string as produced by `Display`.
    pub fn parse(value: &str) -> Result<Self, String> {
        let (hour, minute) = value
            .split_once(':')
            .ok_or_else(|| format!("taking time '{}' is not in HH:MM format", value))?;
        let hour: u32 = hour
            .parse()
            .map_err(|_| format!("invalid hour in taking time '{}'", value))?;
        let minute: u32 = minute
            .parse()
            .map_err(|_| format!("invalid minute in taking time '{}'", value))?;
        Self::new(hour, minute).ok_or_else(|| format!("taking time '{}' is out of range", value))
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::default() + Duration::minutes(i64::from(self.hour * 60 + self.minute))
    }

    /// The first occurrence of this time at or after `from`.
    ///
    /// The candidate is placed on `from`'s calendar day; if that is already in
    /// the past it moves to the next day.
    pub fn next_occurrence(&self, from: NaiveDateTime) -> NaiveDateTime {
        let candidate = from.date().and_time(self.as_naive_time());
        if candidate < from {
            candidate + Duration::days(1)
        } else {
            candidate
        }
    }
}

impl fmt::Display for TakingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A concrete dose: a medicine paired with the moment it is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taking {
    pub medicine_name: String,
    pub taking_time: NaiveDateTime,
}

impl Taking {
    pub fn format_time(&self) -> String {
        self.taking_time.format("%H:%M").to_string()
    }
}

/// Compute the daily taking times for `frequency` doses.
///
/// One dose lands on the middle of the window (15:00). Otherwise the window
/// is split into `frequency - 1` equal parts with a dose on every boundary,
/// so the first dose is at 08:00 and the last at 22:00. Intermediate times
/// are rounded to the nearest quarter hour.
pub fn calculate_taking_times(frequency: i64) -> Result<Vec<TakingTime>, ScheduleError> {
    if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&frequency) {
        return Err(ScheduleError::InvalidFrequency(frequency));
    }

    // Bounded by MAX_FREQUENCY above.
    let frequency = frequency as u32;

    if frequency == 1 {
        let midpoint = (WINDOW_START_HOUR + WINDOW_END_HOUR) / 2;
        return Ok(vec![TakingTime {
            hour: midpoint,
            minute: 0,
        }]);
    }

    let window_minutes = (WINDOW_END_HOUR - WINDOW_START_HOUR) * 60;
    let intervals = frequency - 1;

    let times = (0..frequency)
        .map(|i| {
            let offset = i * window_minutes / intervals;
            round_to_quarter_hour(WINDOW_START_HOUR + offset / 60, offset % 60)
        })
        .collect();

    Ok(times)
}

fn round_to_quarter_hour(hour: u32, minute: u32) -> TakingTime {
    let rounded = (minute + ROUNDING_STEP_MINUTES / 2) / ROUNDING_STEP_MINUTES * ROUNDING_STEP_MINUTES;
    if rounded == 60 {
        TakingTime {
            hour: (hour + 1) % 24,
            minute: 0,
        }
    } else {
        TakingTime {
            hour,
            minute: rounded,
        }
    }
}

/// One medicine's dosing plan for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    id: i64,
    medicine_name: String,
    frequency: u32,
    duration: u32,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    user_id: i64,
    taking_times: Vec<TakingTime>,
}

impl Schedule {
    /// Validate the input and build a new, not yet persisted schedule.
    ///
    /// The frequency is checked first and reported as `InvalidFrequency`;
    /// every other violation is `InvalidInput`.
    pub fn create(
        medicine_name: &str,
        frequency: i64,
        duration: i64,
        user_id: i64,
        reference_now: NaiveDateTime,
    ) -> Result<Self, ScheduleError> {
        if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&frequency) {
            return Err(ScheduleError::InvalidFrequency(frequency));
        }

        let medicine_name = medicine_name.trim();
        if medicine_name.is_empty() {
            return Err(ScheduleError::InvalidInput(
                "medicine name cannot be empty".to_string(),
            ));
        }
        if duration < 0 {
            return Err(ScheduleError::InvalidInput(
                "duration cannot be negative".to_string(),
            ));
        }
        if user_id <= 0 {
            return Err(ScheduleError::InvalidInput(
                "user id must be positive".to_string(),
            ));
        }

        let duration = u32::try_from(duration)
            .map_err(|_| ScheduleError::InvalidInput("duration is too large".to_string()))?;

        let start_date = reference_now.date();
        let end_date = if duration > 0 {
            let end = start_date
                .checked_add_days(Days::new(u64::from(duration)))
                .ok_or_else(|| ScheduleError::InvalidInput("duration is too large".to_string()))?;
            Some(end)
        } else {
            None
        };

        let taking_times = calculate_taking_times(frequency)?;

        Ok(Self {
            id: 0,
            medicine_name: medicine_name.to_string(),
            frequency: frequency as u32,
            duration,
            start_date,
            end_date,
            user_id,
            taking_times,
        })
    }

    /// Rebuild a schedule that was previously persisted.
    ///
    /// No validation happens here; the store only holds rows written through
    /// `create`.
    pub fn restore(
        id: i64,
        medicine_name: String,
        frequency: u32,
        duration: u32,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        user_id: i64,
        mut taking_times: Vec<TakingTime>,
    ) -> Self {
        taking_times.sort();
        Self {
            id,
            medicine_name,
            frequency,
            duration,
            start_date,
            end_date,
            user_id,
            taking_times,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn medicine_name(&self) -> &str {
        &self.medicine_name
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn taking_times(&self) -> &[TakingTime] {
        &self.taking_times
    }

    /// Whether the schedule is live on `date`. Both bounds are inclusive.
    pub fn is_active(&self, date: NaiveDate) -> bool {
        if date < self.start_date {
            return false;
        }
        match self.end_date {
            Some(end) => date <= end,
            None => true,
        }
    }

    /// Doses falling in `[from, from + lookahead)`.
    ///
    /// Times already past on `from`'s day are projected onto the next day.
    /// The projected day is not checked against `end_date`, and results keep
    /// the order of `taking_times` rather than chronological order.
    pub fn next_takings(&self, from: NaiveDateTime, lookahead: Duration) -> Vec<Taking> {
        if !self.is_active(from.date()) {
            return Vec::new();
        }

        let Some(to) = from.checked_add_signed(lookahead) else {
            return Vec::new();
        };

        self.taking_times
            .iter()
            .map(|tt| tt.next_occurrence(from))
            .filter(|candidate| *candidate < to)
            .map(|candidate| Taking {
                medicine_name: self.medicine_name.clone(),
                taking_time: candidate,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tt(hour: u32, minute: u32) -> TakingTime {
        TakingTime::new(hour, minute).expect("valid taking time")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        day.and_hms_opt(hour, minute, 0).expect("valid time")
    }

    fn schedule_with(
        taking_times: Vec<TakingTime>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Schedule {
        let frequency = taking_times.len() as u32;
        Schedule::restore(
            1,
            "Aspirin".to_string(),
            frequency,
            0,
            start_date,
            end_date,
            1001,
            taking_times,
        )
    }

    #[test]
    fn test_calculate_taking_times_known_frequencies() {
        let cases = vec![
            (1, vec![tt(15, 0)]),
            (2, vec![tt(8, 0), tt(22, 0)]),
            (3, vec![tt(8, 0), tt(15, 0), tt(22, 0)]),
            (4, vec![tt(8, 0), tt(12, 45), tt(17, 15), tt(22, 0)]),
            (5, vec![tt(8, 0), tt(11, 30), tt(15, 0), tt(18, 30), tt(22, 0)]),
            (
                6,
                vec![tt(8, 0), tt(10, 45), tt(13, 30), tt(16, 30), tt(19, 15), tt(22, 0)],
            ),
        ];

        for (frequency, expected) in cases {
            let actual = calculate_taking_times(frequency).expect("valid frequency");
            assert_eq!(actual, expected, "frequency {}", frequency);
        }
    }

    #[test]
    fn test_calculate_taking_times_maximum_is_hourly() {
        let times = calculate_taking_times(15).expect("valid frequency");
        let expected: Vec<TakingTime> = (8..=22).map(|hour| tt(hour, 0)).collect();
        assert_eq!(times, expected);
    }

    #[test]
    fn test_calculate_taking_times_properties_for_every_frequency() {
        for frequency in MIN_FREQUENCY..=MAX_FREQUENCY {
            let times = calculate_taking_times(frequency).expect("valid frequency");

            assert_eq!(times.len(), frequency as usize);
            assert!(
                times.windows(2).all(|pair| pair[0] < pair[1]),
                "times for frequency {} are not strictly ascending: {:?}",
                frequency,
                times
            );
            assert!(times.iter().all(|t| t.minute() % 15 == 0));

            if frequency == 1 {
                assert_eq!(times[0], tt(15, 0));
            } else {
                assert_eq!(times[0], tt(8, 0));
                assert_eq!(times[times.len() - 1], tt(22, 0));
            }
        }
    }

    #[test]
    fn test_calculate_taking_times_rejects_out_of_range() {
        for frequency in [0, -1, 16, 100] {
            assert_eq!(
                calculate_taking_times(frequency),
                Err(ScheduleError::InvalidFrequency(frequency))
            );
        }
    }

    #[test]
    fn test_calculate_taking_times_is_deterministic() {
        for frequency in MIN_FREQUENCY..=MAX_FREQUENCY {
            assert_eq!(
                calculate_taking_times(frequency),
                calculate_taking_times(frequency)
            );
        }
    }

    #[test]
    fn test_round_to_quarter_hour_wraps_into_next_hour() {
        assert_eq!(round_to_quarter_hour(9, 53), tt(10, 0));
        assert_eq!(round_to_quarter_hour(9, 52), tt(9, 45));
        assert_eq!(round_to_quarter_hour(9, 7), tt(9, 0));
        assert_eq!(round_to_quarter_hour(9, 8), tt(9, 15));
        assert_eq!(round_to_quarter_hour(23, 59), tt(0, 0));
    }

    #[test]
    fn test_taking_time_display_and_parse() {
        assert_eq!(tt(8, 5).to_string(), "08:05");
        assert_eq!(TakingTime::parse("17:15"), Ok(tt(17, 15)));
        assert!(TakingTime::parse("24:00").is_err());
        assert!(TakingTime::parse("1715").is_err());
        assert!(TakingTime::parse("ab:00").is_err());
    }

    #[test]
    fn test_create_bounded_schedule() {
        let now = at(date(2025, 6, 14), 9, 30);
        let schedule = Schedule::create("Aspirin", 1, 7, 1001, now).expect("valid schedule");

        assert_eq!(schedule.id(), 0);
        assert_eq!(schedule.medicine_name(), "Aspirin");
        assert_eq!(schedule.start_date(), date(2025, 6, 14));
        assert_eq!(schedule.end_date(), Some(date(2025, 6, 21)));
        assert_eq!(schedule.taking_times(), &[tt(15, 0)]);
        assert_eq!(schedule.user_id(), 1001);
    }

    #[test]
    fn test_create_unbounded_schedule() {
        let now = at(date(2025, 6, 14), 9, 30);
        let schedule = Schedule::create("Vitamin D", 3, 0, 7, now).expect("valid schedule");

        assert_eq!(schedule.end_date(), None);
        assert_eq!(schedule.duration(), 0);
        assert_eq!(schedule.taking_times().len(), 3);
    }

    #[test]
    fn test_create_validation_errors() {
        let now = at(date(2025, 6, 14), 9, 30);

        assert_eq!(
            Schedule::create("Aspirin", 0, 7, 1001, now),
            Err(ScheduleError::InvalidFrequency(0))
        );
        assert_eq!(
            Schedule::create("Aspirin", 16, 7, 1001, now),
            Err(ScheduleError::InvalidFrequency(16))
        );
        // Frequency is reported before the other fields
        assert_eq!(
            Schedule::create("", 0, -1, 0, now),
            Err(ScheduleError::InvalidFrequency(0))
        );
        assert!(matches!(
            Schedule::create("   ", 1, 7, 1001, now),
            Err(ScheduleError::InvalidInput(_))
        ));
        assert!(matches!(
            Schedule::create("Aspirin", 1, -1, 1001, now),
            Err(ScheduleError::InvalidInput(_))
        ));
        assert!(matches!(
            Schedule::create("Aspirin", 1, 7, 0, now),
            Err(ScheduleError::InvalidInput(_))
        ));
        assert!(matches!(
            Schedule::create("Aspirin", 1, i64::MAX, 1001, now),
            Err(ScheduleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_is_active_boundaries() {
        let start = date(2025, 6, 1);
        let schedule = schedule_with(vec![tt(15, 0)], start, Some(date(2025, 6, 11)));

        assert!(!schedule.is_active(date(2025, 5, 31)));
        assert!(schedule.is_active(start));
        assert!(schedule.is_active(date(2025, 6, 11)));
        assert!(!schedule.is_active(date(2025, 6, 12)));
    }

    #[test]
    fn test_is_active_unbounded() {
        let schedule = schedule_with(vec![tt(15, 0)], date(2025, 6, 1), None);

        assert!(!schedule.is_active(date(2025, 5, 31)));
        assert!(schedule.is_active(date(2099, 1, 1)));
    }

    #[test]
    fn test_next_takings_within_window() {
        let today = date(2025, 6, 14);
        let schedule = schedule_with(vec![tt(15, 0)], today, Some(date(2025, 6, 21)));

        let takings = schedule.next_takings(at(today, 14, 0), Duration::hours(2));

        assert_eq!(
            takings,
            vec![Taking {
                medicine_name: "Aspirin".to_string(),
                taking_time: at(today, 15, 0),
            }]
        );
        assert_eq!(takings[0].format_time(), "15:00");
    }

    #[test]
    fn test_next_takings_none_in_window() {
        let today = date(2025, 6, 14);
        let schedule = schedule_with(vec![tt(8, 0), tt(22, 0)], today, None);

        let takings = schedule.next_takings(at(today, 14, 0), Duration::hours(2));

        assert!(takings.is_empty());
    }

    #[test]
    fn test_next_takings_not_started() {
        let today = date(2025, 6, 14);
        let schedule = schedule_with(vec![tt(15, 0)], date(2025, 6, 15), None);

        assert!(schedule
            .next_takings(at(today, 14, 0), Duration::days(3))
            .is_empty());
    }

    #[test]
    fn test_next_takings_already_ended() {
        let today = date(2025, 6, 14);
        let schedule = schedule_with(vec![tt(15, 0)], date(2025, 6, 1), Some(date(2025, 6, 13)));

        assert!(schedule
            .next_takings(at(today, 14, 0), Duration::hours(2))
            .is_empty());
    }

    #[test]
    fn test_next_takings_window_across_midnight_keeps_taking_time_order() {
        let today = date(2025, 6, 14);
        let tomorrow = date(2025, 6, 15);
        let schedule = schedule_with(vec![tt(8, 0), tt(22, 0)], today, None);

        let takings = schedule.next_takings(at(today, 21, 30), Duration::hours(12));

        let times: Vec<NaiveDateTime> = takings.iter().map(|t| t.taking_time).collect();
        assert_eq!(times, vec![at(tomorrow, 8, 0), at(today, 22, 0)]);
    }

    #[test]
    fn test_next_takings_rolled_day_is_not_checked_against_end_date() {
        // Active on the last day only; the rolled 08:00 lands after end_date
        // and is still reported.
        let end = date(2025, 6, 14);
        let schedule = schedule_with(vec![tt(8, 0), tt(22, 0)], date(2025, 6, 13), Some(end));

        let takings = schedule.next_takings(at(end, 23, 30), Duration::hours(10));

        assert_eq!(takings.len(), 1);
        assert_eq!(takings[0].taking_time, at(date(2025, 6, 15), 8, 0));
    }

    #[test]
    fn test_next_takings_zero_or_negative_lookahead() {
        let today = date(2025, 6, 14);
        let schedule = schedule_with(vec![tt(15, 0)], today, None);

        assert!(schedule
            .next_takings(at(today, 15, 0), Duration::zero())
            .is_empty());
        assert!(schedule
            .next_takings(at(today, 14, 0), Duration::hours(-2))
            .is_empty());
    }

    #[test]
    fn test_next_takings_with_overflowing_lookahead_is_empty() {
        let today = date(2025, 6, 14);
        let schedule = schedule_with(vec![tt(15, 0)], today, None);

        assert!(schedule
            .next_takings(at(today, 14, 0), Duration::days(365 * 1_000_000))
            .is_empty());
    }

    #[test]
    fn test_next_takings_includes_time_equal_to_from() {
        let today = date(2025, 6, 14);
        let schedule = schedule_with(vec![tt(15, 0)], today, None);

        let takings = schedule.next_takings(at(today, 15, 0), Duration::minutes(1));

        assert_eq!(takings.len(), 1);
        assert_eq!(takings[0].taking_time, at(today, 15, 0));
    }

    #[test]
    fn test_next_occurrence_rolls_past_times_to_tomorrow() {
        let today = date(2025, 6, 14);
        let from = today.and_hms_opt(15, 0, 30).expect("valid time");

        assert_eq!(tt(15, 0).next_occurrence(from), at(date(2025, 6, 15), 15, 0));
        assert_eq!(tt(15, 1).next_occurrence(from), at(today, 15, 1));
    }
}
