//! Daily period time table and derived booking status

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    config::BookingConfig,
    error::{AppError, AppResult},
    models::booking::BookingStatus,
};

/// Number of bookable periods per school day
pub const PERIOD_COUNT: usize = 6;

/// Default period windows (period 1 through 6)
const DEFAULT_PERIODS: [(&str, &str); PERIOD_COUNT] = [
    ("08:30", "09:30"),
    ("09:30", "10:30"),
    ("10:30", "11:30"),
    ("12:30", "13:30"),
    ("13:30", "14:30"),
    ("14:30", "15:30"),
];

/// A single period's wall-clock window
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub struct PeriodWindow {
    /// Period number (1-based)
    pub period: i16,
    #[schema(value_type = String, example = "08:30:00")]
    pub start: NaiveTime,
    #[schema(value_type = String, example = "09:30:00")]
    pub end: NaiveTime,
}

/// The six fixed daily time slots used to derive booking status
#[derive(Debug, Clone)]
pub struct PeriodSchedule {
    windows: [PeriodWindow; PERIOD_COUNT],
}

impl PeriodSchedule {
    /// Build the schedule from configuration, falling back to the built-in
    /// table when no periods are configured. A partially configured table
    /// (wrong count, unparseable times, end before start) is rejected.
    pub fn from_config(config: &BookingConfig) -> AppResult<Self> {
        if config.periods.is_empty() {
            return Ok(Self::default());
        }

        if config.periods.len() != PERIOD_COUNT {
            return Err(AppError::Validation(format!(
                "Expected {} configured periods, got {}",
                PERIOD_COUNT,
                config.periods.len()
            )));
        }

        let mut windows = Vec::with_capacity(PERIOD_COUNT);
        for (i, p) in config.periods.iter().enumerate() {
            let start = parse_time(&p.start)?;
            let end = parse_time(&p.end)?;
            if end <= start {
                return Err(AppError::Validation(format!(
                    "Period {} ends before it starts",
                    i + 1
                )));
            }
            windows.push(PeriodWindow {
                period: (i + 1) as i16,
                start,
                end,
            });
        }

        Ok(Self {
            windows: windows.try_into().map_err(|_| {
                AppError::Internal("Period table construction failed".to_string())
            })?,
        })
    }

    /// Get the window for a period number (1-based)
    pub fn window(&self, period: i16) -> AppResult<PeriodWindow> {
        if !(1..=PERIOD_COUNT as i16).contains(&period) {
            return Err(AppError::Validation(format!(
                "Period must be between 1 and {}",
                PERIOD_COUNT
            )));
        }
        Ok(self.windows[(period - 1) as usize])
    }

    /// All windows, in period order
    pub fn windows(&self) -> &[PeriodWindow] {
        &self.windows
    }

    /// Derive the effective status of a booking at a given instant.
    ///
    /// Terminal statuses are sticky and returned unchanged. For live
    /// bookings the stored status is ignored and the status is computed
    /// from the booking date, the period window and `now`.
    pub fn derive_status(
        &self,
        stored: BookingStatus,
        date: NaiveDate,
        period: i16,
        now: NaiveDateTime,
    ) -> AppResult<BookingStatus> {
        if stored.is_terminal() {
            return Ok(stored);
        }

        let window = self.window(period)?;
        let today = now.date();

        let status = if today < date {
            BookingStatus::Booked
        } else if today > date {
            BookingStatus::PendingReturn
        } else if now.time() < window.start {
            BookingStatus::Booked
        } else if now.time() <= window.end {
            BookingStatus::InUse
        } else {
            BookingStatus::PendingReturn
        };

        Ok(status)
    }
}

impl Default for PeriodSchedule {
    fn default() -> Self {
        let windows = DEFAULT_PERIODS.map(|(start, end)| PeriodWindow {
            period: 0,
            start: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
        });
        let mut windows = windows;
        for (i, w) in windows.iter_mut().enumerate() {
            w.period = (i + 1) as i16;
        }
        Self { windows }
    }
}

fn parse_time(s: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("Invalid period time: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PeriodConfig;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M")
            .unwrap()
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn default_schedule_has_six_ordered_windows() {
        let schedule = PeriodSchedule::default();
        assert_eq!(schedule.windows().len(), PERIOD_COUNT);
        for (i, w) in schedule.windows().iter().enumerate() {
            assert_eq!(w.period, (i + 1) as i16);
            assert!(w.start < w.end);
        }
    }

    #[test]
    fn before_period_start_is_booked() {
        let schedule = PeriodSchedule::default();
        let status = schedule
            .derive_status(
                BookingStatus::Booked,
                day("2025-03-10"),
                2,
                at("2025-03-10", "08:00"),
            )
            .unwrap();
        assert_eq!(status, BookingStatus::Booked);
    }

    #[test]
    fn before_booking_date_is_booked() {
        let schedule = PeriodSchedule::default();
        let status = schedule
            .derive_status(
                BookingStatus::Booked,
                day("2025-03-11"),
                1,
                at("2025-03-10", "16:00"),
            )
            .unwrap();
        assert_eq!(status, BookingStatus::Booked);
    }

    #[test]
    fn inside_window_is_in_use() {
        let schedule = PeriodSchedule::default();
        let status = schedule
            .derive_status(
                BookingStatus::Booked,
                day("2025-03-10"),
                2,
                at("2025-03-10", "10:00"),
            )
            .unwrap();
        assert_eq!(status, BookingStatus::InUse);
    }

    #[test]
    fn window_boundaries_are_inclusive_of_start_and_end() {
        let schedule = PeriodSchedule::default();
        let date = day("2025-03-10");

        let at_start = schedule
            .derive_status(BookingStatus::Booked, date, 1, at("2025-03-10", "08:30"))
            .unwrap();
        assert_eq!(at_start, BookingStatus::InUse);

        let at_end = schedule
            .derive_status(BookingStatus::Booked, date, 1, at("2025-03-10", "09:30"))
            .unwrap();
        assert_eq!(at_end, BookingStatus::InUse);
    }

    #[test]
    fn after_window_is_pending_return() {
        let schedule = PeriodSchedule::default();
        let status = schedule
            .derive_status(
                BookingStatus::Booked,
                day("2025-03-10"),
                1,
                at("2025-03-10", "09:31"),
            )
            .unwrap();
        assert_eq!(status, BookingStatus::PendingReturn);
    }

    #[test]
    fn past_booking_date_is_pending_return() {
        let schedule = PeriodSchedule::default();
        let status = schedule
            .derive_status(
                BookingStatus::Booked,
                day("2025-03-10"),
                6,
                at("2025-03-12", "07:00"),
            )
            .unwrap();
        assert_eq!(status, BookingStatus::PendingReturn);
    }

    #[test]
    fn terminal_statuses_are_sticky() {
        let schedule = PeriodSchedule::default();
        let date = day("2025-03-10");
        // In the middle of the window, a returned booking stays returned.
        let returned = schedule
            .derive_status(BookingStatus::Returned, date, 2, at("2025-03-10", "10:00"))
            .unwrap();
        assert_eq!(returned, BookingStatus::Returned);

        let not_used = schedule
            .derive_status(BookingStatus::NotUsed, date, 2, at("2025-03-10", "10:00"))
            .unwrap();
        assert_eq!(not_used, BookingStatus::NotUsed);
    }

    #[test]
    fn invalid_period_is_rejected() {
        let schedule = PeriodSchedule::default();
        let result = schedule.derive_status(
            BookingStatus::Booked,
            day("2025-03-10"),
            7,
            at("2025-03-10", "10:00"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn config_with_wrong_period_count_is_rejected() {
        let config = BookingConfig {
            periods: vec![PeriodConfig {
                start: "08:00".to_string(),
                end: "09:00".to_string(),
            }],
        };
        assert!(PeriodSchedule::from_config(&config).is_err());
    }

    #[test]
    fn config_with_inverted_window_is_rejected() {
        let mut periods: Vec<PeriodConfig> = DEFAULT_PERIODS
            .iter()
            .map(|(s, e)| PeriodConfig {
                start: s.to_string(),
                end: e.to_string(),
            })
            .collect();
        periods[3] = PeriodConfig {
            start: "13:30".to_string(),
            end: "12:30".to_string(),
        };
        let config = BookingConfig { periods };
        assert!(PeriodSchedule::from_config(&config).is_err());
    }

    #[test]
    fn configured_schedule_overrides_defaults() {
        let periods: Vec<PeriodConfig> = (0..PERIOD_COUNT)
            .map(|i| PeriodConfig {
                start: format!("{:02}:00", 8 + i),
                end: format!("{:02}:50", 8 + i),
            })
            .collect();
        let schedule = PeriodSchedule::from_config(&BookingConfig { periods }).unwrap();
        let w = schedule.window(3).unwrap();
        assert_eq!(w.start, NaiveTime::parse_from_str("10:00", "%H:%M").unwrap());
        assert_eq!(w.end, NaiveTime::parse_from_str("10:50", "%H:%M").unwrap());
    }
}
