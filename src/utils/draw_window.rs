//! Weekly draw boundaries.
//!
//! A draw window runs from one Monday at the configured hour (05:00 by
//! default) in the lottery time zone to the next one. Boundaries are computed
//! on the local calendar so that the key of a given week is the same no
//! matter which week it is computed from, including across DST changes.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{AppError, AppResult};

pub const DRAW_PERIOD_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawWindow {
    /// Boundary of the week whose draw is (or was) due
    pub current_start: DateTime<Tz>,
    /// Boundary new registrations are filed under
    pub next_start: DateTime<Tz>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl DrawWindow {
    pub fn current_key(&self) -> i64 {
        self.current_start.timestamp()
    }

    pub fn next_key(&self) -> i64 {
        self.next_start.timestamp()
    }

    /// `dd.mm – dd.mm` for the week opened by the next draw.
    pub fn next_week_label(&self) -> String {
        let start = self.next_start.date_naive();
        let end = start + Duration::days(DRAW_PERIOD_DAYS - 1);
        format!("{} – {}", start.format("%d.%m"), end.format("%d.%m"))
    }

    /// Time left until the next draw, floored at zero.
    pub fn countdown(&self, now: DateTime<Utc>) -> Countdown {
        let remaining = (self.next_start.with_timezone(&Utc) - now)
            .num_seconds()
            .max(0);
        Countdown {
            days: remaining / 86_400,
            hours: (remaining % 86_400) / 3600,
            minutes: (remaining % 3600) / 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawScheduler {
    tz: Tz,
    draw_time_of_day: NaiveTime,
}

impl DrawScheduler {
    pub fn new(tz: Tz, draw_hour: u32) -> AppResult<Self> {
        let draw_time_of_day = NaiveTime::from_hms_opt(draw_hour, 0, 0).ok_or_else(|| {
            AppError::ConfigError(format!("draw hour must be within 0..=23, got {draw_hour}"))
        })?;
        Ok(Self {
            tz,
            draw_time_of_day,
        })
    }

    pub fn from_config(timezone: &str, draw_hour: u32) -> AppResult<Self> {
        let tz: Tz = timezone
            .parse()
            .map_err(|e| AppError::ConfigError(format!("invalid timezone {timezone}: {e}")))?;
        Self::new(tz, draw_hour)
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }

    pub fn compute_draw_window(&self, now: DateTime<Utc>) -> DrawWindow {
        let local = self.to_local(now);
        let days_since_monday = local.weekday().num_days_from_monday() as i64;
        let monday = local.date_naive() - Duration::days(days_since_monday);
        let monday_draw = self.boundary(monday);

        if local < monday_draw {
            DrawWindow {
                current_start: self.boundary(monday - Duration::days(DRAW_PERIOD_DAYS)),
                next_start: monday_draw,
            }
        } else {
            DrawWindow {
                current_start: monday_draw,
                next_start: self.boundary(monday + Duration::days(DRAW_PERIOD_DAYS)),
            }
        }
    }

    fn boundary(&self, date: NaiveDate) -> DateTime<Tz> {
        let naive = date.and_time(self.draw_time_of_day);
        // a boundary inside a DST gap moves one hour later
        self.tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                self.tz
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
            })
            .unwrap_or_else(|| self.tz.from_utc_datetime(&naive))
    }
}
