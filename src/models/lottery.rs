use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::{
    WinnerCategory, registration_entity as registrations, winner_entity as winners,
};
use crate::utils::{Countdown, DrawWindow};

/// Registration form
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RegistrationRequest {
    #[schema(example = "S12345")]
    pub student_id: String,
    #[schema(example = "Ana")]
    pub first_name: String,
    #[schema(example = "Popescu")]
    pub last_name: String,
}

/// Pending registration as shown in the "Registered for Next Week" list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub id: i64,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub submitted_at: DateTime<Utc>,
    /// Submission time in the lottery time zone, e.g. `Wednesday, 12.03.2025 10:00`
    pub submitted_at_local: String,
    pub draw_time: i64,
}

impl RegistrationResponse {
    pub fn from_model(m: registrations::Model, tz: Tz) -> Self {
        let submitted_at_local = m
            .submitted_at
            .with_timezone(&tz)
            .format("%A, %d.%m.%Y %H:%M")
            .to_string();
        RegistrationResponse {
            id: m.id,
            student_id: m.student_id,
            first_name: m.first_name,
            last_name: m.last_name,
            submitted_at: m.submitted_at,
            submitted_at_local,
            draw_time: m.draw_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct WinnerResponse {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub draw_time: i64,
    pub category: WinnerCategory,
}

impl From<winners::Model> for WinnerResponse {
    fn from(m: winners::Model) -> Self {
        WinnerResponse {
            student_id: m.student_id,
            first_name: m.first_name,
            last_name: m.last_name,
            draw_time: m.draw_time,
            category: m.category,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WinnersQuery {
    /// Draw boundary (Unix seconds); defaults to the current window
    pub draw_time: Option<i64>,
}

/// Free access list and reserve list of one draw
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WinnersResponse {
    pub draw_time: i64,
    pub winners: Vec<WinnerResponse>,
    pub reserves: Vec<WinnerResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DrawWindowResponse {
    pub timezone: String,
    pub current_draw_start: String,
    pub next_draw_start: String,
    pub current_draw_time: i64,
    pub next_draw_time: i64,
    /// `dd.mm – dd.mm`
    pub next_week_label: String,
}

impl From<&DrawWindow> for DrawWindowResponse {
    fn from(w: &DrawWindow) -> Self {
        DrawWindowResponse {
            timezone: w.current_start.timezone().name().to_string(),
            current_draw_start: w.current_start.to_rfc3339(),
            next_draw_start: w.next_start.to_rfc3339(),
            current_draw_time: w.current_key(),
            next_draw_time: w.next_key(),
            next_week_label: w.next_week_label(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct CountdownResponse {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl From<Countdown> for CountdownResponse {
    fn from(c: Countdown) -> Self {
        CountdownResponse {
            days: c.days,
            hours: c.hours,
            minutes: c.minutes,
        }
    }
}

/// What a call to the draw executor did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DrawOutcome {
    Executed {
        draw_time: i64,
        winners: usize,
        reserves: usize,
    },
    AlreadyDrawn {
        draw_time: i64,
    },
    NoRegistrants {
        draw_time: i64,
    },
    NotOpen {
        draw_time: i64,
    },
}

/// Everything the weekly management page shows
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LotteryOverviewResponse {
    pub window: DrawWindowResponse,
    pub draw: DrawOutcome,
    pub winners: Vec<WinnerResponse>,
    pub reserves: Vec<WinnerResponse>,
    pub countdown: CountdownResponse,
    pub registered_count: usize,
    pub registrations: Vec<RegistrationResponse>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClearRegistrationsResponse {
    pub draw_time: i64,
    pub deleted: u64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DummyWinnersResponse {
    pub draw_time: i64,
    pub winners: usize,
    pub reserves: usize,
}
