use crate::config::LotteryConfig;
use crate::entities::{
    WinnerCategory, draw_run_entity as draw_runs, registration_entity as registrations,
    winner_entity as winners,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    ClearRegistrationsResponse, DrawOutcome, DrawWindowResponse, DummyWinnersResponse,
    LotteryOverviewResponse, RegistrationRequest, RegistrationResponse, WinnerResponse,
    WinnersResponse,
};
use crate::utils::{
    DrawScheduler, DrawWindow, EntrantShuffler, normalize_field, split_draw, validate_field_len,
    validate_student_id,
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use std::sync::Arc;

const BUSY_RETRY_ATTEMPTS: u32 = 3;
const BUSY_RETRY_BASE_DELAY_MS: u64 = 50;

const DUMMY_WINNERS: [(&str, &str, &str); 3] = [
    ("TEST01", "Alice", "Smith"),
    ("TEST02", "Bob", "Brown"),
    ("TEST03", "Carol", "Johnson"),
];

const DUMMY_RESERVES: [(&str, &str, &str); 2] = [("TEST11", "Dave", "Lee"), ("TEST12", "Eve", "White")];

fn slot_count(name: &str, value: usize) -> AppResult<i32> {
    i32::try_from(value)
        .map_err(|_| AppError::ConfigError(format!("{name} must fit in i32, got {value}")))
}

#[derive(Clone)]
pub struct LotteryService {
    pool: DatabaseConnection,
    scheduler: DrawScheduler,
    shuffler: Arc<dyn EntrantShuffler>,
    winner_slots: usize,
    reserve_slots: usize,
}

impl LotteryService {
    pub fn new(
        pool: DatabaseConnection,
        config: &LotteryConfig,
        shuffler: Arc<dyn EntrantShuffler>,
    ) -> AppResult<Self> {
        let scheduler = DrawScheduler::from_config(&config.timezone, config.draw_hour)?;
        // draw_runs stores the counts as INTEGER
        slot_count("winner_slots", config.winner_slots)?;
        slot_count("reserve_slots", config.reserve_slots)?;
        Ok(Self {
            pool,
            scheduler,
            shuffler,
            winner_slots: config.winner_slots,
            reserve_slots: config.reserve_slots,
        })
    }

    pub fn draw_window(&self, now: DateTime<Utc>) -> DrawWindow {
        self.scheduler.compute_draw_window(now)
    }

    /// Run the draw for the current window if it has not happened yet.
    ///
    /// A no-op when the week was already drawn or nobody registered. Lock
    /// contention on the database is retried a few times with doubling
    /// backoff before it is reported.
    pub async fn run_draw_if_due(&self, now: DateTime<Utc>) -> AppResult<DrawOutcome> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_run_draw(now).await {
                Err(e) if e.is_storage_busy() && attempt < BUSY_RETRY_ATTEMPTS => {
                    let delay = BUSY_RETRY_BASE_DELAY_MS << (attempt - 1);
                    log::warn!("Draw storage busy (attempt {attempt}), retrying in {delay}ms");
                    tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                }
                other => return other,
            }
        }
    }

    /// 1. count pool and existing results for the current window
    /// 2. shuffle the pool, split into winners / reserves
    /// 3. claim the week in draw_runs (unique draw_time)
    /// 4. write results, consume the pool
    ///
    /// Everything happens in one transaction; an early return rolls back.
    async fn try_run_draw(&self, now: DateTime<Utc>) -> AppResult<DrawOutcome> {
        let window = self.draw_window(now);
        let draw_time = window.current_key();

        let txn = self.pool.begin().await?;

        let registration_count = registrations::Entity::find()
            .filter(registrations::Column::DrawTime.eq(draw_time))
            .count(&txn)
            .await?;
        let winner_count = winners::Entity::find()
            .filter(winners::Column::DrawTime.eq(draw_time))
            .count(&txn)
            .await?;

        if now < window.current_start.with_timezone(&Utc) {
            return Ok(DrawOutcome::NotOpen { draw_time });
        }
        if winner_count > 0 {
            return Ok(DrawOutcome::AlreadyDrawn { draw_time });
        }
        if registration_count == 0 {
            return Ok(DrawOutcome::NoRegistrants { draw_time });
        }

        let entrants = registrations::Entity::find()
            .filter(registrations::Column::DrawTime.eq(draw_time))
            .order_by_asc(registrations::Column::Id)
            .all(&txn)
            .await?;

        let (drawn_winners, drawn_reserves) = split_draw(
            entrants,
            self.shuffler.as_ref(),
            self.winner_slots,
            self.reserve_slots,
        );

        let claimed = Self::claim_draw(
            &txn,
            draw_time,
            drawn_winners.len(),
            drawn_reserves.len(),
            now,
            false,
        )
        .await?;
        if !claimed {
            log::info!("Draw for {draw_time} already claimed by another run");
            return Ok(DrawOutcome::AlreadyDrawn { draw_time });
        }

        let records: Vec<winners::ActiveModel> = drawn_winners
            .iter()
            .map(|r| (r, WinnerCategory::Winner))
            .chain(drawn_reserves.iter().map(|r| (r, WinnerCategory::Reserve)))
            .map(|(r, category)| winners::ActiveModel {
                student_id: Set(r.student_id.clone()),
                first_name: Set(r.first_name.clone()),
                last_name: Set(r.last_name.clone()),
                draw_time: Set(draw_time),
                category: Set(category),
                ..Default::default()
            })
            .collect();
        winners::Entity::insert_many(records)
            .exec_without_returning(&txn)
            .await?;

        let consumed = registrations::Entity::delete_many()
            .filter(registrations::Column::DrawTime.eq(draw_time))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        log::info!(
            "Weekly draw executed for {}: {} winners, {} reserves, {} registrations consumed",
            window.current_start.to_rfc3339(),
            drawn_winners.len(),
            drawn_reserves.len(),
            consumed.rows_affected
        );

        Ok(DrawOutcome::Executed {
            draw_time,
            winners: drawn_winners.len(),
            reserves: drawn_reserves.len(),
        })
    }

    /// Insert the draw_runs marker for `draw_time`. Returns false when the
    /// week was already claimed and `overwrite` is not set.
    async fn claim_draw(
        txn: &DatabaseTransaction,
        draw_time: i64,
        winner_count: usize,
        reserve_count: usize,
        executed_at: DateTime<Utc>,
        overwrite: bool,
    ) -> AppResult<bool> {
        let winner_count = slot_count("winner_count", winner_count)?;
        let reserve_count = slot_count("reserve_count", reserve_count)?;

        let mut on_conflict = OnConflict::column(draw_runs::Column::DrawTime);
        if overwrite {
            on_conflict.update_columns([
                draw_runs::Column::WinnerCount,
                draw_runs::Column::ReserveCount,
                draw_runs::Column::ExecutedAt,
            ]);
        } else {
            on_conflict.do_nothing();
        }

        let insert = Query::insert()
            .into_table(draw_runs::Entity)
            .columns([
                draw_runs::Column::DrawTime,
                draw_runs::Column::WinnerCount,
                draw_runs::Column::ReserveCount,
                draw_runs::Column::ExecutedAt,
            ])
            .values_panic([
                draw_time.into(),
                winner_count.into(),
                reserve_count.into(),
                executed_at.into(),
            ])
            .on_conflict(on_conflict.to_owned())
            .to_owned();

        let stmt = txn.get_database_backend().build(&insert);
        let res = txn.execute(stmt).await?;
        Ok(res.rows_affected() > 0)
    }

    /// Sign a student up for the next draw.
    pub async fn register(
        &self,
        request: &RegistrationRequest,
        now: DateTime<Utc>,
    ) -> AppResult<RegistrationResponse> {
        validate_student_id(&request.student_id)?;
        let student_id = normalize_field(&request.student_id);
        let first_name = normalize_field(&request.first_name);
        let last_name = normalize_field(&request.last_name);
        validate_field_len("student_id", &student_id)?;
        validate_field_len("first_name", &first_name)?;
        validate_field_len("last_name", &last_name)?;

        let draw_time = self.draw_window(now).next_key();
        let already = || {
            AppError::AlreadyRegistered(format!(
                "Student ID {student_id} is already registered for next week."
            ))
        };

        let existing = registrations::Entity::find()
            .filter(registrations::Column::StudentId.eq(student_id.as_str()))
            .filter(registrations::Column::DrawTime.eq(draw_time))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(already());
        }

        let inserted = registrations::ActiveModel {
            student_id: Set(student_id.clone()),
            first_name: Set(first_name),
            last_name: Set(last_name),
            submitted_at: Set(now),
            draw_time: Set(draw_time),
            ..Default::default()
        }
        .insert(&self.pool)
        .await;

        match inserted {
            Ok(model) => {
                log::info!("Registered {} for draw {}", model.student_id, draw_time);
                Ok(RegistrationResponse::from_model(
                    model,
                    self.scheduler.timezone(),
                ))
            }
            // lost a race against an identical submission
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(already())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn winners_for(
        &self,
        draw_time: i64,
        category: WinnerCategory,
    ) -> AppResult<Vec<WinnerResponse>> {
        let list = winners::Entity::find()
            .filter(winners::Column::DrawTime.eq(draw_time))
            .filter(winners::Column::Category.eq(category))
            .order_by_asc(winners::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn results_for(&self, draw_time: i64) -> AppResult<WinnersResponse> {
        Ok(WinnersResponse {
            draw_time,
            winners: self.winners_for(draw_time, WinnerCategory::Winner).await?,
            reserves: self.winners_for(draw_time, WinnerCategory::Reserve).await?,
        })
    }

    /// Pending registrations of a window, newest first.
    pub async fn registrations_for(&self, draw_time: i64) -> AppResult<Vec<RegistrationResponse>> {
        let tz = self.scheduler.timezone();
        let list = registrations::Entity::find()
            .filter(registrations::Column::DrawTime.eq(draw_time))
            .order_by_desc(registrations::Column::SubmittedAt)
            .order_by_desc(registrations::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list
            .into_iter()
            .map(|m| RegistrationResponse::from_model(m, tz))
            .collect())
    }

    /// Page-load entry point: run the draw if due, then gather what the
    /// weekly management page shows.
    pub async fn overview(&self, now: DateTime<Utc>) -> AppResult<LotteryOverviewResponse> {
        let draw = self.run_draw_if_due(now).await?;
        let window = self.draw_window(now);

        let results = self.results_for(window.current_key()).await?;
        let registrations = self.registrations_for(window.next_key()).await?;

        Ok(LotteryOverviewResponse {
            window: DrawWindowResponse::from(&window),
            draw,
            winners: results.winners,
            reserves: results.reserves,
            countdown: window.countdown(now).into(),
            registered_count: registrations.len(),
            registrations,
        })
    }

    /// Operator action: drop every registration for the next draw.
    pub async fn clear_registrations(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<ClearRegistrationsResponse> {
        let draw_time = self.draw_window(now).next_key();
        let res = registrations::Entity::delete_many()
            .filter(registrations::Column::DrawTime.eq(draw_time))
            .exec(&self.pool)
            .await?;
        log::info!(
            "Cleared {} registrations for draw {}",
            res.rows_affected,
            draw_time
        );
        Ok(ClearRegistrationsResponse {
            draw_time,
            deleted: res.rows_affected,
        })
    }

    /// Operator testing override: replace the current window's results with
    /// a fixed set of dummy entries and mark the week as drawn.
    pub async fn populate_dummy_winners(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<DummyWinnersResponse> {
        let draw_time = self.draw_window(now).current_key();
        let txn = self.pool.begin().await?;

        winners::Entity::delete_many()
            .filter(winners::Column::DrawTime.eq(draw_time))
            .exec(&txn)
            .await?;

        let records: Vec<winners::ActiveModel> = DUMMY_WINNERS
            .iter()
            .map(|entry| (entry, WinnerCategory::Winner))
            .chain(
                DUMMY_RESERVES
                    .iter()
                    .map(|entry| (entry, WinnerCategory::Reserve)),
            )
            .map(|((sid, first, last), category)| winners::ActiveModel {
                student_id: Set(sid.to_string()),
                first_name: Set(first.to_string()),
                last_name: Set(last.to_string()),
                draw_time: Set(draw_time),
                category: Set(category),
                ..Default::default()
            })
            .collect();
        winners::Entity::insert_many(records)
            .exec_without_returning(&txn)
            .await?;

        Self::claim_draw(
            &txn,
            draw_time,
            DUMMY_WINNERS.len(),
            DUMMY_RESERVES.len(),
            now,
            true,
        )
        .await?;

        txn.commit().await?;
        log::info!("Dummy winners populated for draw {draw_time}");

        Ok(DummyWinnersResponse {
            draw_time,
            winners: DUMMY_WINNERS.len(),
            reserves: DUMMY_RESERVES.len(),
        })
    }
}
