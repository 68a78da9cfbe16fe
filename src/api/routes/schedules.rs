use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::state::{AppState, StoredSchedule};
use crate::api::{ApiError, Pagination, PaginationMeta};
use crate::engine::{self, ScheduleBuilder};
use crate::models::{
    PerformanceRecord, Player, Roster, Round, Schedule, ScheduleId, SchedulingError,
};

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    /// Player names
    #[serde(default)]
    pub players: Option<Vec<String>>,

    /// Comma-separated alternative to `players`
    #[serde(default)]
    pub roster: Option<String>,

    pub rounds: i64,

    /// Sampling seed; random when omitted
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PlayerGames {
    pub player: Player,
    pub games: u32,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub fingerprint: String,
    #[serde(flatten)]
    pub schedule: Schedule,
    pub games_per_player: Vec<PlayerGames>,
}

impl ScheduleResponse {
    fn new(id: &ScheduleId, stored: &StoredSchedule) -> Self {
        Self {
            id: id.to_string(),
            created_at: stored.created_at.to_rfc3339(),
            updated_at: stored.updated_at.to_rfc3339(),
            fingerprint: stored.schedule.fingerprint().to_string(),
            schedule: stored.schedule.clone(),
            games_per_player: stored
                .schedule
                .games_per_player()
                .into_iter()
                .map(|(player, games)| PlayerGames { player, games })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScheduleSummary {
    pub id: String,
    pub created_at: String,
    pub player_count: usize,
    pub round_count: usize,
    pub decided: usize,
    pub fingerprint: String,
}

#[derive(Debug, Serialize)]
pub struct ScheduleListResponse {
    pub schedules: Vec<ScheduleSummary>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Deserialize)]
pub struct ListSchedulesParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SetWinnerRequest {
    pub winner: i64,
}

#[derive(Debug, Serialize)]
pub struct SetWinnerResponse {
    pub revision: u64,
    pub round: Round,
}

#[derive(Debug, Serialize)]
pub struct PerformanceResponse {
    pub revision: u64,
    pub decided: usize,
    pub total_rounds: usize,
    pub records: Vec<PerformanceRecord>,
}

fn build_roster(req: &CreateScheduleRequest, min_players: usize) -> Result<Roster, ApiError> {
    match (&req.players, &req.roster) {
        (Some(players), _) => Ok(Roster::with_minimum(players.iter().cloned(), min_players)?),
        (None, Some(text)) => Ok(Roster::parse_with_minimum(text, min_players)?),
        (None, None) => Err(ApiError::BadRequest(
            "either `players` or `roster` is required".to_string(),
        )),
    }
}

pub async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleResponse>), ApiError> {
    let rounds = engine::round_count(req.rounds)?;
    let roster = build_roster(&req, state.scheduler.min_roster_size)?;
    let seed = req.seed.unwrap_or_else(rand::random);

    let builder = ScheduleBuilder::new(state.scheduler.as_ref().clone());
    let schedule = builder.build_seeded(roster, rounds, seed)?;

    let id = ScheduleId::generate();
    let stored = StoredSchedule::new(schedule);
    let response = ScheduleResponse::new(&id, &stored);
    tracing::info!(id = %id, seed, rounds, "Schedule created");

    state.schedules.write().await.insert(id, stored);
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list_schedules(
    State(state): State<AppState>,
    Query(params): Query<ListSchedulesParams>,
) -> Result<Json<ScheduleListResponse>, ApiError> {
    let schedules = state.schedules.read().await;

    let mut entries: Vec<(&ScheduleId, &StoredSchedule)> = schedules.iter().collect();
    entries.sort_by(|a, b| {
        b.1.created_at
            .cmp(&a.1.created_at)
            .then_with(|| a.0.as_str().cmp(b.0.as_str()))
    });

    let pagination = Pagination::new(params.page, params.page_size);
    let meta = PaginationMeta::new(&pagination, entries.len() as u32);

    let summaries = entries
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.page_size as usize)
        .map(|(id, stored)| ScheduleSummary {
            id: id.to_string(),
            created_at: stored.created_at.to_rfc3339(),
            player_count: stored.schedule.roster().len(),
            round_count: stored.schedule.len(),
            decided: stored.schedule.decided(),
            fingerprint: stored.schedule.fingerprint().to_string(),
        })
        .collect();

    Ok(Json(ScheduleListResponse {
        schedules: summaries,
        pagination: meta,
    }))
}

pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let id = ScheduleId::from(id);
    let schedules = state.schedules.read().await;
    let stored = schedules
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("schedule {}", id)))?;

    Ok(Json(ScheduleResponse::new(&id, stored)))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = ScheduleId::from(id);
    match state.schedules.write().await.remove(&id) {
        Some(_) => {
            tracing::info!(id = %id, "Schedule discarded");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound(format!("schedule {}", id))),
    }
}

pub async fn set_winner(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, i64)>,
    Json(req): Json<SetWinnerRequest>,
) -> Result<Json<SetWinnerResponse>, ApiError> {
    let id = ScheduleId::from(id);
    let mut schedules = state.schedules.write().await;
    let stored = schedules
        .get_mut(&id)
        .ok_or_else(|| ApiError::NotFound(format!("schedule {}", id)))?;

    let round_index = usize::try_from(index).map_err(|_| {
        SchedulingError::InvalidWinner(format!("round index {} out of range", index))
    })?;
    let winner = u8::try_from(req.winner).map_err(|_| {
        SchedulingError::InvalidWinner(format!("winner must be 1 or 2, got {}", req.winner))
    })?;

    engine::set_winner(&mut stored.schedule, round_index, winner)?;
    stored.updated_at = Utc::now();

    let round = stored.schedule.rounds()[round_index].clone();
    Ok(Json(SetWinnerResponse {
        revision: stored.schedule.revision(),
        round,
    }))
}

pub async fn performance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PerformanceResponse>, ApiError> {
    let id = ScheduleId::from(id);
    let schedules = state.schedules.read().await;
    let stored = schedules
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("schedule {}", id)))?;

    let table = engine::compute_performance(&stored.schedule);
    Ok(Json(PerformanceResponse {
        revision: table.revision,
        decided: stored.schedule.decided(),
        total_rounds: stored.schedule.len(),
        records: table.records,
    }))
}
