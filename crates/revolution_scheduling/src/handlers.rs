// File: crates/revolution_scheduling/src/handlers.rs
use crate::blackout::{BlackoutCalendar, BlackoutError};
use crate::board::{BoardError, BoardNotice, LaneCounts, Lane, Lanes, MoveOutcome, StatusBoard};
use crate::context::ScheduleContext;
use crate::datetime::{earliest_selectable, to_local_string, TimeInput};
use crate::form::{AppointmentForm, FieldError, FormField, SubmitError};
use crate::session::StaticSession;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use revolution_common::models::{Appointment, BlackoutDay, ServiceType};
use revolution_common::services::SharedBackend;
use revolution_common::{conflict, not_found, validation_error, ErrorKind, RevolutionError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Header carrying the signed-in client's id.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

// Shared state for the scheduling routes
pub struct SchedulingState {
    pub schedule: Arc<ScheduleContext>,
    pub backend: SharedBackend,
    pub board: StatusBoard,
    pub blackout: BlackoutCalendar,
}

impl SchedulingState {
    pub fn new(backend: SharedBackend, schedule: ScheduleContext) -> Self {
        let tz = schedule.tz;
        Self {
            schedule: Arc::new(schedule),
            board: StatusBoard::new(backend.clone()),
            blackout: BlackoutCalendar::new(backend.clone(), tz),
            backend,
        }
    }
}

impl From<BoardError> for RevolutionError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::UnknownAppointment(_) => not_found(err),
            BoardError::NotOnBoard(_) => conflict(err),
            BoardError::Load(backend) => RevolutionError::BackendError(backend),
        }
    }
}

impl From<BlackoutError> for RevolutionError {
    fn from(err: BlackoutError) -> Self {
        match err {
            BlackoutError::DuplicateDay(_) => conflict(err),
            BlackoutError::InvalidDate(_) => validation_error(err),
            BlackoutError::NotFound(_) => not_found(err),
            BlackoutError::Backend(backend) => RevolutionError::BackendError(backend),
        }
    }
}

// --- Request / response bodies ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarliestSlotResponse {
    /// `YYYY-MM-DDTHH:MM`, local time
    pub earliest: String,
    pub step_minutes: u32,
    pub timezone: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRequest {
    pub start_time: TimeInput,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    /// The input in canonical form, empty when it could not be read.
    pub start_time: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorKind>,
}

/// Form values for a create or an edit. Absent fields keep the draft's value.
///
/// There is no status field: new appointments start as scheduled, edits keep the
/// stored status, and only the board moves cards between statuses.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[serde(default)]
    pub start_time: Option<TimeInput>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub vehicle_ref: Option<String>,
    /// Used only when no client id header is present.
    #[serde(default)]
    pub client_ref: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub appointment: Appointment,
    /// How long to show the confirmation before navigating away.
    pub redirect_after_ms: u64,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub errors: BTreeMap<FormField, FieldError>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub lanes: Lanes,
    pub counts: LaneCounts,
    pub notices: Vec<BoardNotice>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct MoveRequest {
    pub lane: Lane,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct MoveResponse {
    pub outcome: MoveOutcome,
    pub counts: LaneCounts,
    pub notices: Vec<BoardNotice>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlackoutDayRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date", example = "2025-12-25"))]
    pub date: NaiveDate,
    #[serde(default)]
    pub registered_by: Option<String>,
}

// --- Handlers ---

/// Earliest start the booking form should offer.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments/earliest-slot",
    responses(
        (status = 200, description = "Current time rounded up to the slot grid", body = EarliestSlotResponse)
    ),
    tag = "Appointments"
))]
pub async fn earliest_slot_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Json<EarliestSlotResponse> {
    let schedule = &state.schedule;
    let earliest = earliest_selectable(Utc::now(), schedule.tz, schedule.step_minutes);
    Json(EarliestSlotResponse {
        earliest: to_local_string(Some(earliest)),
        step_minutes: schedule.step_minutes,
        timezone: schedule.tz.name().to_string(),
    })
}

/// Checks a candidate start time against business hours and blackout days.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments/validate",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Validation result", body = ValidateResponse),
        (status = 502, description = "Blackout days could not be loaded")
    ),
    tag = "Appointments"
))]
pub async fn validate_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<ValidateResponse>, RevolutionError> {
    let days = state.blackout.load().await?;
    let start_time = request.start_time.to_local_string(state.schedule.tz);
    let validation = state.schedule.rules.validate(&start_time, &days);

    Ok(Json(ValidateResponse {
        start_time,
        valid: validation.valid,
        reason: validation.reason,
    }))
}

/// Creates an appointment through the form controller.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments",
    request_body = AppointmentRequest,
    params(("x-client-id" = Option<String>, Header, description = "Signed-in client id")),
    responses(
        (status = 201, description = "Appointment created", body = SubmitResponse),
        (status = 422, description = "Field errors", body = SubmitFailure),
        (status = 502, description = "Backend refused or unreachable", body = SubmitFailure)
    ),
    tag = "Appointments"
))]
pub async fn create_appointment_handler(
    State(state): State<Arc<SchedulingState>>,
    headers: HeaderMap,
    Json(request): Json<AppointmentRequest>,
) -> Result<Response, RevolutionError> {
    let days = state.blackout.load().await?;
    let form = AppointmentForm::new(state.schedule.clone(), days);
    submit_form(&state, form, &headers, request, StatusCode::CREATED).await
}

/// Edits an appointment currently on the board.
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/appointments/{id}",
    params(
        ("id" = String, Path, description = "Appointment id"),
        ("x-client-id" = Option<String>, Header, description = "Signed-in client id")
    ),
    request_body = AppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = SubmitResponse),
        (status = 404, description = "Unknown appointment"),
        (status = 422, description = "Field errors", body = SubmitFailure),
        (status = 502, description = "Backend refused or unreachable", body = SubmitFailure)
    ),
    tag = "Appointments"
))]
pub async fn update_appointment_handler(
    State(state): State<Arc<SchedulingState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<AppointmentRequest>,
) -> Result<Response, RevolutionError> {
    state.board.ensure_loaded().await?;
    let days = state.blackout.load().await?;
    let appointment = state
        .board
        .appointments()
        .await
        .into_iter()
        .find(|a| a.id == id)
        .ok_or_else(|| not_found(format!("appointment {}", id)))?;

    let form = AppointmentForm::edit(&appointment, state.schedule.clone(), days);
    submit_form(&state, form, &headers, request, StatusCode::OK).await
}

async fn submit_form(
    state: &SchedulingState,
    mut form: AppointmentForm,
    headers: &HeaderMap,
    request: AppointmentRequest,
    success: StatusCode,
) -> Result<Response, RevolutionError> {
    apply_request(&mut form, request);
    let session = StaticSession::new(client_id_from(headers));

    match form.submit(state.backend.as_ref(), &session).await {
        Ok(appointment) => {
            state.board.upsert(appointment.clone()).await;
            let redirect_after_ms = form
                .redirect_after()
                .map(|delay| u64::try_from(delay.as_millis()).unwrap_or(u64::MAX))
                .unwrap_or_default();
            let body = SubmitResponse {
                appointment,
                redirect_after_ms,
            };
            Ok((success, Json(body)).into_response())
        }
        Err(SubmitError::Invalid(count)) => {
            info!("Appointment form has {} invalid field(s)", count);
            Ok(failure(StatusCode::UNPROCESSABLE_ENTITY, &form))
        }
        Err(SubmitError::Rejected(message)) => {
            if form.errors().is_empty() {
                warn!("Appointment submit failed: {}", message);
                Ok(failure(StatusCode::BAD_GATEWAY, &form))
            } else {
                Ok(failure(StatusCode::UNPROCESSABLE_ENTITY, &form))
            }
        }
    }
}

fn apply_request(form: &mut AppointmentForm, request: AppointmentRequest) {
    if let Some(service_type) = request.service_type {
        form.set_service_type(service_type);
    }
    if let Some(start_time) = request.start_time {
        form.set_start_time(start_time);
    }
    let text_fields = [
        (FormField::EndTime, request.end_time),
        (FormField::VehicleRef, request.vehicle_ref),
        (FormField::ClientRef, request.client_ref),
        (FormField::AdditionalInfo, request.additional_info),
    ];
    for (field, value) in text_fields {
        if let Some(value) = value {
            form.set_field(field, value);
        }
    }
}

fn failure(status: StatusCode, form: &AppointmentForm) -> Response {
    let body = SubmitFailure {
        message: form.submit_error().map(str::to_string),
        errors: form.errors().clone(),
    };
    (status, Json(body)).into_response()
}

fn client_id_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CLIENT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Appointments split into the three status lanes.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/board",
    responses(
        (status = 200, description = "Board lanes, counts and pending notices", body = BoardResponse),
        (status = 502, description = "Appointments could not be loaded")
    ),
    tag = "Board"
))]
pub async fn board_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Result<Json<BoardResponse>, RevolutionError> {
    state.board.ensure_loaded().await?;
    Ok(Json(board_snapshot(&state.board).await))
}

/// Reloads the board from the backend.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/board/refresh",
    responses(
        (status = 200, description = "Reloaded board", body = BoardResponse),
        (status = 502, description = "Appointments could not be loaded")
    ),
    tag = "Board"
))]
pub async fn refresh_board_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Result<Json<BoardResponse>, RevolutionError> {
    state.board.refresh().await?;
    Ok(Json(board_snapshot(&state.board).await))
}

async fn board_snapshot(board: &StatusBoard) -> BoardResponse {
    BoardResponse {
        lanes: board.lanes().await,
        counts: board.lane_counts().await,
        notices: board.take_notices().await,
    }
}

/// Moves a card to another lane (drag and drop).
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/board/{id}/lane",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = MoveRequest,
    responses(
        (status = 200, description = "Move result", body = MoveResponse),
        (status = 404, description = "Unknown appointment"),
        (status = 409, description = "Appointment has no lane (canceled)")
    ),
    tag = "Board"
))]
pub async fn move_card_handler(
    State(state): State<Arc<SchedulingState>>,
    Path(id): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, RevolutionError> {
    state.board.ensure_loaded().await?;
    let outcome = state.board.move_card(&id, request.lane).await?;
    Ok(Json(MoveResponse {
        outcome,
        counts: state.board.lane_counts().await,
        notices: state.board.take_notices().await,
    }))
}

/// Registered blackout days, freshly loaded.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/blackout-days",
    responses(
        (status = 200, description = "Blackout days in date order", body = Vec<BlackoutDay>),
        (status = 502, description = "Blackout days could not be loaded")
    ),
    tag = "Blackout days"
))]
pub async fn list_blackout_days_handler(
    State(state): State<Arc<SchedulingState>>,
) -> Result<Json<Vec<BlackoutDay>>, RevolutionError> {
    Ok(Json(state.blackout.load().await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/blackout-days",
    request_body = NewBlackoutDayRequest,
    responses(
        (status = 201, description = "Blackout day registered", body = BlackoutDay),
        (status = 409, description = "Day already blacked out"),
        (status = 422, description = "Date does not exist in the configured timezone")
    ),
    tag = "Blackout days"
))]
pub async fn create_blackout_day_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(request): Json<NewBlackoutDayRequest>,
) -> Result<(StatusCode, Json<BlackoutDay>), RevolutionError> {
    state.blackout.load().await?;
    let day = state
        .blackout
        .add(request.date, request.registered_by)
        .await?;
    Ok((StatusCode::CREATED, Json(day)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/blackout-days/{id}",
    params(("id" = String, Path, description = "Blackout day id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 404, description = "Unknown blackout day")
    ),
    tag = "Blackout days"
))]
pub async fn delete_blackout_day_handler(
    State(state): State<Arc<SchedulingState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, RevolutionError> {
    state.blackout.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
