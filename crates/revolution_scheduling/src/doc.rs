// File: crates/revolution_scheduling/src/doc.rs

#![cfg(feature = "openapi")]
use crate::board::{BoardNotice, Lane, LaneCounts, Lanes, MoveOutcome};
use crate::datetime::TimeInput;
use crate::form::{FieldError, FormField};
use crate::handlers::{
    AppointmentRequest, BoardResponse, EarliestSlotResponse, MoveRequest, MoveResponse,
    NewBlackoutDayRequest, SubmitFailure, SubmitResponse, ValidateRequest, ValidateResponse,
};
use revolution_common::models::{Appointment, AppointmentStatus, BlackoutDay, ServiceType};
use revolution_common::ErrorKind;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::earliest_slot_handler,
        crate::handlers::validate_handler,
        crate::handlers::create_appointment_handler,
        crate::handlers::update_appointment_handler,
        crate::handlers::board_handler,
        crate::handlers::refresh_board_handler,
        crate::handlers::move_card_handler,
        crate::handlers::list_blackout_days_handler,
        crate::handlers::create_blackout_day_handler,
        crate::handlers::delete_blackout_day_handler
    ),
    components(
        schemas(
            Appointment,
            AppointmentStatus,
            ServiceType,
            BlackoutDay,
            ErrorKind,
            TimeInput,
            FormField,
            FieldError,
            Lane,
            Lanes,
            LaneCounts,
            BoardNotice,
            MoveOutcome,
            EarliestSlotResponse,
            ValidateRequest,
            ValidateResponse,
            AppointmentRequest,
            SubmitResponse,
            SubmitFailure,
            BoardResponse,
            MoveRequest,
            MoveResponse,
            NewBlackoutDayRequest
        )
    ),
    tags(
        (name = "Appointments", description = "Booking form: earliest slot, validation and submit"),
        (name = "Board", description = "Admin status board"),
        (name = "Blackout days", description = "Días inhábiles management")
    ),
    servers(
        (url = "/api", description = "Revolution CarWash scheduling API")
    )
)]
pub struct SchedulingApiDoc;
