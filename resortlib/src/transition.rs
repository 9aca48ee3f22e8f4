//! Проверка смены статуса бронирования.
//!
//! Чистая функция: ни хранилища, ни часов. Побочный эффект досрочного
//! завершения возвращается как данные, применяет его вызывающий.

use crate::{
    error::Result,
    model::{BookingSnapshot, SideEffect, Status, StatusChangeRequest, TransitionOutcome},
};

pub const CANCEL_REQUIRES_CONFIRMED: &str =
    "cancellation requires current status Confirmed";
pub const CHECK_IN_NOT_REACHED: &str = "check-in not yet reached";
pub const CHECK_OUT_NOT_REACHED: &str =
    "checkout time not yet reached and no early-completion confirmation given";
pub const COMPLETE_REQUIRES_CHECKED_IN: &str = "completion requires current status CheckedIn";

/// Решает, допустима ли смена статуса. Ошибка возможна только при нарушенном
/// инварианте снимка (`check_in_at > check_out_at`), отказ ошибкой не является.
pub fn evaluate(
    snapshot: &BookingSnapshot,
    request: &StatusChangeRequest,
) -> Result<TransitionOutcome> {
    snapshot.validate()?;

    let current = &snapshot.current_status;
    let now = request.now;

    let outcome = match &request.requested_status {
        Status::Cancelled => {
            if *current == Status::Confirmed {
                TransitionOutcome::approve()
            } else {
                TransitionOutcome::deny(CANCEL_REQUIRES_CONFIRMED)
            }
        }
        Status::CheckedIn => {
            if now >= snapshot.check_in_at {
                TransitionOutcome::approve()
            } else {
                TransitionOutcome::deny(CHECK_IN_NOT_REACHED)
            }
        }
        Status::Completed => {
            if *current != Status::CheckedIn {
                TransitionOutcome::deny(COMPLETE_REQUIRES_CHECKED_IN)
            } else if request.early_completion_requested {
                TransitionOutcome::approve_with(SideEffect::SetCheckOutDateTo(now.date()))
            } else if now >= snapshot.check_out_at {
                TransitionOutcome::approve()
            } else {
                TransitionOutcome::deny(CHECK_OUT_NOT_REACHED)
            }
        }
        Status::Confirmed | Status::Other(_) => TransitionOutcome::approve(),
    };

    log::debug!(
        "booking #{}: {} -> {} at {} (early={}): allowed={}",
        snapshot.booking_id,
        current,
        request.requested_status,
        now,
        request.early_completion_requested,
        outcome.allowed
    );

    Ok(outcome)
}
