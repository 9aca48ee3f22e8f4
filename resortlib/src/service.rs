//! Полный цикл смены статуса: чтение, проверка, запись, аудит.
//!
//! Сериализацию параллельных правок одного бронирования и атомарность
//! записи статуса вместе с датой выезда обеспечивает хранилище.

use crate::{
    audit::AuditEntry,
    error::Result,
    model::{SideEffect, StatusChangeRequest, TransitionOutcome},
    store::{AuditSink, BookingStore, StatusCatalog},
    transition::evaluate,
};
use chrono::NaiveDateTime;

pub struct StatusDesk<'a, S, A> {
    store: &'a mut S,
    audit: &'a mut A,
}

impl<'a, S, A> StatusDesk<'a, S, A>
where
    S: BookingStore + StatusCatalog,
    A: AuditSink,
{
    pub fn new(store: &'a mut S, audit: &'a mut A) -> Self {
        StatusDesk { store, audit }
    }

    /// При отказе ничего не пишет и возвращает исход с причиной.
    pub fn change_status(
        &mut self,
        actor_id: i64,
        booking_id: i64,
        requested_status_id: i64,
        early_completion: bool,
        now: NaiveDateTime,
    ) -> Result<TransitionOutcome> {
        let snapshot = self.store.get_booking(booking_id)?;
        let requested_status = self.store.resolve_status_name(requested_status_id)?;
        let request = StatusChangeRequest {
            requested_status,
            early_completion_requested: early_completion,
            now,
        };

        let outcome = evaluate(&snapshot, &request)?;
        if !outcome.allowed {
            log::warn!(
                "booking #{booking_id}: {} denied: {}",
                request.requested_status,
                outcome.denial_reason.as_deref().unwrap_or_default()
            );
            return Ok(outcome);
        }

        // статус первым: если он не записался, дата выезда остаётся прежней
        self.store.set_status(booking_id, &request.requested_status)?;
        if let Some(SideEffect::SetCheckOutDateTo(date)) = outcome.side_effect {
            self.store.set_check_out_date(booking_id, date)?;
        }

        let entry = AuditEntry::status_change(
            actor_id,
            booking_id,
            &request.requested_status,
            outcome.side_effect.as_ref(),
        );
        log::info!("{} (by user {actor_id})", entry.description);
        self.audit.record(entry)?;

        Ok(outcome)
    }
}
