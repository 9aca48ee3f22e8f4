//! Текст записи журнала аудита для применённой смены статуса.

use crate::model::{SideEffect, Status};
use serde::{Deserialize, Serialize};

pub const BOOKINGS_TABLE: &str = "Bookings";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor_id: i64,
    pub description: String,
    pub affected_table: String,
}

pub fn describe(booking_id: i64, status: &Status, side_effect: Option<&SideEffect>) -> String {
    let mut text = format!("Updated Booking #{booking_id} status to {status}");
    if let Some(SideEffect::SetCheckOutDateTo(date)) = side_effect {
        text.push_str(&format!(
            " (Early completion - check-out date updated to {})",
            date.format("%Y-%m-%d")
        ));
    }
    text
}

impl AuditEntry {
    pub fn status_change(
        actor_id: i64,
        booking_id: i64,
        status: &Status,
        side_effect: Option<&SideEffect>,
    ) -> Self {
        AuditEntry {
            actor_id,
            description: describe(booking_id, status, side_effect),
            affected_table: BOOKINGS_TABLE.to_string(),
        }
    }
}
