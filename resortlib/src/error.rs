//! Единый тип ошибок публичного API.
//!
//! Отказ в смене статуса ошибкой не является: это обычный `TransitionOutcome`.
//! Сюда попадают только нарушения контракта входных данных и сбои ввода-вывода.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResortError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("check-in {check_in} is later than check-out {check_out}")]
    InvalidBooking {
        check_in: NaiveDateTime,
        check_out: NaiveDateTime,
    },

    #[error("unknown payment category: {0}")]
    UnknownCategory(String),

    #[error("ledger {ledger} has more than one {category} record")]
    DuplicateCategory { ledger: String, category: String },

    #[error("ledger {ledger} expects at most one payment, got {count}")]
    TooManyItemPayments { ledger: String, count: usize },

    #[error("unknown status id: {0}")]
    UnknownStatusId(i64),

    #[error("booking not found: {0}")]
    BookingNotFound(i64),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ResortError>;
