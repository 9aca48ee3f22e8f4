//! resortlib: правила смены статусов бронирования и сверка платежей курорта
//! (проживание, заказы еды, активности, дополнительные сборы).

pub mod audit;
pub mod config;
pub mod error;
pub mod model;
pub mod payments;
pub mod report;
pub mod service;
pub mod stay;
pub mod store;
pub mod traits;
pub mod transition;

pub mod formats {
    pub mod csv;
    pub mod text;
    pub mod xml;
}

pub use error::{ResortError, Result};
pub use payments::{classify, classify_item, classify_ledger, classify_with, DuplicatePolicy};
pub use transition::evaluate;
