//! Внешние соседи движка: хранилище бронирований, каталог статусов,
//! журнал аудита, чтение платежей. Плюс реализации в памяти.

use crate::{
    audit::AuditEntry,
    error::{ResortError, Result},
    model::{BookingSnapshot, Ledger, LedgerKind, PaymentRecord, Status},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub trait BookingStore {
    fn get_booking(&self, booking_id: i64) -> Result<BookingSnapshot>;
    fn set_status(&mut self, booking_id: i64, status: &Status) -> Result<()>;
    /// Меняет только дату выезда, время выезда сохраняется.
    /// Выезд не может оказаться раньше заезда: тогда он приравнивается к заезду.
    fn set_check_out_date(&mut self, booking_id: i64, date: NaiveDate) -> Result<()>;
}

pub trait StatusCatalog {
    fn resolve_status_name(&self, status_id: i64) -> Result<Status>;
}

pub trait AuditSink {
    fn record(&mut self, entry: AuditEntry) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LedgerRef {
    pub kind: LedgerKind,
    pub reference: String,
}

pub trait PaymentLedgerReader {
    fn ledger_refs(&self, booking_id: i64) -> Result<Vec<LedgerRef>>;
    fn list_payments(&self, ledger: &LedgerRef) -> Result<Vec<PaymentRecord>>;
    fn total_due(&self, ledger: &LedgerRef) -> Result<Decimal>;

    fn load_ledger(&self, ledger: &LedgerRef) -> Result<Ledger> {
        Ok(Ledger {
            kind: ledger.kind,
            reference: ledger.reference.clone(),
            total_due: self.total_due(ledger)?,
            payments: self.list_payments(ledger)?,
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    bookings: HashMap<i64, BookingSnapshot>,
    statuses: HashMap<i64, Status>,
    ledgers: HashMap<i64, Vec<Ledger>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Каталог статусов с id 1..=4: Confirmed, Checked-in, Completed, Cancelled.
    pub fn with_default_statuses() -> Self {
        let mut store = Self::new();
        store.add_status(1, Status::Confirmed);
        store.add_status(2, Status::CheckedIn);
        store.add_status(3, Status::Completed);
        store.add_status(4, Status::Cancelled);
        store
    }

    pub fn add_status(&mut self, status_id: i64, status: Status) {
        self.statuses.insert(status_id, status);
    }

    pub fn insert_booking(&mut self, snapshot: BookingSnapshot) {
        self.bookings.insert(snapshot.booking_id, snapshot);
    }

    pub fn insert_ledger(&mut self, booking_id: i64, ledger: Ledger) {
        self.ledgers.entry(booking_id).or_default().push(ledger);
    }

    fn booking_mut(&mut self, booking_id: i64) -> Result<&mut BookingSnapshot> {
        self.bookings
            .get_mut(&booking_id)
            .ok_or(ResortError::BookingNotFound(booking_id))
    }

    fn find_ledger(&self, ledger: &LedgerRef) -> Result<&Ledger> {
        self.ledgers
            .values()
            .flatten()
            .find(|l| l.kind == ledger.kind && l.reference == ledger.reference)
            .ok_or_else(|| {
                ResortError::Parse(format!("unknown ledger {}#{}", ledger.kind, ledger.reference))
            })
    }
}

impl BookingStore for MemoryStore {
    fn get_booking(&self, booking_id: i64) -> Result<BookingSnapshot> {
        self.bookings
            .get(&booking_id)
            .cloned()
            .ok_or(ResortError::BookingNotFound(booking_id))
    }

    fn set_status(&mut self, booking_id: i64, status: &Status) -> Result<()> {
        self.booking_mut(booking_id)?.current_status = status.clone();
        Ok(())
    }

    fn set_check_out_date(&mut self, booking_id: i64, date: NaiveDate) -> Result<()> {
        let booking = self.booking_mut(booking_id)?;
        booking.check_out_at = date
            .and_time(booking.check_out_at.time())
            .max(booking.check_in_at);
        Ok(())
    }
}

impl StatusCatalog for MemoryStore {
    fn resolve_status_name(&self, status_id: i64) -> Result<Status> {
        self.statuses
            .get(&status_id)
            .cloned()
            .ok_or(ResortError::UnknownStatusId(status_id))
    }
}

impl PaymentLedgerReader for MemoryStore {
    fn ledger_refs(&self, booking_id: i64) -> Result<Vec<LedgerRef>> {
        if !self.bookings.contains_key(&booking_id) {
            return Err(ResortError::BookingNotFound(booking_id));
        }
        Ok(self
            .ledgers
            .get(&booking_id)
            .map(|ls| {
                ls.iter()
                    .map(|l| LedgerRef {
                        kind: l.kind,
                        reference: l.reference.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_payments(&self, ledger: &LedgerRef) -> Result<Vec<PaymentRecord>> {
        let mut payments = self.find_ledger(ledger)?.payments.clone();
        payments.sort_by_key(|p| p.paid_at);
        Ok(payments)
    }

    fn total_due(&self, ledger: &LedgerRef) -> Result<Decimal> {
        Ok(self.find_ledger(ledger)?.total_due)
    }
}

#[derive(Debug, Default)]
pub struct MemoryAudit {
    pub entries: Vec<AuditEntry>,
}

impl AuditSink for MemoryAudit {
    fn record(&mut self, entry: AuditEntry) -> Result<()> {
        self.entries.push(entry);
        Ok(())
    }
}
