//! Доменные модели: общий слой между хранилищем, правилами и форматами.

use crate::error::{ResortError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const INSTANT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Местный момент времени курорта: "2026-10-19 14:00[:00]" или с `T`.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    INSTANT_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .ok_or_else(|| ResortError::Parse(format!("instant {s}")))
}

/// Статус бронирования. Сравниваются по имени, а не по id из таблицы статусов.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    /// Любой другой статус каталога: пропускается без проверок.
    Other(String),
}

impl Status {
    /// Статусы, которые админ-экран предлагает для смены.
    pub fn staff_options() -> [Status; 3] {
        [Status::CheckedIn, Status::Completed, Status::Cancelled]
    }

    pub fn name(&self) -> &str {
        match self {
            Status::Confirmed => "Confirmed",
            Status::CheckedIn => "Checked-in",
            Status::Completed => "Completed",
            Status::Cancelled => "Cancelled",
            Status::Other(name) => name,
        }
    }
}

impl FromStr for Status {
    type Err = ResortError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ResortError::MissingField("status"));
        }
        let status = match name.to_ascii_lowercase().as_str() {
            "confirmed" => Status::Confirmed,
            "checked-in" | "checkedin" | "checked_in" | "checked in" => Status::CheckedIn,
            "completed" => Status::Completed,
            "cancelled" | "canceled" => Status::Cancelled,
            _ => Status::Other(name.to_string()),
        };
        Ok(status)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Снимок бронирования на момент проверки. Инвариант: `check_in_at <= check_out_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSnapshot {
    pub booking_id: i64,
    pub current_status: Status,
    pub check_in_at: NaiveDateTime,
    pub check_out_at: NaiveDateTime,
}

impl BookingSnapshot {
    pub fn new(
        booking_id: i64,
        current_status: Status,
        check_in_at: NaiveDateTime,
        check_out_at: NaiveDateTime,
    ) -> Result<Self> {
        let snapshot = BookingSnapshot {
            booking_id,
            current_status,
            check_in_at,
            check_out_at,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        if self.check_in_at > self.check_out_at {
            return Err(ResortError::InvalidBooking {
                check_in: self.check_in_at,
                check_out: self.check_out_at,
            });
        }
        Ok(())
    }
}

/// Строка бронирования в том виде, как её отдаёт хранилище: дата и время раздельно.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRow {
    pub booking_id: i64,
    pub status_name: Option<String>,
    pub check_in_date: Option<NaiveDate>,
    pub check_in_time: Option<NaiveTime>,
    pub check_out_date: Option<NaiveDate>,
    pub check_out_time: Option<NaiveTime>,
}

impl TryFrom<BookingRow> for BookingSnapshot {
    type Error = ResortError;

    fn try_from(row: BookingRow) -> Result<Self> {
        let status = row
            .status_name
            .as_deref()
            .ok_or(ResortError::MissingField("status_name"))?
            .parse::<Status>()?;
        let check_in_date = row.check_in_date.ok_or(ResortError::MissingField("check_in_date"))?;
        let check_in_time = row.check_in_time.ok_or(ResortError::MissingField("check_in_time"))?;
        let check_out_date = row.check_out_date.ok_or(ResortError::MissingField("check_out_date"))?;
        let check_out_time = row.check_out_time.ok_or(ResortError::MissingField("check_out_time"))?;

        BookingSnapshot::new(
            row.booking_id,
            status,
            check_in_date.and_time(check_in_time),
            check_out_date.and_time(check_out_time),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    pub requested_status: Status,
    pub early_completion_requested: bool,
    /// Момент оценки в местном времени курорта; часы внутри движка не читаются.
    pub now: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideEffect {
    SetCheckOutDateTo(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub allowed: bool,
    pub denial_reason: Option<String>,
    pub side_effect: Option<SideEffect>,
}

impl TransitionOutcome {
    pub fn approve() -> Self {
        TransitionOutcome {
            allowed: true,
            denial_reason: None,
            side_effect: None,
        }
    }

    pub fn approve_with(effect: SideEffect) -> Self {
        TransitionOutcome {
            allowed: true,
            denial_reason: None,
            side_effect: Some(effect),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        TransitionOutcome {
            allowed: false,
            denial_reason: Some(reason.into()),
            side_effect: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    DownPayment,
    FullPayment,
    RemainingBalance,
    Uncategorized,
}

impl CategoryKind {
    /// Идентификаторы из таблицы категорий платежей.
    pub fn from_category_id(id: i64) -> Result<Self> {
        match id {
            1 => Ok(CategoryKind::DownPayment),
            2 => Ok(CategoryKind::FullPayment),
            3 => Ok(CategoryKind::RemainingBalance),
            other => Err(ResortError::UnknownCategory(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CategoryKind::DownPayment => "Down Payment",
            CategoryKind::FullPayment => "Full Payment",
            CategoryKind::RemainingBalance => "Remaining Balance",
            CategoryKind::Uncategorized => "Uncategorized",
        }
    }
}

impl FromStr for CategoryKind {
    type Err = ResortError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "downpayment" | "1" => Ok(CategoryKind::DownPayment),
            "fullpayment" | "2" => Ok(CategoryKind::FullPayment),
            "remainingbalance" | "remainingbalancepayment" | "balancepayment" | "3" => {
                Ok(CategoryKind::RemainingBalance)
            }
            "other" | "uncategorized" => Ok(CategoryKind::Uncategorized),
            _ => Err(ResortError::UnknownCategory(s.trim().to_string())),
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub name: String,
    pub percent: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub amount: Decimal,
    pub category: CategoryKind,
    pub payment_mode: String,
    pub paid_at: NaiveDateTime,
    pub transaction_reference: Option<String>,
    pub discount: Option<Discount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerKind {
    Cabin,
    FoodOrder,
    Activity,
    AdditionalFee,
}

impl LedgerKind {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerKind::Cabin => "cabin",
            LedgerKind::FoodOrder => "food_order",
            LedgerKind::Activity => "activity",
            LedgerKind::AdditionalFee => "additional_fee",
        }
    }

    /// Всё, кроме проживания, считается одиночной позицией с не более чем одним платежом.
    pub fn is_single_item(&self) -> bool {
        !matches!(self, LedgerKind::Cabin)
    }
}

impl FromStr for LedgerKind {
    type Err = ResortError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "cabin" => Ok(LedgerKind::Cabin),
            "food_order" | "food" => Ok(LedgerKind::FoodOrder),
            "activity" => Ok(LedgerKind::Activity),
            "additional_fee" | "fee" => Ok(LedgerKind::AdditionalFee),
            other => Err(ResortError::Parse(format!("ledger kind {other}"))),
        }
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Одна оплачиваемая единица: проживание, заказ еды, активность или доп. сбор.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub kind: LedgerKind,
    pub reference: String,
    pub total_due: Decimal,
    /// По возрастанию `paid_at`; порядок важен только для отображения.
    pub payments: Vec<PaymentRecord>,
}

impl Ledger {
    pub fn label(&self) -> String {
        format!("{}#{}", self.kind, self.reference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLabel {
    FullyPaid,
    FullyPaidWithDiscount,
    PartiallyPaid,
    Unpaid,
}

impl StatusLabel {
    pub fn name(&self) -> &'static str {
        match self {
            StatusLabel::FullyPaid => "Fully Paid",
            StatusLabel::FullyPaidWithDiscount => "Fully Paid with Discount",
            StatusLabel::PartiallyPaid => "Partially Paid",
            StatusLabel::Unpaid => "Unpaid",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineLabel {
    FullPayment,
    DownPayment,
    RemainingBalancePayment,
    CompletePayment,
    AmountPaid,
}

impl LineLabel {
    pub fn name(&self) -> &'static str {
        match self {
            LineLabel::FullPayment => "Full Payment",
            LineLabel::DownPayment => "Down Payment",
            LineLabel::RemainingBalancePayment => "Remaining Balance Payment",
            LineLabel::CompletePayment => "Complete Payment",
            LineLabel::AmountPaid => "Amount Paid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLine {
    pub label: LineLabel,
    pub amount: Decimal,
    pub payment_mode: String,
    pub paid_at: NaiveDateTime,
    pub transaction_reference: Option<String>,
    pub discount: Option<Discount>,
}

impl PaymentLine {
    pub fn echo(label: LineLabel, record: &PaymentRecord) -> Self {
        PaymentLine {
            label,
            amount: record.amount,
            payment_mode: record.payment_mode.clone(),
            paid_at: record.paid_at,
            transaction_reference: record
                .transaction_reference
                .clone()
                .filter(|r| !r.trim().is_empty()),
            discount: record.discount.clone().filter(|d| !d.name.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_due: Decimal,
    pub total_paid: Decimal,
    pub remaining_balance: Decimal,
    pub status: StatusLabel,
    pub lines: Vec<PaymentLine>,
}

impl PaymentSummary {
    /// Строка «Total» экрана: оплачено плюс остаток.
    pub fn billed_total(&self) -> Decimal {
        self.total_paid + self.remaining_balance
    }

    /// Способы оплаты показанных строк через " / ".
    pub fn payment_method(&self) -> Option<String> {
        if self.lines.is_empty() {
            return None;
        }
        let modes: Vec<&str> = self.lines.iter().map(|l| l.payment_mode.as_str()).collect();
        Some(modes.join(" / "))
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            self.status,
            StatusLabel::FullyPaid | StatusLabel::FullyPaidWithDiscount
        )
    }
}
