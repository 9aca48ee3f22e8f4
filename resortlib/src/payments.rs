//! Сверка платежей по счёту: раскладка по категориям и итоговый статус оплаты.

use crate::{
    error::{ResortError, Result},
    model::{
        CategoryKind, Ledger, LineLabel, PaymentLine, PaymentRecord, PaymentSummary, StatusLabel,
    },
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Что делать, если в одном счёте несколько записей одной категории.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// В строку попадает последняя запись категории,
    /// но в `total_paid` суммируются все.
    #[default]
    LastWins,
    Reject,
}

impl FromStr for DuplicatePolicy {
    type Err = ResortError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-wins" | "last_wins" | "lastwins" => Ok(DuplicatePolicy::LastWins),
            "reject" | "strict" => Ok(DuplicatePolicy::Reject),
            other => Err(ResortError::Config(format!("duplicate policy {other}"))),
        }
    }
}

#[derive(Default)]
struct Slots<'a> {
    down: Option<&'a PaymentRecord>,
    full: Option<&'a PaymentRecord>,
    balance: Option<&'a PaymentRecord>,
}

fn fill_slots<'a>(
    policy: DuplicatePolicy,
    ledger: &str,
    records: &'a [PaymentRecord],
) -> Result<Slots<'a>> {
    let mut slots = Slots::default();
    for record in records {
        let slot = match record.category {
            CategoryKind::DownPayment => &mut slots.down,
            CategoryKind::FullPayment => &mut slots.full,
            CategoryKind::RemainingBalance => &mut slots.balance,
            CategoryKind::Uncategorized => continue,
        };
        if slot.is_some() {
            match policy {
                DuplicatePolicy::Reject => {
                    return Err(ResortError::DuplicateCategory {
                        ledger: ledger.to_string(),
                        category: record.category.to_string(),
                    })
                }
                DuplicatePolicy::LastWins => log::warn!(
                    "{ledger}: several {} records, showing the latest",
                    record.category
                ),
            }
        }
        *slot = Some(record);
    }
    Ok(slots)
}

/// Сводка по счёту проживания с политикой `LastWins`.
pub fn classify(total_due: Decimal, records: &[PaymentRecord]) -> PaymentSummary {
    let slots = fill_slots(DuplicatePolicy::LastWins, "cabin", records).unwrap_or_default();
    summarize(total_due, records, &slots)
}

pub fn classify_with(
    policy: DuplicatePolicy,
    ledger: &str,
    total_due: Decimal,
    records: &[PaymentRecord],
) -> Result<PaymentSummary> {
    let slots = fill_slots(policy, ledger, records)?;
    Ok(summarize(total_due, records, &slots))
}

/// Правила 1, 2 и 4 дают `FullyPaid` по набору категорий, не по сумме:
/// недоплата при этом остаётся в `remaining_balance`.
fn summarize(total_due: Decimal, records: &[PaymentRecord], slots: &Slots<'_>) -> PaymentSummary {
    let total_paid: Decimal = records.iter().map(|r| r.amount).sum();
    let outstanding = (total_due - total_paid).max(Decimal::ZERO);

    let (status, lines, remaining_balance) = match (slots.down, slots.full, slots.balance) {
        (None, Some(full), _) => (
            StatusLabel::FullyPaid,
            vec![PaymentLine::echo(LineLabel::FullPayment, full)],
            outstanding,
        ),
        (Some(down), _, Some(balance)) => (
            StatusLabel::FullyPaid,
            vec![
                PaymentLine::echo(LineLabel::DownPayment, down),
                PaymentLine::echo(LineLabel::RemainingBalancePayment, balance),
            ],
            outstanding,
        ),
        // предоплата считается половиной: остаток равен её сумме
        (Some(down), None, None) => (
            StatusLabel::PartiallyPaid,
            vec![PaymentLine::echo(LineLabel::DownPayment, down)],
            down.amount,
        ),
        (Some(down), Some(full), None) => (
            StatusLabel::FullyPaid,
            vec![
                PaymentLine::echo(LineLabel::DownPayment, down),
                PaymentLine::echo(LineLabel::CompletePayment, full),
            ],
            outstanding,
        ),
        (None, None, _) => (StatusLabel::Unpaid, Vec::new(), total_due),
    };

    PaymentSummary {
        total_due,
        total_paid,
        remaining_balance,
        status,
        lines,
    }
}

/// Сводка по одиночной позиции (заказ еды, активность, доп. сбор):
/// не более одного платежа, скидка уточняет статус полной оплаты.
/// Остаток считается от суммы за вычетом процента скидки.
pub fn classify_item(
    ledger: &str,
    total_due: Decimal,
    records: &[PaymentRecord],
) -> Result<PaymentSummary> {
    let record = match records {
        [] => {
            return Ok(PaymentSummary {
                total_due,
                total_paid: Decimal::ZERO,
                remaining_balance: total_due,
                status: StatusLabel::Unpaid,
                lines: Vec::new(),
            })
        }
        [record] => record,
        _ => {
            return Err(ResortError::TooManyItemPayments {
                ledger: ledger.to_string(),
                count: records.len(),
            })
        }
    };

    let line = PaymentLine::echo(LineLabel::AmountPaid, record);
    let remaining = discounted_due(total_due, &line) - record.amount;
    let status = if remaining > Decimal::ZERO {
        StatusLabel::PartiallyPaid
    } else if line.discount.is_some() {
        StatusLabel::FullyPaidWithDiscount
    } else {
        StatusLabel::FullyPaid
    };

    Ok(PaymentSummary {
        total_due,
        total_paid: record.amount,
        remaining_balance: remaining.max(Decimal::ZERO),
        status,
        lines: vec![line],
    })
}

/// Сумма к оплате с учётом процента скидки; без процента не меняется.
fn discounted_due(total_due: Decimal, line: &PaymentLine) -> Decimal {
    match line.discount.as_ref().and_then(|d| d.percent) {
        Some(percent) => {
            let factor = (Decimal::ONE_HUNDRED - percent).max(Decimal::ZERO) / Decimal::ONE_HUNDRED;
            (total_due * factor).round_dp(2)
        }
        None => total_due,
    }
}

pub fn classify_ledger(ledger: &Ledger, policy: DuplicatePolicy) -> Result<PaymentSummary> {
    let label = ledger.label();
    let summary = if ledger.kind.is_single_item() {
        classify_item(&label, ledger.total_due, &ledger.payments)?
    } else {
        classify_with(policy, &label, ledger.total_due, &ledger.payments)?
    };
    log::debug!(
        "{label}: due={} paid={} remaining={} -> {}",
        summary.total_due,
        summary.total_paid,
        summary.remaining_balance,
        summary.status
    );
    Ok(summary)
}
