//! Сводка платежей по всем счетам бронирования и её текстовое оформление.

use crate::{
    error::Result,
    model::{Ledger, LedgerKind, PaymentLine, PaymentSummary},
    payments::{classify_ledger, DuplicatePolicy},
    store::PaymentLedgerReader,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReport {
    pub kind: LedgerKind,
    pub reference: String,
    pub summary: PaymentSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub ledgers: Vec<LedgerReport>,
}

impl Report {
    pub fn build(ledgers: &[Ledger], policy: DuplicatePolicy) -> Result<Self> {
        let mut out = Vec::with_capacity(ledgers.len());
        for ledger in ledgers {
            out.push(LedgerReport {
                kind: ledger.kind,
                reference: ledger.reference.clone(),
                summary: classify_ledger(ledger, policy)?,
            });
        }
        Ok(Report { ledgers: out })
    }

    pub fn load<R: PaymentLedgerReader>(
        reader: &R,
        booking_id: i64,
        policy: DuplicatePolicy,
    ) -> Result<Self> {
        let ledgers = reader
            .ledger_refs(booking_id)?
            .iter()
            .map(|r| reader.load_ledger(r))
            .collect::<Result<Vec<_>>>()?;
        Self::build(&ledgers, policy)
    }

    pub fn outstanding(&self) -> Decimal {
        self.ledgers.iter().map(|l| l.summary.remaining_balance).sum()
    }
}

fn cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Сумма с двумя знаками без разделителей: "12500.00".
pub fn plain_amount(amount: Decimal) -> String {
    cents(amount).to_string()
}

/// С разделителями тысяч: "12,500.00".
pub fn format_amount(amount: Decimal) -> String {
    let rounded = cents(amount);
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn format_money(symbol: &str, amount: Decimal) -> String {
    format!("{symbol}{}", format_amount(amount))
}

/// Строка платежа; ссылка и скидка выводятся только если заданы.
pub fn render_line(line: &PaymentLine, symbol: &str) -> String {
    let mut text = format!(
        "{}: {} paid on {}",
        line.label.name(),
        format_money(symbol, line.amount),
        line.paid_at.format("%B %-d, %Y")
    );
    if let Some(reference) = &line.transaction_reference {
        text.push_str(&format!(" Ref: {reference}"));
    }
    if let Some(discount) = &line.discount {
        match discount.percent {
            Some(percent) => {
                text.push_str(&format!(" ({} {}% off)", discount.name, percent.normalize()))
            }
            None => text.push_str(&format!(" ({})", discount.name)),
        }
    }
    text
}
