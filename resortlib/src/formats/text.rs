//! Человекочитаемая сводка, как на карточке бронирования. Только запись.

use crate::{
    error::Result,
    model::LedgerKind,
    report::{format_money, render_line, Report},
};
use std::io::Write;

fn heading(kind: LedgerKind, reference: &str) -> String {
    match kind {
        LedgerKind::Cabin => "Cabin Payment".to_string(),
        LedgerKind::FoodOrder => format!("Food Order #{reference}"),
        LedgerKind::Activity => format!("Activity #{reference}"),
        LedgerKind::AdditionalFee => format!("Additional Fee #{reference}"),
    }
}

pub struct Text;

impl crate::traits::WriteReport for Text {
    fn write<W: Write>(mut w: W, report: &Report, currency: &str) -> Result<()> {
        for l in &report.ledgers {
            let s = &l.summary;
            writeln!(w, "== {}", heading(l.kind, &l.reference))?;

            if s.lines.is_empty() && l.kind == LedgerKind::Cabin {
                writeln!(w, "No payment information available for this booking.")?;
            }
            for line in &s.lines {
                writeln!(w, "  {}", render_line(line, currency))?;
            }
            if let Some(method) = s.payment_method() {
                writeln!(w, "  Payment Method: {method}")?;
            }

            // неоплаченный счёт без строк показывает статус, а не остаток
            if s.is_settled() || s.lines.is_empty() {
                writeln!(w, "  Payment Status: {}", s.status)?;
            } else {
                writeln!(
                    w,
                    "  Remaining Balance: {}",
                    format_money(currency, s.remaining_balance)
                )?;
            }
            if l.kind == LedgerKind::Cabin {
                writeln!(w, "  Total: {}", format_money(currency, s.billed_total()))?;
            }
        }

        writeln!(w, "Outstanding: {}", format_money(currency, report.outstanding()))?;
        Ok(())
    }
}
