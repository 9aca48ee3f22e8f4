//! Простой CSV: одна строка на платёж, заголовки:
//! ledger,reference,total_due,amount,category,payment_mode,paid_at,transaction_reference,discount_name,discount_percent
//!
//! Счёт без платежей задаётся строкой с пустыми платёжными колонками.
//! Сводка пишется по строке на счёт.

use crate::{
    error::{ResortError, Result},
    model::{parse_instant, CategoryKind, Discount, Ledger, LedgerKind, PaymentRecord},
    report::{plain_amount, Report},
};
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};

#[derive(serde::Deserialize)]
struct CsvRow {
    ledger: String,
    reference: String,
    total_due: String,
    amount: Option<String>,
    category: Option<String>,
    payment_mode: Option<String>,
    paid_at: Option<String>,
    transaction_reference: Option<String>,
    discount_name: Option<String>,
    discount_percent: Option<String>,
}

#[derive(serde::Serialize)]
struct CsvOutRow<'a> {
    ledger: &'a str,
    reference: &'a str,
    total_due: String,
    total_paid: String,
    remaining_balance: String,
    status: &'a str,
    payment_method: Option<String>,
}

fn filled(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn parse_amount(field: &str, s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|e| ResortError::Parse(format!("{field}: {e}")))
}

fn parse_payment(row: CsvRow) -> Result<Option<PaymentRecord>> {
    let Some(amount) = filled(row.amount) else {
        return Ok(None);
    };
    let category = filled(row.category).ok_or(ResortError::MissingField("category"))?;
    let paid_at = filled(row.paid_at).ok_or(ResortError::MissingField("paid_at"))?;

    let discount = match filled(row.discount_name) {
        Some(name) => Some(Discount {
            name,
            percent: filled(row.discount_percent)
                .map(|p| parse_amount("discount_percent", &p))
                .transpose()?,
        }),
        None => None,
    };

    Ok(Some(PaymentRecord {
        amount: parse_amount("amount", &amount)?,
        category: category.parse::<CategoryKind>()?,
        payment_mode: filled(row.payment_mode).unwrap_or_default(),
        paid_at: parse_instant(&paid_at)?,
        transaction_reference: filled(row.transaction_reference),
        discount,
    }))
}

pub struct Csv;

impl crate::traits::ReadLedgers for Csv {
    fn read<R: BufRead>(r: R) -> Result<Vec<Ledger>> {
        let mut rdr = ReaderBuilder::new().flexible(true).trim(csv::Trim::All).from_reader(r);
        let mut ledgers: Vec<Ledger> = Vec::new();

        for rec in rdr.deserialize::<CsvRow>() {
            let row = rec?;
            let kind = row.ledger.parse::<LedgerKind>()?;
            let reference = row.reference.clone();
            let total_due = parse_amount("total_due", &row.total_due)?;

            let idx = match ledgers
                .iter()
                .position(|l| l.kind == kind && l.reference == reference)
            {
                Some(i) => {
                    if ledgers[i].total_due != total_due {
                        return Err(ResortError::Parse(format!(
                            "{}: conflicting total_due {} vs {}",
                            ledgers[i].label(),
                            ledgers[i].total_due,
                            total_due
                        )));
                    }
                    i
                }
                None => {
                    ledgers.push(Ledger {
                        kind,
                        reference,
                        total_due,
                        payments: Vec::new(),
                    });
                    ledgers.len() - 1
                }
            };

            if let Some(payment) = parse_payment(row)? {
                ledgers[idx].payments.push(payment);
            }
        }

        for ledger in &mut ledgers {
            ledger.payments.sort_by_key(|p| p.paid_at);
        }
        Ok(ledgers)
    }
}

impl crate::traits::WriteReport for Csv {
    fn write<W: Write>(mut w: W, report: &Report, _currency: &str) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        for l in &report.ledgers {
            let s = &l.summary;
            wrt.serialize(CsvOutRow {
                ledger: l.kind.name(),
                reference: &l.reference,
                total_due: plain_amount(s.total_due),
                total_paid: plain_amount(s.total_paid),
                remaining_balance: plain_amount(s.remaining_balance),
                status: s.status.name(),
                payment_method: s.payment_method(),
            })?;
        }
        wrt.flush()?;
        Ok(())
    }
}

