//! Упрощённый XML: <Folio><ledger>...<payment/>...</ledger></Folio> на входе,
//! <Report><ledger>...<line/>...</ledger></Report> на выходе.

use crate::{
    error::{ResortError, Result},
    model::{parse_instant, CategoryKind, Discount, Ledger, LedgerKind, PaymentRecord},
    report::Report,
};
use quick_xml::{de::from_reader, se::to_string};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

use rust_decimal::Decimal;

#[derive(Serialize, Deserialize, Debug)]
struct XmlPayment {
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    category: String,
    #[serde(default)]
    payment_mode: String,
    paid_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discount_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discount_percent: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
struct XmlLedger {
    kind: String,
    reference: String,
    #[serde(with = "rust_decimal::serde::str")]
    total_due: Decimal,
    #[serde(rename = "payment", default)]
    payments: Vec<XmlPayment>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename = "Folio")]
struct XmlFolio {
    #[serde(rename = "ledger", default)]
    ledgers: Vec<XmlLedger>,
}

#[derive(Serialize, Debug)]
struct XmlLine {
    label: &'static str,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    payment_mode: String,
    paid_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discount_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discount_percent: Option<String>,
}

#[derive(Serialize, Debug)]
struct XmlLedgerReport {
    kind: &'static str,
    reference: String,
    #[serde(with = "rust_decimal::serde::str")]
    total_due: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    total_paid: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    remaining_balance: Decimal,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method: Option<String>,
    #[serde(rename = "line")]
    lines: Vec<XmlLine>,
}

#[derive(Serialize, Debug)]
#[serde(rename = "Report")]
struct XmlReport {
    #[serde(rename = "ledger")]
    ledgers: Vec<XmlLedgerReport>,
}

fn nonblank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn parse_xml_payment(p: XmlPayment) -> Result<PaymentRecord> {
    let discount = match nonblank(p.discount_name) {
        Some(name) => Some(Discount {
            name,
            percent: nonblank(p.discount_percent)
                .map(|v| {
                    v.trim()
                        .parse::<Decimal>()
                        .map_err(|e| ResortError::Parse(format!("discount_percent: {e}")))
                })
                .transpose()?,
        }),
        None => None,
    };

    Ok(PaymentRecord {
        amount: p.amount,
        category: p.category.parse::<CategoryKind>()?,
        payment_mode: p.payment_mode,
        paid_at: parse_instant(&p.paid_at)?,
        transaction_reference: nonblank(p.transaction_reference),
        discount,
    })
}

pub struct SimpleXml;

impl crate::traits::ReadLedgers for SimpleXml {
    fn read<R: BufRead>(r: R) -> Result<Vec<Ledger>> {
        let x: XmlFolio = from_reader(r).map_err(|e| ResortError::Xml(format!("{e}")))?;

        let mut ledgers = Vec::with_capacity(x.ledgers.len());
        for l in x.ledgers {
            let mut payments = l
                .payments
                .into_iter()
                .map(parse_xml_payment)
                .collect::<Result<Vec<_>>>()?;
            payments.sort_by_key(|p| p.paid_at);

            ledgers.push(Ledger {
                kind: l.kind.parse::<LedgerKind>()?,
                reference: l.reference,
                total_due: l.total_due,
                payments,
            });
        }
        Ok(ledgers)
    }
}

impl crate::traits::WriteReport for SimpleXml {
    fn write<W: Write>(mut w: W, report: &Report, _currency: &str) -> Result<()> {
        let ledgers = report
            .ledgers
            .iter()
            .map(|l| XmlLedgerReport {
                kind: l.kind.name(),
                reference: l.reference.clone(),
                total_due: l.summary.total_due,
                total_paid: l.summary.total_paid,
                remaining_balance: l.summary.remaining_balance,
                status: l.summary.status.name(),
                payment_method: l.summary.payment_method(),
                lines: l
                    .summary
                    .lines
                    .iter()
                    .map(|line| XmlLine {
                        label: line.label.name(),
                        amount: line.amount,
                        payment_mode: line.payment_mode.clone(),
                        paid_at: line.paid_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                        transaction_reference: line.transaction_reference.clone(),
                        discount_name: line.discount.as_ref().map(|d| d.name.clone()),
                        discount_percent: line
                            .discount
                            .as_ref()
                            .and_then(|d| d.percent)
                            .map(|p| p.normalize().to_string()),
                    })
                    .collect(),
            })
            .collect();

        let s = to_string(&XmlReport { ledgers }).map_err(|e| ResortError::Xml(format!("{e}")))?;
        w.write_all(s.as_bytes())?;
        Ok(())
    }
}
