//! Унифицированные трэйты чтения счетов и записи сводки на основе std::io::{BufRead, Write}.

use crate::{error::Result, model::Ledger, report::Report};
use std::io::{BufRead, Write};

pub trait ReadLedgers {
    fn read<R: BufRead>(r: R) -> Result<Vec<Ledger>>;
}

pub trait WriteReport {
    /// `currency`: символ валюты для человекочитаемых форматов.
    fn write<W: Write>(w: W, report: &Report, currency: &str) -> Result<()>;
}
