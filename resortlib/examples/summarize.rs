use resortlib::{
    formats::{csv::Csv, text::Text},
    report::Report,
    traits::{ReadLedgers, WriteReport},
    DuplicatePolicy,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Пример: CSV счетов -> текстовая сводка (stdin -> stdout)
    let ledgers = Csv::read(std::io::BufReader::new(std::io::stdin()))?;
    let report = Report::build(&ledgers, DuplicatePolicy::LastWins)?;
    Text::write(std::io::stdout(), &report, "₱")?;
    Ok(())
}
