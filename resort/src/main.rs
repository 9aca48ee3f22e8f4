use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use env_logger::Env;
use resortlib::{
    audit,
    config::ResortConfig,
    error::{ResortError, Result},
    formats::{csv::Csv, text::Text, xml::SimpleXml},
    model::{parse_instant, BookingSnapshot, SideEffect, Status, StatusChangeRequest},
    report::Report,
    stay::TourType,
    traits::{ReadLedgers, WriteReport},
    transition::evaluate,
    DuplicatePolicy,
};
use std::fs::File;
use std::io::{self, BufReader, Write};

/// Код выхода при отказе в смене статуса.
const EXIT_DENIED: i32 = 2;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum InFmt {
    Csv,
    Xml,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutFmt {
    Text,
    Csv,
    Xml,
}

#[derive(Parser, Debug)]
#[command(name = "resort", version, about = "Смена статусов бронирования и сводка платежей")]
struct Cli {
    /// Символ валюты в отчёте
    #[arg(long, env = "RESORT_CURRENCY_SYMBOL", global = true)]
    currency: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Проверить, допустима ли смена статуса
    Transition {
        #[arg(long)]
        booking_id: i64,
        /// Текущий статус (Confirmed, Checked-in, ...)
        #[arg(long)]
        current: String,
        /// Запрошенный статус
        #[arg(long)]
        requested: String,
        /// Заезд, "YYYY-MM-DD HH:MM"
        #[arg(long)]
        check_in: String,
        /// Выезд, "YYYY-MM-DD HH:MM"
        #[arg(long)]
        check_out: String,
        /// Момент оценки (по умолчанию текущее местное время курорта)
        #[arg(long)]
        now: Option<String>,
        /// Досрочное завершение подтверждено
        #[arg(long)]
        early: bool,
    },
    /// Статусы, доступные персоналу для смены
    Statuses,
    /// Сводка платежей по счетам
    Payments {
        /// Входной файл (по умолчанию stdin)
        #[arg(short = 'i', long = "input")]
        input: Option<String>,

        /// Выходной файл (по умолчанию stdout)
        #[arg(short = 'o', long = "output")]
        output: Option<String>,

        /// Формат входа
        #[arg(long = "in-format", value_enum)]
        in_format: InFmt,

        /// Формат выхода
        #[arg(long = "out-format", value_enum, default_value = "text")]
        out_format: OutFmt,

        /// Запретить несколько записей одной категории в счёте
        #[arg(long)]
        strict_categories: bool,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    let mut cfg = ResortConfig::from_env()?;
    if let Some(symbol) = cli.currency {
        cfg.currency_symbol = symbol;
    }

    match cli.command {
        Command::Transition {
            booking_id,
            current,
            requested,
            check_in,
            check_out,
            now,
            early,
        } => {
            let snapshot = BookingSnapshot::new(
                booking_id,
                current.parse::<Status>()?,
                parse_instant(&check_in)?,
                parse_instant(&check_out)?,
            )?;
            let request = StatusChangeRequest {
                requested_status: requested.parse::<Status>()?,
                early_completion_requested: early,
                now: match now {
                    Some(s) => parse_instant(&s)?,
                    None => cfg.local_now(),
                },
            };
            transition(&snapshot, &request)
        }
        Command::Statuses => {
            for status in Status::staff_options() {
                println!("{status}");
            }
            Ok(())
        }
        Command::Payments {
            input,
            output,
            in_format,
            out_format,
            strict_categories,
        } => {
            if strict_categories {
                cfg.duplicate_policy = DuplicatePolicy::Reject;
            }
            payments(&cfg, input, output, in_format, out_format)
        }
    }
}

fn transition(snapshot: &BookingSnapshot, request: &StatusChangeRequest) -> Result<()> {
    let tour = TourType::of(snapshot.check_in_at.date(), snapshot.check_out_at.date());
    println!(
        "Booking #{} ({tour}): {} -> {} at {}",
        snapshot.booking_id,
        snapshot.current_status,
        request.requested_status,
        request.now.format("%Y-%m-%d %H:%M:%S")
    );

    let outcome = evaluate(snapshot, request)?;
    if !outcome.allowed {
        println!(
            "denied: {}",
            outcome.denial_reason.as_deref().unwrap_or_default()
        );
        std::process::exit(EXIT_DENIED);
    }

    println!("allowed");
    if let Some(SideEffect::SetCheckOutDateTo(date)) = outcome.side_effect {
        println!("side effect: set check-out date to {}", date.format("%Y-%m-%d"));
    }
    println!(
        "audit: {}",
        audit::describe(
            snapshot.booking_id,
            &request.requested_status,
            outcome.side_effect.as_ref()
        )
    );
    Ok(())
}

fn payments(
    cfg: &ResortConfig,
    input: Option<String>,
    output: Option<String>,
    in_format: InFmt,
    out_format: OutFmt,
) -> Result<()> {
    // reader
    let reader: Box<dyn io::Read> = match input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };
    let br = BufReader::new(reader);

    let ledgers = match in_format {
        InFmt::Csv => Csv::read(br),
        InFmt::Xml => SimpleXml::read(br),
    }?;
    log::info!("read {} ledgers", ledgers.len());

    let report = Report::build(&ledgers, cfg.duplicate_policy)?;

    // writer
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    match out_format {
        OutFmt::Text => Text::write(&mut writer, &report, &cfg.currency_symbol),
        OutFmt::Csv => Csv::write(&mut writer, &report, &cfg.currency_symbol),
        OutFmt::Xml => SimpleXml::write(&mut writer, &report, &cfg.currency_symbol),
    }?;

    writer.flush().map_err(ResortError::from)
}
