use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use credit_report_pdf::{Error, RenderOptions, input, render};

/// Render a credit report JSON document into a paginated PDF.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Report JSON file
    input: PathBuf,

    /// Output PDF path. Defaults to `{label}_{YYYY-MM-DD}.pdf` in the current directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Currency symbol for derived totals
    #[arg(long)]
    currency: Option<String>,

    /// Font family to embed instead of Helvetica
    #[arg(long)]
    font: Option<String>,

    /// Days the report stays valid after generation
    #[arg(long)]
    validity_days: Option<i64>,

    /// Report label used in the title, footer and default filename
    #[arg(long)]
    label: Option<String>,
}

fn run(args: Args) -> Result<PathBuf, Error> {
    let mut options = RenderOptions::default();
    if let Some(symbol) = args.currency {
        options.currency_symbol = symbol;
    }
    if let Some(days) = args.validity_days {
        options.validity_days = days;
    }
    if let Some(label) = args.label {
        options.report_label = label;
    }
    options.font_family = args.font;

    let doc = input::parse(&args.input)?;
    let rendered = render(&doc, &options)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered.to_pdf_bytes()?)?;
            Ok(path)
        }
        None => rendered.save(&std::env::current_dir()?, &options.report_label),
    }
}

fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("credit_report_pdf=info");
    env_logger::Builder::from_env(env).init();

    match run(Args::parse()) {
        Ok(path) => {
            println!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
