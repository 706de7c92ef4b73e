//! Stock recommendation crew CLI
//!
//! Runs the four-agent crew once and sends the final report to the
//! configured messaging endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Credentials can also live in a .env file
//! export GOOGLE_API_KEY="..."
//! export GROQ_API_KEY="..."
//! export WHATSAPP_API_URL="https://..."
//! export WHATSAPP_ACCESS_TOKEN="..."
//! export WHATSAPP_DESTINATION="5511999999999"
//!
//! cargo run --bin stock-crew -- --summary
//! ```

use anyhow::Context as _;
use clap::Parser;
use crew_notify::HttpNotifier;
use crew_tools::DuckDuckGoSearch;
use crew_utils::{LogFormat, init_tracing_with, load_dotenv};
use std::process::ExitCode;
use std::sync::Arc;
use stock_crew::{
    CrewConfig, CrewError, Delivery, EXIT_PIPELINE, ResponseLanguage, assemble_pipeline,
    provider_registry, run_and_deliver, summary_table,
};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "stock-crew", version, about = "Four-agent B3 stock recommendation crew")]
struct Cli {
    /// Prompt language (pt-BR or en); overrides CREW_LANGUAGE
    #[arg(long)]
    language: Option<ResponseLanguage>,

    /// Run the crew without sending the report
    #[arg(long)]
    dry_run: bool,

    /// Print a per-task summary table after the report
    #[arg(long)]
    summary: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = load_dotenv();
    let cli = Cli::parse();

    init_tracing_with(if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    });
    if dotenv_loaded {
        info!("Loaded .env file");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            let code = err
                .downcast_ref::<CrewError>()
                .map_or(EXIT_PIPELINE, CrewError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = CrewConfig::from_env(!cli.dry_run)?;
    if let Some(language) = cli.language {
        config.language = language;
    }

    info!(
        language = %config.language,
        gemini_model = %config.gemini_model,
        dry_run = cli.dry_run,
        "Starting stock crew"
    );

    let notifier = config
        .notifier
        .clone()
        .map(HttpNotifier::new)
        .transpose()
        .map_err(CrewError::from)?;

    let registry = provider_registry(&config)?;
    let search = Arc::new(DuckDuckGoSearch::new().map_err(CrewError::from)?);
    let mut pipeline = assemble_pipeline(&config, &registry, search)?;

    let delivery = notifier.as_ref().map(|n| Delivery {
        notifier: n,
        destination: &n.config().destination,
    });

    let report = run_and_deliver(&mut pipeline, delivery)
        .await
        .context("Stock crew run failed")?;

    println!("{}", report.report());

    if cli.summary {
        println!("\n{}", summary_table(&report.output));
    }

    match &report.delivery {
        Some(result) if result.success => eprintln!("Report delivered."),
        Some(result) => eprintln!(
            "Report delivery failed{}",
            result
                .status
                .map(|s| format!(" (HTTP {s})"))
                .unwrap_or_default()
        ),
        None => {}
    }

    Ok(())
}
