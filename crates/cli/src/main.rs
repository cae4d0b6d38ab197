use crate::{
    env::{DEFAULT_LOCALE_VAR, EnvManager},
    error::CliError,
};
use clap::Parser;
use connectors::contentful::{client::ContentfulClient, config::ContentfulConfig};
use engine_processing::producer::{ProducerConfig, config::DEFAULT_CONTENT_TYPE};
use engine_runtime::execution::executor::{self, DEFAULT_OUTPUT_PATH, ExportPlan};
use model::{core::locale::LocaleSelection, pagination::page::DEFAULT_PAGE_SIZE};
use std::{path::PathBuf, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod env;
mod error;
mod output;

#[derive(Parser, Debug)]
#[command(
    name = "product-feed",
    version = "0.1.0",
    about = "Export Contentful products to a flat CSV feed"
)]
struct Cli {
    /// Destination of the CSV feed; replaced on every run
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    #[arg(long, default_value = DEFAULT_CONTENT_TYPE)]
    content_type: String,

    /// Entries requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Optional dotenv file; variables already set in the environment win
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Write a JSON run report (counts and skipped entries) to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(err) = export(cli).await {
        error!("Export failed: {err}");
        return Err(err);
    }

    info!("Done!");
    Ok(())
}

async fn export(cli: Cli) -> Result<(), CliError> {
    let mut env = EnvManager::new();
    if env.load_if_present(&cli.env_file)? {
        info!("Loaded environment from {}", cli.env_file.display());
    }

    let config = ContentfulConfig::from_vars(env.all())?;
    let locale = LocaleSelection::from_code(env.get(DEFAULT_LOCALE_VAR));
    let source = Arc::new(ContentfulClient::new(config)?);

    let plan = ExportPlan {
        producer: ProducerConfig::default()
            .with_content_type(cli.content_type)
            .with_page_size(cli.page_size),
        locale,
        output: cli.output,
    };

    let summary = executor::run(source, plan).await?;

    if let Some(path) = cli.report {
        output::write_report(&summary, &path).await?;
        info!("Run report written to {}", path.display());
    }

    Ok(())
}
