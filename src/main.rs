//! mixgen CLI entrypoint
//! Parses command-line arguments and dispatches to the generation use case.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use mixgen::application::{
    ApplicationError, DirectoryStatus, GenerateRequest, GenerateUseCase,
};
use mixgen::core::config::CONFIG_FILE_NAME;
use mixgen::core::{Config, FormatterKind};
use mixgen::generation::{GenerationOrchestrator, PackageOutcome};
use mixgen::infrastructure::generation::select_formatter;
use mixgen::infrastructure::output::FileSystemOutputService;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mixgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate code for every type that embeds a template in the given package directories
    Generate {
        /// Package directories to process
        #[arg(default_value = ".")]
        directories: Vec<PathBuf>,
        /// Configuration file
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
        /// Name of the generated file in each directory
        #[arg(long)]
        output_file: Option<String>,
        /// Formatter applied to generated source (gofmt or syntax-check)
        #[arg(long)]
        formatter: Option<FormatterKind>,
        /// Process directories concurrently
        #[arg(long)]
        parallel: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with default level INFO, diagnostics on stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            directories,
            config,
            output_file,
            formatter,
            parallel,
        } => {
            generate(GenerateParams {
                directories,
                config,
                output_file,
                formatter,
                parallel,
            })
            .await?
        }
    }
    Ok(())
}

struct GenerateParams {
    directories: Vec<PathBuf>,
    config: PathBuf,
    output_file: Option<String>,
    formatter: Option<FormatterKind>,
    parallel: bool,
}

async fn generate(params: GenerateParams) -> anyhow::Result<()> {
    let mut config = Config::load(&params.config)
        .await
        .with_context(|| format!("Failed to load config from {}", params.config.display()))?;

    // CLI flags win over the config file
    if let Some(output_file) = params.output_file {
        config.output_file = output_file;
    }
    if let Some(formatter) = params.formatter {
        config.formatter = formatter;
    }
    config.parallel |= params.parallel;
    config.validate().context("Invalid configuration")?;

    info!(
        output_file = %config.output_file,
        formatter = %config.formatter,
        "Starting mixgen"
    );

    let abort = Arc::new(AtomicBool::new(false));
    spawn_interrupt_handler(Arc::clone(&abort));

    let parallel = config.parallel;
    let formatter = select_formatter(&config);
    let orchestrator = Arc::new(GenerationOrchestrator::new(
        config,
        formatter,
        Arc::new(FileSystemOutputService::new()),
    ));
    let use_case = GenerateUseCase::new(orchestrator).with_abort_flag(abort);

    let request = GenerateRequest::new(params.directories).with_parallel(parallel);
    let response = use_case.execute(request).await?;

    for report in &response.reports {
        if let DirectoryStatus::Completed(PackageOutcome::Written { path, .. }) = &report.status {
            println!("{}", path.display());
        }
    }

    let total = response.reports.len();
    let failed = response.failures().count();
    if failed > 0 {
        return Err(ApplicationError::DirectoriesFailed { failed, total }.into());
    }

    info!(
        directories = total,
        written = response.written(),
        "Generation complete"
    );
    Ok(())
}

/// First Ctrl-C stops new directories from starting; a second one exits
fn spawn_interrupt_handler(abort: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupted, finishing directories already in progress");
        abort.store(true, Ordering::SeqCst);

        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });
}
