//! @ai:module:intent CLI for the project report service
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use project_reports::{
    build_router, service::language_name, ProjectData, ProviderAvailability, ReportService,
    ServiceConfig, TemplateRequest,
};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_CONFIG: &str = "reports.toml";

#[derive(Parser)]
#[command(name = "project-reports")]
#[command(about = "Structured and AI-narrated project reports over HTTP")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Address to listen on, overrides the configuration
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List template languages found on disk
    Languages {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate one template report and print it
    Generate {
        /// JSON file holding the project data fields
        #[arg(short, long)]
        data: PathBuf,

        /// Template language
        #[arg(short, long)]
        language: Option<String>,

        /// Output format (json or csv)
        #[arg(short, long)]
        output_format: Option<String>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("project_reports=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind } => serve(config, bind).await,
        Commands::Languages { config } => list_languages(config),
        Commands::Generate {
            data,
            language,
            output_format,
            config,
        } => generate_once(config, data, language, output_format).await,
        Commands::Init { output } => init_config(output),
    }
}

/// @ai:intent Probe providers once, build the service and serve until ctrl-c
/// @ai:effects network, fs:read
async fn serve(config: Option<PathBuf>, bind: Option<String>) -> Result<()> {
    let mut config = load_or_default_config(config)?;
    if let Some(bind) = bind {
        config.server.bind_addr = bind;
    }

    let service = build_service(&config).await?;
    let app = build_router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!("Listening on {}", config.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

fn list_languages(config: Option<PathBuf>) -> Result<()> {
    let config = load_or_default_config(config)?;
    let resolver = project_reports::TemplateResolver::new(
        config.paths.template_root.clone(),
        config.generation.default_language.clone(),
    );

    let languages = resolver.list_supported_languages();
    if languages.is_empty() {
        println!("No template languages under {}", config.paths.template_root.display());
    }
    for code in languages {
        let formats: Vec<String> = resolver.list_formats(&code).into_iter().collect();
        println!("{:<4} {:<20} {}", code, language_name(&code), formats.join(", "));
    }
    Ok(())
}

/// @ai:intent Run the template pipeline once and print the rendered report
/// @ai:effects network, fs:read
async fn generate_once(
    config: Option<PathBuf>,
    data: PathBuf,
    language: Option<String>,
    output_format: Option<String>,
) -> Result<()> {
    let config = load_or_default_config(config)?;
    let raw = std::fs::read_to_string(&data)
        .with_context(|| format!("failed to read {}", data.display()))?;
    let project_data: ProjectData =
        serde_json::from_str(&raw).with_context(|| format!("invalid project data in {}", data.display()))?;

    let service = build_service(&config).await?;
    let stored = service
        .generate_template_report(TemplateRequest {
            project_data,
            language,
            output_format,
        })
        .await?;

    eprintln!(
        "{} ({} via {})",
        stored.report.id,
        stored.report.status.as_str(),
        stored.report.provider.as_deref().unwrap_or("-")
    );
    println!("{}", stored.rendered.body);
    Ok(())
}

fn init_config(output: PathBuf) -> Result<()> {
    let config = ServiceConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

async fn build_service(config: &ServiceConfig) -> Result<ReportService> {
    let availability = ProviderAvailability::probe(config).await;
    tracing::info!(
        "Provider availability: remote credential {}, local service {}",
        availability.remote_credential,
        availability.local_reachable
    );
    ReportService::from_config(config, &availability).context("failed to initialise report service")
}

/// @ai:intent Load configuration, or defaults, then overlay the environment
/// @ai:effects fs:read, env
fn load_or_default_config(path: Option<PathBuf>) -> Result<ServiceConfig> {
    let mut config = match path {
        Some(p) => ServiceConfig::load(&p).with_context(|| format!("failed to load {}", p.display()))?,
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG);
            if default_path.exists() {
                ServiceConfig::load(&default_path)?
            } else {
                ServiceConfig::default()
            }
        }
    };
    config.apply_env();
    Ok(config)
}
