use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::app::App;
use crate::config::AppConfig;
use crate::dashboards::DashboardKind;
use crate::probe;

/// dashdeck - lazily loaded, tabbed terminal dashboards
#[derive(Parser, Debug)]
#[command(name = "dashdeck")]
#[command(about = "Tabbed terminal dashboards with lazy, abortable section loading")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of the default location
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Whether this invocation takes over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Run(_)))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive dashboard (default)
    Run(RunArgs),

    /// Load every section of a dashboard headlessly and report the outcome
    Probe(ProbeArgs),

    /// Show or initialise the configuration file
    Config(ConfigArgs),
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Dashboard to open
    #[arg(long, value_enum, default_value_t = DashboardKind::Finance)]
    pub dashboard: DashboardKind,

    /// Section to show first
    #[arg(long)]
    pub section: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Dashboard to probe
    #[arg(long, value_enum, default_value_t = DashboardKind::Finance)]
    pub dashboard: DashboardKind,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Write the default configuration if no file exists yet
    #[arg(long)]
    pub init: bool,

    /// Print the path of the configuration file only
    #[arg(long)]
    pub path: bool,
}

/// Dispatches CLI commands
pub struct CliHandler {
    config: AppConfig,
    config_path: PathBuf,
}

impl CliHandler {
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => AppConfig::default_path()?,
        };
        let config = AppConfig::load_from_file(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;

        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle CLI commands; no command means `run` with defaults
    pub async fn handle_command(&self, command: Option<Commands>) -> Result<()> {
        match command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
            Commands::Run(args) => self.handle_run(args).await,
            Commands::Probe(args) => self.handle_probe(args).await,
            Commands::Config(args) => self.handle_config(args),
        }
    }

    async fn handle_run(&self, args: RunArgs) -> Result<()> {
        if let Some(section) = &args.section {
            if args.dashboard.section(section).is_none() {
                return Err(anyhow!(
                    "the {} dashboard has no section '{}' (available: {})",
                    args.dashboard.title(),
                    section,
                    section_list(args.dashboard)
                ));
            }
        }

        info!(dashboard = args.dashboard.title(), "starting dashboard");
        let mut app = App::new(args.dashboard, &self.config, args.section.as_deref())?;
        app.run().await
    }

    async fn handle_probe(&self, args: ProbeArgs) -> Result<()> {
        let report = probe::run_probe(args.dashboard, &self.config).await?;

        if args.json {
            println!("{}", report.to_json()?);
        } else {
            print!("{}", report.render_text());
        }

        if report.is_healthy() {
            Ok(())
        } else {
            Err(anyhow!(
                "{} of {} sections did not load",
                report.failures(),
                report.sections.len()
            ))
        }
    }

    fn handle_config(&self, args: ConfigArgs) -> Result<()> {
        if args.path {
            println!("{}", self.config_path.display());
            return Ok(());
        }

        if args.init {
            if self.config_path.exists() {
                println!("Config already exists at {}", self.config_path.display());
            } else {
                AppConfig::default().save_to_file(&self.config_path)?;
                println!("Wrote default config to {}", self.config_path.display());
            }
            return Ok(());
        }

        println!("# {}", self.config_path.display());
        print!("{}", self.config.to_toml()?);
        Ok(())
    }
}

fn section_list(kind: DashboardKind) -> String {
    kind.sections()
        .iter()
        .map(|def| def.id)
        .collect::<Vec<_>>()
        .join(", ")
}
