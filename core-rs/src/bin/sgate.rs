//! sgate - schoolgate CLI
//!
//! Inspect what the access gate would do for a given viewer, without a
//! browser in the loop.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use schoolgate::{
    AccessDecision, AccessGate, GateConfig, GateView, Navigator, Permission, Session,
    SessionStatus, SoftGate, UserId,
};

#[derive(Parser)]
#[command(name = "sgate")]
#[command(version)]
#[command(about = "School website access gate", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the gate for one viewer and permission
    Check {
        /// Gate config file (defaults to an empty in-memory store)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
        /// Viewer's user id
        #[arg(long, short = 'u')]
        user: Option<String>,
        /// Session status: unauthenticated, loading, authenticated
        #[arg(long, default_value = "authenticated")]
        status: SessionStatus,
        /// Required permission (omit to see the default-deny behaviour)
        #[arg(long, short = 'p')]
        permission: Option<Permission>,
        /// Use the soft (section-hiding) gate instead of the hard gate
        #[arg(long)]
        soft: bool,
    },
    /// List recognized permission names
    Permissions,
    /// Load and validate a gate config file
    ValidateConfig {
        /// Config file path
        path: PathBuf,
    },
}

/// Navigator that reports redirects on stdout
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn navigate(&self, path: &str) {
        println!("  {} {}", "redirect →".cyan(), path);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("schoolgate=debug,sgate=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn paint(decision: &AccessDecision) -> colored::ColoredString {
    match decision {
        AccessDecision::Granted => decision.to_string().green().bold(),
        AccessDecision::Pending => decision.to_string().yellow().bold(),
        AccessDecision::Denied(_) => decision.to_string().red().bold(),
    }
}

fn exit_code(decision: &AccessDecision) -> ExitCode {
    match decision {
        AccessDecision::Granted => ExitCode::SUCCESS,
        AccessDecision::Denied(_) => ExitCode::from(2),
        AccessDecision::Pending => ExitCode::from(3),
    }
}

async fn handle_check(
    config_path: Option<PathBuf>,
    user: Option<String>,
    status: SessionStatus,
    permission: Option<Permission>,
    soft: bool,
) -> anyhow::Result<ExitCode> {
    let config = match &config_path {
        Some(path) => GateConfig::load(path)
            .with_context(|| format!("Failed to load gate config {}", path.display()))?,
        None => GateConfig::new("cli".to_string()),
    };

    let lookup = config.build_lookup()?;
    let user_id = user.map(UserId::new).transpose()?;
    let session = Session { user_id, status };

    let mut gate = AccessGate::new();
    let decision = gate.refresh(&session, permission, &lookup).await;

    println!("Store:      {}", lookup.store_name());
    println!(
        "Session:    {} {}",
        session.status.as_str(),
        session
            .user_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Permission: {}",
        permission
            .map(|p| p.to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("Decision:   {}", paint(&decision));

    if soft {
        match SoftGate.present(&decision, || ()) {
            Some(()) => println!("  section rendered"),
            None => println!("  section omitted"),
        }
    } else {
        match config.hard_gate().present(&decision, &PrintNavigator, || ()) {
            GateView::Content(()) => println!("  page rendered"),
            GateView::Loading => println!("  loading indicator"),
            GateView::Redirected(_) => {}
        }
    }

    Ok(exit_code(&decision))
}

fn handle_permissions() {
    println!("Recognized permissions:");
    for permission in Permission::ALL {
        println!("  {}", permission);
    }
}

fn handle_validate_config(path: PathBuf) -> anyhow::Result<ExitCode> {
    let config = GateConfig::load(&path)
        .with_context(|| format!("Invalid gate config {}", path.display()))?;

    println!("{} {}", "✓".green(), path.display());
    println!("  Name:         {}", config.metadata.name);
    println!("  Public root:  {}", config.spec.redirects.public_root);
    println!("  Unauthorized: {}", config.spec.redirects.unauthorized);
    match config.lookup_timeout() {
        Some(timeout) => println!("  Timeout:      {} ms", timeout.as_millis()),
        None => println!("  Timeout:      none"),
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check {
            config,
            user,
            status,
            permission,
            soft,
        } => handle_check(config, user, status, permission, soft).await,
        Commands::Permissions => {
            handle_permissions();
            Ok(ExitCode::SUCCESS)
        }
        Commands::ValidateConfig { path } => handle_validate_config(path),
    }
}
