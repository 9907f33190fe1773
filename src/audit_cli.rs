//! # User Access Audit
//!
//! Loads a user-access CSV (`UserID, First Name, Last Name, System, Role,
//! LastLogin`) and reports on users who have not logged in within a
//! configurable window.
//!
//! ## Usage
//!
//! ```bash
//! # Write report.txt for users_access.csv with the default 90-day window
//! $ user_access_audit report
//!
//! # Other input, 30-day window, custom destination
//! $ user_access_audit -i exports/access.csv -d 30 report -o out/inactive.txt
//!
//! # Inactive users per system as a bar chart
//! $ user_access_audit plot
//!
//! # Every access row of one user, every user of one system
//! $ user_access_audit user U1001
//! $ user_access_audit system HR
//!
//! # Interactive session
//! $ user_access_audit shell
//! ```
//!
//! Settings come from `user_access_audit.toml` (or `--config`), then from the
//! command line.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Parser, Subcommand};
use log::{LevelFilter, info};

use crate::chart::{DEFAULT_BAR_WIDTH, MAX_BAR_WIDTH};
use crate::config::AuditConfig;
use crate::error::Result;
use crate::inactivity::InactivityThreshold;
use crate::loader::MissingLoginPolicy;
use crate::shell::{NO_DATA_MESSAGE, Settings, Shell};

#[derive(Parser, Debug)]
#[command(
    name = "user_access_audit",
    about = "Inactive-user reporting over a user-access CSV",
    after_long_help = "Examples:\n  user_access_audit report\n  user_access_audit -i access.csv -d 30 report -o inactive.txt\n  user_access_audit plot --width 60\n  user_access_audit user U1001\n  user_access_audit system HR\n  user_access_audit shell"
)]
pub struct Args {
    /// TOML config file (default: ./user_access_audit.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// User-access CSV to load
    #[arg(long, short = 'i', global = true)]
    pub input: Option<PathBuf>,
    /// Days without login after which a user counts as inactive
    #[arg(long, short = 'd', global = true, allow_negative_numbers = true)]
    pub days: Option<i64>,
    /// Fail the load on an unparseable LastLogin instead of treating the user as inactive
    #[arg(long, global = true, default_value_t = false)]
    pub strict_dates: bool,
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only log errors
    #[arg(long, short = 'q', global = true, default_value_t = false)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the inactive-user report
    Report {
        /// Report destination (overwritten)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Print inactive users per system as a bar chart
    Plot {
        /// Length of the longest bar
        #[arg(
            long,
            default_value_t = DEFAULT_BAR_WIDTH,
            value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_BAR_WIDTH as u64)
        )]
        width: usize,
    },
    /// Show every access row of a UserID
    User { user_id: String },
    /// List the users of a system
    System { name: String },
    /// Interactive session
    Shell,
}

/// Command-line values layered over the config file
pub fn resolve_settings(args: &Args, config: &AuditConfig) -> Settings {
    let mut settings = Settings::from_config(config);
    if let Some(input) = &args.input {
        settings.input = input.clone();
    }
    if let Some(days) = args.days {
        settings.threshold = InactivityThreshold::days(days);
    }
    if args.strict_dates {
        settings.policy = MissingLoginPolicy::Reject;
    }
    match &args.command {
        Command::Report { output: Some(output) } => settings.report_path = output.clone(),
        Command::Plot { width } => settings.bar_width = *width,
        _ => {}
    }
    settings
}

fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if quiet {
        builder.filter_level(LevelFilter::Error);
    } else if verbose > 0 {
        let level = match verbose {
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        builder.filter_level(level);
    }
    builder.init();
}

/// Executes one parsed command line against `out`.
///
/// One-shot commands load the input first and fail if it cannot be loaded;
/// the interactive shell starts with the input loaded when it exists.
pub fn run<W: io::Write>(args: Args, out: &mut W) -> Result<()> {
    let config = AuditConfig::discover(args.config.as_deref())?;
    let settings = resolve_settings(&args, &config);
    info!(
        "input {}, threshold {} days, report {}",
        settings.input.display(),
        settings.threshold.as_days(),
        settings.report_path.display()
    );

    let input = settings.input.clone();
    let mut shell = Shell::new(settings);

    match args.command {
        Command::Shell => {
            if args.input.is_some() || input.is_file() {
                // reported inside the session; the shell stays usable without data
                if let Err(e) = shell.load(&input, out) {
                    writeln!(out, "Error: {}", e)?;
                    writeln!(out, "{}", NO_DATA_MESSAGE)?;
                }
            }
            let stdin = io::stdin();
            if !stdin.is_terminal() {
                info!("Reading shell commands from a pipe");
            }
            shell.run(stdin.lock(), out)
        }
        Command::Report { .. } => {
            shell.load(&input, out)?;
            shell.generate_report(None, out)
        }
        Command::Plot { .. } => {
            shell.load(&input, out)?;
            shell.plot(out)
        }
        Command::User { user_id } => {
            shell.load(&input, out)?;
            shell.search_user(&user_id, out)
        }
        Command::System { name } => {
            shell.load(&input, out)?;
            shell.list_system(&name, out)
        }
    }
}

/// Main entry point for the user access audit tool.
///
/// Parses arguments, installs logging and runs the requested command,
/// exiting with status 1 on any failure.
pub fn user_access_audit_main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run(args, &mut out) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
