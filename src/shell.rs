//! Terminal front end over the loaded table.
//!
//! Each operator action (load, report, plot, user search, system listing)
//! runs to completion before the next one is read. Actions that need data
//! are refused until a load has succeeded, and a failed load never disturbs
//! the table already in memory.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use log::debug;

use crate::chart::{DEFAULT_BAR_WIDTH, count_by_system, render_bar_chart};
use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::inactivity::{InactivityThreshold, find_inactive};
use crate::loader::MissingLoginPolicy;
use crate::lookup::{find_by_system, find_by_user_id, systems};
use crate::record::UserTable;
use crate::report::{format_report, format_system_listing, format_user_lines, write_report};
use crate::session::Session;

/// Printed whenever a data-dependent action is attempted with nothing loaded
pub const NO_DATA_MESSAGE: &str = "No data loaded. Use 'load <path>' first.";

const PROMPT: &str = "> ";

/// ANSI "erase screen, cursor home"
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

const HELP: &str = "\
Commands:
  load <path>      Load a user-access CSV (replaces the current data)
  report [path]    Write the inactive-user report
  plot             Show inactive users per system as a bar chart
  user <id>        Show every access row of a UserID
  system <name>    List the users of a system
  systems          List the systems present in the data
  status           Show what is loaded
  clear            Clear the screen
  help             Show this help
  quit             Leave";

/// Effective settings after merging config file and command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub report_path: PathBuf,
    pub threshold: InactivityThreshold,
    pub policy: MissingLoginPolicy,
    pub bar_width: usize,
}

impl Settings {
    pub fn from_config(config: &AuditConfig) -> Self {
        Self {
            input: config.data_path.clone(),
            report_path: config.report_path.clone(),
            threshold: config.threshold(),
            policy: config.missing_login,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

/// Whether the interactive loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFlow {
    Continue,
    Quit,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub struct Shell {
    session: Session,
    settings: Settings,
    clock: fn() -> NaiveDateTime,
}

impl Shell {
    pub fn new(settings: Settings) -> Self {
        Self {
            session: Session::new(settings.policy),
            settings,
            clock: local_now,
        }
    }

    /// Replaces the wall clock used to evaluate inactivity
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Loads `path` into the session and reports the row count.
    pub fn load<W: Write>(&mut self, path: &Path, out: &mut W) -> Result<()> {
        let loaded = self.session.load(path)?;
        writeln!(
            out,
            "Loaded {} users from {}",
            loaded.table.len(),
            loaded.source.display()
        )?;
        Ok(())
    }

    /// Filters, formats and writes the report to `path` (or the configured path)
    pub fn generate_report<W: Write>(&self, path: Option<&Path>, out: &mut W) -> Result<()> {
        let Some(table) = self.require_table(out)? else {
            return Ok(());
        };
        let path = path.unwrap_or(&self.settings.report_path);
        let inactive = self.inactive(table);
        let text = format_report(table, &inactive, self.settings.threshold);
        write_report(&text, path)?;
        writeln!(out, "Report successfully generated: {}", path.display())?;
        Ok(())
    }

    pub fn plot<W: Write>(&self, out: &mut W) -> Result<()> {
        let Some(table) = self.require_table(out)? else {
            return Ok(());
        };
        writeln!(out, "Generating plot...")?;
        let counts = count_by_system(&self.inactive(table));
        write!(out, "{}", render_bar_chart(&counts, self.settings.bar_width))?;
        Ok(())
    }

    pub fn search_user<W: Write>(&self, user_id: &str, out: &mut W) -> Result<()> {
        if user_id.is_empty() {
            writeln!(out, "Please enter a UserID.")?;
            return Ok(());
        }
        let Some(table) = self.require_table(out)? else {
            return Ok(());
        };

        let rows = find_by_user_id(table, user_id);
        if rows.is_empty() {
            writeln!(out, "No user found with UserID '{}'.", user_id)?;
        } else {
            writeln!(out, "User data for UserID '{}':", user_id)?;
            for line in format_user_lines(&rows) {
                writeln!(out, "{}", line)?;
            }
        }
        Ok(())
    }

    pub fn list_system<W: Write>(&self, system: &str, out: &mut W) -> Result<()> {
        if system.is_empty() {
            writeln!(out, "Please enter a System name.")?;
            return Ok(());
        }
        let Some(table) = self.require_table(out)? else {
            return Ok(());
        };

        let rows = find_by_system(table, system);
        if rows.is_empty() {
            writeln!(out, "No users found for System '{}'.", system)?;
        } else {
            writeln!(out, "Users of System '{}' ({}):", system, rows.len())?;
            write!(out, "{}", format_system_listing(&rows))?;
        }
        Ok(())
    }

    fn list_systems<W: Write>(&self, out: &mut W) -> Result<()> {
        let Some(table) = self.require_table(out)? else {
            return Ok(());
        };
        writeln!(out, "Systems: {}", systems(table).join(", "))?;
        Ok(())
    }

    fn status<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.session.current() {
            Some(loaded) => writeln!(
                out,
                "Loaded {} users from {} (threshold: {} days)",
                loaded.table.len(),
                loaded.source.display(),
                self.settings.threshold.as_days()
            )?,
            None => writeln!(out, "{}", NO_DATA_MESSAGE)?,
        }
        Ok(())
    }

    /// Runs one command line. Domain failures are printed; only terminal
    /// I/O failures are returned.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<ShellFlow> {
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        debug!("shell command {:?} {:?}", command, argument);

        let result = match command {
            "" => Ok(()),
            "load" | "upload" => {
                if argument.is_empty() {
                    writeln!(out, "Please enter a file path.")?;
                    Ok(())
                } else {
                    self.load(Path::new(argument), out)
                }
            }
            "report" => {
                let path = (!argument.is_empty()).then(|| Path::new(argument));
                self.generate_report(path, out)
            }
            "plot" => self.plot(out),
            "user" => self.search_user(argument, out),
            "system" => self.list_system(argument, out),
            "systems" => self.list_systems(out),
            "status" => self.status(out),
            "clear" => write!(out, "{}", CLEAR_SCREEN).map_err(AuditError::from),
            "help" => writeln!(out, "{}", HELP).map_err(AuditError::from),
            "quit" | "exit" => return Ok(ShellFlow::Quit),
            other => {
                writeln!(out, "Unknown command '{}'. Type 'help' for a list of commands.", other)?;
                Ok(())
            }
        };

        match result {
            Ok(()) => {}
            Err(AuditError::Io(e)) => return Err(AuditError::Io(e)),
            Err(e) => writeln!(out, "Error: {}", e)?,
        }
        Ok(ShellFlow::Continue)
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "Type 'help' for a list of commands.")?;
        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;
            let Some(line) = lines.next() else {
                writeln!(out)?;
                break;
            };
            if self.execute(&line?, out)? == ShellFlow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn require_table<W: Write>(&self, out: &mut W) -> Result<Option<&UserTable>> {
        let table = self.session.table();
        if table.is_none() {
            writeln!(out, "{}", NO_DATA_MESSAGE)?;
        }
        Ok(table)
    }

    fn inactive(&self, table: &UserTable) -> UserTable {
        find_inactive(table, self.settings.threshold, (self.clock)())
    }
}
