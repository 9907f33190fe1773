//! Inactive-user detection and reporting over a user-access CSV.
//!
//! The core is four read-only steps: [`loader::load`] a table,
//! [`inactivity::find_inactive`] over it, [`report::format_report`] and
//! [`report::write_report`] the result, plus [`lookup`] and
//! [`chart::count_by_system`] for on-screen views. [`shell`] and
//! [`audit_cli`] are the terminal front end.

pub mod audit_cli;
pub mod chart;
pub mod config;
pub mod error;
pub mod inactivity;
pub mod loader;
pub mod lookup;
pub mod record;
pub mod report;
pub mod session;
pub mod shell;
