//! User Access Audit - Main Application
//!
//! Entry point for the inactive-user reporting tool; see the `audit_cli`
//! module for commands and options.
//!
//! # Usage
//!
//! ```bash
//! $ cargo run --release -- report
//! $ cargo run --release -- --input path/to/users.csv --days 30 report
//! ```

use user_access_audit::audit_cli::user_access_audit_main;

fn main() {
    user_access_audit_main();
}
