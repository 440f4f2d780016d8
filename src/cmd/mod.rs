pub mod add;
pub mod delete;
pub mod edit;
pub mod init;
pub mod root;
pub mod timeline;
pub mod upcoming;

use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Parses a `YYYY-MM-DD` command-line date.
pub(crate) fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}
