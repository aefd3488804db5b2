//! Owners command implementation.

use crate::cli::OwnersArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;

/// Execute the owners command.
pub fn execute_owners(args: &OwnersArgs, session: &Session, formatter: &Formatter) -> Result<()> {
    let report = session.owners(args)?;
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}
