//! Check command implementation.

use crate::error::Result;
use crate::output::Formatter;
use crate::session::Session;

/// Execute the check command.
pub fn execute_check(session: &Session, formatter: &Formatter) -> Result<()> {
    println!(
        "{}",
        formatter.format_diagnostics(
            &session.corpus.entity_report,
            &session.corpus.relation_report,
            &session.diagnostics,
        )?
    );
    Ok(())
}
