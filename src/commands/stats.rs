use crate::commands::Out;
use crate::session::Session;
use crate::stats::Stats;

/// Computes dashboard statistics from the session's current records.
pub fn stats(session: &Session) -> Out<Stats> {
    let stats = session.stats();
    Out::new(format!("Dashboard\n\n{stats}"), stats)
}
