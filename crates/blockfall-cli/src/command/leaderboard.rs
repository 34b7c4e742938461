use std::{
    io::{self, Write as _},
    path::Path,
};

use anyhow::Context as _;

use crate::leaderboard::{JsonFileLeaderboard, Leaderboard as _};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct LeaderboardArg {
    /// Print the entries as JSON
    #[clap(long)]
    json: bool,
}

pub(crate) fn run(arg: &LeaderboardArg, path: &Path) -> anyhow::Result<()> {
    let leaderboard = JsonFileLeaderboard::new(path);
    let top = leaderboard.top()?;

    let mut out = io::stdout().lock();
    if arg.json {
        serde_json::to_writer_pretty(&mut out, &top).context("Failed to write JSON")?;
        writeln!(out)?;
        return Ok(());
    }
    if top.is_empty() {
        writeln!(out, "no scores in {}", leaderboard.path().display())?;
        return Ok(());
    }
    writeln!(out, "{:>2}  {:<16} {:>7} {:>3}  DATE", "#", "NICKNAME", "SCORE", "LV")?;
    for (rank, entry) in top.iter().enumerate() {
        let date = entry
            .local_time()
            .map_or_else(String::new, |time| time.format("%Y-%m-%d %H:%M").to_string());
        writeln!(
            out,
            "{:>2}  {:<16} {:>7} {:>3}  {date}",
            rank + 1,
            entry.nickname,
            entry.score,
            entry.level
        )?;
    }
    Ok(())
}
