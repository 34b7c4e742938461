use std::path::Path;

use blockfall_engine::PieceSeed;

use crate::screens::{SoloOptions, SoloScreen};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Name to submit to the leaderboard; scores are not saved without one
    #[clap(long)]
    pub(crate) nickname: Option<String>,
    /// Piece sequence seed as 32 hex digits; reused on restart
    #[clap(long)]
    pub(crate) seed: Option<PieceSeed>,
}

pub(crate) fn run(arg: &PlayArg, leaderboard: &Path) -> anyhow::Result<()> {
    let PlayArg { nickname, seed } = arg;
    if let Some(seed) = seed {
        log::info!("solo game with seed {seed}");
    }
    let screen = SoloScreen::new(SoloOptions {
        nickname: nickname.clone(),
        leaderboard: leaderboard.to_path_buf(),
        seed: *seed,
    });
    super::run_screen(Box::new(screen))
}
