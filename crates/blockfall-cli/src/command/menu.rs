use std::path::Path;

use blockfall_engine::{DEFAULT_MATCH_SECS, MatchConfig};

use crate::screens::{MenuScreen, SoloOptions, VersusOptions};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MenuArg {
    /// Name to submit to the leaderboard after solo games
    #[clap(long)]
    nickname: Option<String>,
    /// Versus match length in seconds
    #[clap(long, default_value_t = DEFAULT_MATCH_SECS, value_parser = clap::value_parser!(u32).range(1..))]
    duration: u32,
}

impl Default for MenuArg {
    fn default() -> Self {
        Self {
            nickname: None,
            duration: DEFAULT_MATCH_SECS,
        }
    }
}

pub(crate) fn run(arg: &MenuArg, leaderboard: &Path) -> anyhow::Result<()> {
    let solo = SoloOptions {
        nickname: arg.nickname.clone(),
        leaderboard: leaderboard.to_path_buf(),
        seed: None,
    };
    let versus = VersusOptions {
        config: MatchConfig {
            duration_secs: arg.duration,
            ..MatchConfig::default()
        },
        seed: None,
    };
    super::run_screen(Box::new(MenuScreen::new(solo, versus)))
}
