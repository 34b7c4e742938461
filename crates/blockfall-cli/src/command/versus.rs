use blockfall_engine::{COUNTDOWN_FROM, DEFAULT_MATCH_SECS, MatchConfig, PieceSeed};

use crate::screens::{VersusOptions, VersusScreen};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct VersusArg {
    /// Match length in seconds
    #[clap(long, default_value_t = DEFAULT_MATCH_SECS, value_parser = clap::value_parser!(u32).range(1..))]
    pub(crate) duration: u32,
    /// Countdown before the match starts, in seconds
    #[clap(long, default_value_t = COUNTDOWN_FROM)]
    pub(crate) countdown: u8,
    /// Piece sequence seed shared by both players, as 32 hex digits
    #[clap(long)]
    pub(crate) seed: Option<PieceSeed>,
}

impl VersusArg {
    pub(crate) fn options(&self) -> VersusOptions {
        VersusOptions {
            config: MatchConfig {
                duration_secs: self.duration,
                countdown_from: self.countdown,
            },
            seed: self.seed,
        }
    }
}

pub(crate) fn run(arg: &VersusArg) -> anyhow::Result<()> {
    let options = arg.options();
    log::info!(
        "versus match: {}s, countdown {}",
        options.config.duration_secs,
        options.config.countdown_from
    );
    super::run_screen(Box::new(VersusScreen::new(options)))
}
