use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::{
    logging,
    tui::{Screen, ScreenStack, Tui},
};

mod leaderboard;
mod menu;
mod play;
mod versus;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Append log records to this file
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// Minimum level written to the log file
    #[clap(long, global = true, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
    /// JSON file holding solo high scores
    #[clap(long, global = true, default_value = "blockfall-leaderboard.json")]
    leaderboard: PathBuf,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Choose a mode from a menu (default)
    Menu(#[clap(flatten)] menu::MenuArg),
    /// Play a solo game
    Play(#[clap(flatten)] play::PlayArg),
    /// Play a two-player match on one keyboard
    Versus(#[clap(flatten)] versus::VersusArg),
    /// Print the best solo scores
    Leaderboard(#[clap(flatten)] leaderboard::LeaderboardArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    if let Some(path) = &args.log_file {
        logging::init(path, args.log_level)?;
    }
    match args.mode.unwrap_or(Mode::Menu(menu::MenuArg::default())) {
        Mode::Menu(arg) => menu::run(&arg, &args.leaderboard)?,
        Mode::Play(arg) => play::run(&arg, &args.leaderboard)?,
        Mode::Versus(arg) => versus::run(&arg)?,
        Mode::Leaderboard(arg) => leaderboard::run(&arg, &args.leaderboard)?,
    }
    Ok(())
}

fn run_screen(screen: Box<dyn Screen>) -> anyhow::Result<()> {
    let mut stack = ScreenStack::new(screen);
    Tui::new().run(&mut stack)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = CommandArgs::try_parse_from([
            "blockfall",
            "play",
            "--nickname",
            "ada",
            "--leaderboard",
            "scores.json",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.leaderboard, PathBuf::from("scores.json"));
        assert_eq!(args.log_level, LevelFilter::Debug);
        let Some(Mode::Play(play)) = args.mode else {
            panic!("expected play mode");
        };
        assert_eq!(play.nickname.as_deref(), Some("ada"));
    }

    #[test]
    fn test_seed_must_be_hex() {
        let seed = "00112233445566778899aabbccddeeff";
        assert!(CommandArgs::try_parse_from(["blockfall", "play", "--seed", seed]).is_ok());
        assert!(CommandArgs::try_parse_from(["blockfall", "play", "--seed", "xyz"]).is_err());
    }

    #[test]
    fn test_versus_duration_must_be_positive() {
        assert!(CommandArgs::try_parse_from(["blockfall", "versus", "--duration", "0"]).is_err());
        let args =
            CommandArgs::try_parse_from(["blockfall", "versus", "--duration", "90"]).unwrap();
        let Some(Mode::Versus(versus)) = args.mode else {
            panic!("expected versus mode");
        };
        assert_eq!(versus.duration, 90);
    }
}
