mod command;
mod keymap;
mod leaderboard;
mod logging;
mod screens;
mod tui;
mod view;

fn main() -> anyhow::Result<()> {
    let result = command::run();
    logging::flush();
    result
}
