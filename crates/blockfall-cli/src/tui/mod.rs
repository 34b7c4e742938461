mod app;
mod event;
mod event_loop;
mod runner;
mod screen;

pub use self::{
    app::App,
    event_loop::RenderMode,
    runner::Tui,
    screen::{Screen, ScreenStack, ScreenTransition},
};
