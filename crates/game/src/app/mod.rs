pub(crate) mod bootstrap;
mod config;
mod hud;
mod items;
pub(crate) mod loop_runner;
mod probe;
mod stage;
mod stations;
