mod rocket_computer;
mod weld_place;

pub(crate) use rocket_computer::{ComputerEvent, ConsoleState, ConsoleStation, RocketComputer};
#[cfg(test)]
pub(crate) use rocket_computer::{ComputerCommand, FUEL_TASK};
pub(crate) use weld_place::{WeldEvent, WeldPlace};
#[cfg(test)]
pub(crate) use weld_place::{NEEDS_PLATE_MESSAGE, WRONG_TOOL_MESSAGE};

pub(crate) type WeldStation = station_engine::Session<WeldPlace>;
