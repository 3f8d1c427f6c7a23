mod focus;
mod input;
mod interaction;
mod loop_runner;
mod player;
mod session;
mod space;
pub mod tools;
mod world;

#[cfg(test)]
mod test_support;

pub use focus::{FocusChanged, FocusDetector, FocusProbe, LayerMask, SenseConfig};
pub use input::{ConsoleKey, InputCollector, InputSnapshot};
pub use interaction::{
    HoverState, Interactable, InteractableKind, InteractionResult, PlayerUi, TickContext,
};
pub use loop_runner::{FixedStepClock, FrameTime, LoopConfig, TickPlan};
pub use player::{HeldItem, ItemTag, Player, PlayerId, PlayerRig};
pub use session::{BoundPlayer, Session, SessionFlow, SessionHooks, SessionState};
pub use space::{Quat, Transform, Vec3};
pub use world::{EntityId, EntityIdAllocator, InteractableWorld};
