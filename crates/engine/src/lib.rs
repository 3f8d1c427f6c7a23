pub mod app;

pub use app::tools;
pub use app::{
    BoundPlayer, ConsoleKey, EntityId, EntityIdAllocator, FixedStepClock, FocusChanged,
    FocusDetector, FocusProbe, FrameTime, HeldItem, HoverState, InputCollector, InputSnapshot,
    Interactable, InteractableKind, InteractableWorld, InteractionResult, ItemTag, LayerMask,
    LoopConfig, Player, PlayerId, PlayerRig, PlayerUi, Quat, SenseConfig, Session, SessionFlow,
    SessionHooks, SessionState, TickContext, TickPlan, Transform, Vec3,
};
