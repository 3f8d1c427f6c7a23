use std::any::Any;

use tracing::{debug, info, warn};

use super::{
    HoverState, Interactable, InteractableKind, InteractionResult, PlayerId, PlayerRig, PlayerUi,
    TickContext, Transform,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionFlow {
    Continue,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundPlayer {
    pub player: PlayerId,
    pub saved_viewpoint: Transform,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    Unbound,
    Bound(BoundPlayer),
}

/// Station behavior plugged into [`Session`].
///
/// `check_requirements` is the only hook that may refuse a join. `on_tick`
/// runs every frame whether or not a player is bound, after the bound-only
/// hooks for that frame.
pub trait SessionHooks {
    fn hover_label(&self) -> &str;

    fn check_requirements(
        &mut self,
        player: &mut dyn PlayerRig,
        ui: &mut dyn PlayerUi,
    ) -> InteractionResult;

    fn on_join(&mut self, _player: &mut dyn PlayerRig, _ui: &mut dyn PlayerUi) {}

    fn on_leave(&mut self, _player: &mut dyn PlayerRig, _ui: &mut dyn PlayerUi) {}

    fn on_update(&mut self, _ctx: &mut TickContext<'_>) -> SessionFlow {
        SessionFlow::Continue
    }

    fn handles_fixed_update(&self) -> bool {
        false
    }

    fn on_fixed_update(&mut self, _ctx: &mut TickContext<'_>) {}

    fn on_tick(&mut self, _ctx: &mut TickContext<'_>) {}
}

pub struct Session<H> {
    camera_anchor: Transform,
    hover: HoverState,
    state: SessionState,
    hooks: H,
}

impl<H: SessionHooks> Session<H> {
    pub fn new(camera_anchor: Transform, hooks: H) -> Self {
        Self {
            camera_anchor,
            hover: HoverState::default(),
            state: SessionState::Unbound,
            hooks,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn bound_player(&self) -> Option<PlayerId> {
        match self.state {
            SessionState::Unbound => None,
            SessionState::Bound(bound) => Some(bound.player),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound_player().is_some()
    }

    pub fn camera_anchor(&self) -> Transform {
        self.camera_anchor
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn try_join(
        &mut self,
        player: &mut dyn PlayerRig,
        ui: &mut dyn PlayerUi,
    ) -> InteractionResult {
        if let SessionState::Bound(bound) = self.state {
            debug!(
                bound_player = bound.player.0,
                requester = player.id().0,
                "session_already_bound"
            );
            return InteractionResult::success();
        }

        let result = self.hooks.check_requirements(player, ui);
        if result.is_success() {
            self.begin(player, ui);
        } else {
            debug!(
                player = player.id().0,
                message = result.message(),
                "session_requirements_failed"
            );
        }
        result
    }

    /// Reverses every join side effect. Ignored with a warning when unbound.
    pub fn end_game(&mut self, player: &mut dyn PlayerRig, ui: &mut dyn PlayerUi) {
        let bound = match self.state {
            SessionState::Bound(bound) if bound.player == player.id() => bound,
            SessionState::Bound(bound) => {
                warn!(
                    bound_player = bound.player.0,
                    requester = player.id().0,
                    "end_game_for_foreign_player"
                );
                return;
            }
            SessionState::Unbound => {
                warn!(requester = player.id().0, "end_game_while_unbound");
                return;
            }
        };

        player.set_viewpoint(bound.saved_viewpoint);
        player.set_cursor_locked(true);
        player.set_locomotion_enabled(true);
        player.set_sensor_enabled(true);
        self.hooks.on_leave(player, ui);
        self.state = SessionState::Unbound;
        info!(
            player = bound.player.0,
            station = self.hooks.hover_label(),
            "session_left"
        );
    }

    pub fn update(&mut self, ctx: &mut TickContext<'_>) {
        if let SessionState::Bound(bound) = self.state {
            if bound.player == ctx.player.id() {
                ctx.player.set_viewpoint(self.camera_anchor);
                let flow = self.hooks.on_update(ctx);
                if flow == SessionFlow::Leave || ctx.input.exit_pressed() {
                    self.end_game(ctx.player, ctx.ui);
                }
            }
        }
        self.hooks.on_tick(ctx);
    }

    pub fn fixed_update(&mut self, ctx: &mut TickContext<'_>) {
        if !self.hooks.handles_fixed_update() {
            return;
        }
        if self.bound_player() == Some(ctx.player.id()) {
            self.hooks.on_fixed_update(ctx);
        }
    }

    fn begin(&mut self, player: &mut dyn PlayerRig, ui: &mut dyn PlayerUi) {
        let saved_viewpoint = player.viewpoint();
        player.set_viewpoint(self.camera_anchor);
        player.set_cursor_locked(false);
        player.set_locomotion_enabled(false);
        player.set_sensor_enabled(false);
        self.state = SessionState::Bound(BoundPlayer {
            player: player.id(),
            saved_viewpoint,
        });
        self.hooks.on_join(player, ui);
        info!(
            player = player.id().0,
            station = self.hooks.hover_label(),
            "session_joined"
        );
    }
}

impl<H: SessionHooks + 'static> Interactable for Session<H> {
    fn kind(&self) -> InteractableKind {
        InteractableKind::Session
    }

    fn hover_label(&self) -> &str {
        self.hooks.hover_label()
    }

    fn hover_state(&self) -> HoverState {
        self.hover
    }

    fn hover_state_mut(&mut self) -> &mut HoverState {
        &mut self.hover
    }

    fn interact(&mut self, player: &mut dyn PlayerRig, ui: &mut dyn PlayerUi) -> InteractionResult {
        self.try_join(player, ui)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        Session::update(self, ctx);
    }

    fn fixed_update(&mut self, ctx: &mut TickContext<'_>) {
        Session::fixed_update(self, ctx);
    }
}
