use std::process::ExitCode;

use station_engine::{FixedStepClock, FrameTime, InputCollector, LoopConfig, PlayerRig, Vec3};
use tracing::{error, info};
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use super::bootstrap::AppWiring;
use super::config::AppError;
use super::stage::{Stage, CONSOLE_SCREEN, PLATE_SPAWN, WELDER_SPAWN, WELD_BENCH};
use super::stations::ConsoleState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum DemoAction {
    Aim(Vec3),
    Click,
    Drop,
    Type(&'static str),
    Submit,
    Escape,
    FuelEngines,
    PlotFlightPath,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DemoCue {
    pub(crate) at_seconds: f32,
    pub(crate) action: DemoAction,
}

const fn cue(at_seconds: f32, action: DemoAction) -> DemoCue {
    DemoCue { at_seconds, action }
}

/// Boot and check the console, build the weld, then fuel up and launch.
pub(crate) const DEMO_SCRIPT: &[DemoCue] = &[
    cue(0.1, DemoAction::Aim(CONSOLE_SCREEN)),
    cue(0.3, DemoAction::Click),
    cue(4.0, DemoAction::Type("diagnostics")),
    cue(4.0, DemoAction::Submit),
    cue(7.0, DemoAction::Escape),
    cue(7.5, DemoAction::Aim(PLATE_SPAWN)),
    cue(7.7, DemoAction::Click),
    cue(8.0, DemoAction::Aim(WELD_BENCH)),
    cue(8.2, DemoAction::Click),
    cue(8.5, DemoAction::Aim(WELDER_SPAWN)),
    cue(8.7, DemoAction::Click),
    cue(9.0, DemoAction::Aim(WELD_BENCH)),
    cue(9.2, DemoAction::Click),
    cue(11.0, DemoAction::Escape),
    cue(11.2, DemoAction::Drop),
    cue(11.5, DemoAction::FuelEngines),
    cue(11.6, DemoAction::PlotFlightPath),
    cue(12.0, DemoAction::Aim(CONSOLE_SCREEN)),
    cue(12.2, DemoAction::Click),
    cue(12.5, DemoAction::Type("launch")),
    cue(12.5, DemoAction::Submit),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DemoSummary {
    pub(crate) frames: u32,
    pub(crate) fixed_steps: u32,
}

pub(crate) fn run(app: AppWiring) -> ExitCode {
    match run_wired(app) {
        Ok(summary) => {
            info!(
                frames = summary.frames,
                fixed_steps = summary.fixed_steps,
                "demo_finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}

fn run_wired(app: AppWiring) -> Result<DemoSummary, AppError> {
    let mut stage = Stage::new(&app.config)?;
    let summary = run_script(
        &mut stage,
        &app.config.loop_config,
        DEMO_SCRIPT,
        app.demo_seconds,
    );
    info!(
        tasks = ?stage.hud().tasks(),
        last_error = stage.hud().last_error().unwrap_or(""),
        holding = ?stage.player().held_item().map(|held| held.tag.0),
        focus = ?stage.focus(),
        "demo_outcome"
    );
    Ok(summary)
}

/// Drives the stage headlessly at the configured frame rate, feeding the cue
/// list through the window-input adapter.
pub(crate) fn run_script(
    stage: &mut Stage,
    loop_config: &LoopConfig,
    script: &[DemoCue],
    seconds: f32,
) -> DemoSummary {
    let frame_dt = loop_config.frame_duration();
    let mut clock = FixedStepClock::new(loop_config);
    let mut collector = InputCollector::new();
    let mut next_cue = 0;
    let mut summary = DemoSummary {
        frames: 0,
        fixed_steps: 0,
    };
    let mut last_state = stage.console().map(|console| console.state());

    while clock.elapsed().as_secs_f32() < seconds {
        let now = clock.elapsed().as_secs_f32();
        while let Some(due) = script.get(next_cue).filter(|due| due.at_seconds <= now) {
            apply_cue(stage, &mut collector, due.action);
            next_cue += 1;
        }

        let input = collector.snapshot_for_tick();
        let plan = clock.advance(frame_dt);
        stage.tick(plan.frame, &input);
        for _ in 0..plan.fixed_steps {
            let fixed = FrameTime {
                dt_seconds: plan.fixed_dt_seconds,
                elapsed_seconds: plan.frame.elapsed_seconds,
            };
            stage.fixed_tick(fixed, &input);
        }
        summary.frames += 1;
        summary.fixed_steps += plan.fixed_steps;

        let state = stage.console().map(|console| console.state());
        if state != last_state {
            log_console(stage, state);
            last_state = state;
        }
    }

    summary
}

fn apply_cue(stage: &mut Stage, collector: &mut InputCollector, action: DemoAction) {
    match action {
        DemoAction::Aim(target) => stage.aim_at(target),
        DemoAction::Click => {
            collector.handle_mouse_input(MouseButton::Left, ElementState::Pressed);
            collector.handle_mouse_input(MouseButton::Left, ElementState::Released);
        }
        DemoAction::Drop => {
            collector.handle_mouse_input(MouseButton::Right, ElementState::Pressed);
            collector.handle_mouse_input(MouseButton::Right, ElementState::Released);
        }
        DemoAction::Type(text) => collector.handle_text(text),
        DemoAction::Submit => press_key(collector, KeyCode::Enter),
        DemoAction::Escape => press_key(collector, KeyCode::Escape),
        DemoAction::FuelEngines => stage.fuel_engines(),
        DemoAction::PlotFlightPath => stage.calculate_flight_path(),
    }
}

fn press_key(collector: &mut InputCollector, code: KeyCode) {
    collector.handle_key_state(code, ElementState::Pressed);
    collector.handle_key_state(code, ElementState::Released);
}

fn log_console(stage: &Stage, state: Option<ConsoleState>) {
    let Some(console) = stage.console() else {
        return;
    };
    info!(
        state = ?state,
        lines = console.log().len(),
        loading = console.loading_text(),
        last_line = console.log().last().unwrap_or(""),
        "console_state_changed"
    );
}
