use std::collections::VecDeque;

use station_engine::tools::{
    caret_glyph, emphasize, BoundedLog, ConsoleCommandRegistry, Emphasis, LineEditor, LineId,
    Step, StepScheduler, TimedText,
};
use station_engine::{
    ConsoleKey, InteractionResult, PlayerRig, PlayerUi, Session, SessionFlow, SessionHooks,
    TickContext,
};
use tracing::{debug, info, warn};

use crate::app::config::{ConfigError, ConsoleConfig};

const MAX_PENDING_COMPUTER_EVENTS: usize = 32;
const COUNTDOWN_STEP_SECONDS: f32 = 1.0;

const INPUT_PREFIX: &str = "Input: ";
const WELCOME_TEXT: &str = "Enter \"help\" for a list of commands.";
const BOOT_LABEL: &str = "Booting";
const CHECK_LABEL: &str = "Checking";
const LAUNCH_INIT_LABEL: &str = "Initializing launch sequence";
const UNKNOWN_COMMAND_TEXT: &str = "Error: unknown command";
const NOT_READY_TEXT: &str = "Error: systems not ready to launch, check diagnostics for more info.";
const TICK_SPRITE: &str = "<sprite name=\"tick\" color=\"#00FF00\">";
const CROSS_SPRITE: &str = "<sprite name=\"cross\" color=\"#FF0000\">";
const CREDITS_HEADER: &str = "<u>Credits</u>";
pub(crate) const FUEL_TASK: &str = "Fuel Engines x4";

pub(crate) type ConsoleStation = Session<RocketComputer>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComputerCommand {
    Help,
    Clear,
    Diagnostics,
    Launch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConsoleState {
    PoweredOff,
    PoweringOn,
    AwaitingInput,
    RunningCommand(ComputerCommand),
    RollingCredits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComputerEvent {
    PowerChanged(bool),
    Launched,
    AfterLaunch,
}

#[derive(Debug, Clone, PartialEq)]
enum Sequence {
    Boot(TimedText),
    Diagnostics(DiagnosticsStep),
    Launch(LaunchStep),
    Credits(CreditsStep),
}

#[derive(Debug, Clone, PartialEq)]
enum DiagnosticsStep {
    Begin,
    CheckingEngines { line: LineId, presentation: TimedText },
    CheckingFlightPath { line: LineId, presentation: TimedText },
}

#[derive(Debug, Clone, PartialEq)]
enum LaunchStep {
    Begin,
    Initializing { line: LineId, presentation: TimedText },
    Countdown { line: LineId, remaining: u32 },
    Launched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreditsStep {
    Begin,
    Next { index: usize },
}

/// The rocket's flight console: boot, a four-command prompt and the credits
/// roll after launch.
///
/// Every long-running command is a tagged [`Sequence`] advanced by the
/// scheduler from `on_tick`, so powering off cancels them all at once and
/// nothing writes to the log afterwards.
pub(crate) struct RocketComputer {
    config: ConsoleConfig,
    commands: ConsoleCommandRegistry<ComputerCommand>,
    log: BoundedLog,
    editor: LineEditor,
    input_line: Option<LineId>,
    state: ConsoleState,
    scheduler: StepScheduler<Sequence>,
    loading_text: String,
    console_text: String,
    engines_fuelled: bool,
    flight_path_created: bool,
    events: VecDeque<ComputerEvent>,
}

impl RocketComputer {
    pub(crate) fn new(config: ConsoleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let log = BoundedLog::new(config.max_lines).map_err(|error| ConfigError::Invalid {
            field: "console.max_lines",
            message: error.to_string(),
        })?;
        Ok(Self {
            config,
            commands: builtin_commands(),
            log,
            editor: LineEditor::default(),
            input_line: None,
            state: ConsoleState::PoweredOff,
            scheduler: StepScheduler::new(),
            loading_text: String::new(),
            console_text: String::new(),
            engines_fuelled: false,
            flight_path_created: false,
            events: VecDeque::new(),
        })
    }

    pub(crate) fn state(&self) -> ConsoleState {
        self.state
    }

    pub(crate) fn is_powered(&self) -> bool {
        self.state != ConsoleState::PoweredOff
    }

    pub(crate) fn log(&self) -> &BoundedLog {
        &self.log
    }

    pub(crate) fn input_buffer(&self) -> &str {
        self.editor.as_str()
    }

    /// Rendered scrollback, refreshed every tick while powered.
    pub(crate) fn display(&self) -> &str {
        &self.console_text
    }

    pub(crate) fn loading_text(&self) -> &str {
        &self.loading_text
    }

    pub(crate) fn engines_fuelled(&mut self) {
        self.engines_fuelled = true;
    }

    pub(crate) fn path_calculated(&mut self) {
        self.flight_path_created = true;
    }

    pub(crate) fn drain_events_into(&mut self, out: &mut Vec<ComputerEvent>) {
        out.extend(self.events.drain(..));
    }

    pub(crate) fn power_on(&mut self, ui: &mut dyn PlayerUi) {
        if self.is_powered() {
            debug!(state = ?self.state, "console_power_on_ignored");
            return;
        }
        self.reset_screen();
        self.state = ConsoleState::PoweringOn;
        info!(boot_time = self.config.boot_time, "console_booting");
        let boot = TimedText::new(BOOT_LABEL, self.config.boot_time);
        self.begin_sequence(Sequence::Boot(boot), ui);
    }

    pub(crate) fn power_off(&mut self) {
        let was_on = self.is_powered();
        self.scheduler.cancel_all();
        self.reset_screen();
        self.state = ConsoleState::PoweredOff;
        if was_on {
            self.push_event(ComputerEvent::PowerChanged(false));
            info!("console_powered_off");
        }
    }

    /// Replaces whatever the console is doing with the endless credits roll.
    pub(crate) fn start_rolling_credits(&mut self, ui: &mut dyn PlayerUi) {
        if !self.is_powered() {
            warn!("credits_requested_while_powered_off");
            return;
        }
        self.scheduler.cancel_all();
        self.reset_screen();
        self.state = ConsoleState::RollingCredits;
        info!(credits = self.config.credits.len(), "credits_rolling");
        self.begin_sequence(Sequence::Credits(CreditsStep::Begin), ui);
    }

    fn reset_screen(&mut self) {
        self.log.clear();
        self.editor.clear();
        self.input_line = None;
        self.console_text.clear();
        self.loading_text.clear();
    }

    fn styled(&self, text: &str, emphasis: Emphasis) -> String {
        emphasize(text, emphasis, &self.config.system_colour)
    }

    fn system(&self, text: &str) -> String {
        self.styled(text, Emphasis::System)
    }

    fn push_event(&mut self, event: ComputerEvent) {
        if self.events.len() == MAX_PENDING_COMPUTER_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Opens a fresh input line and hands the prompt back to the player.
    fn arm_input(&mut self) {
        self.editor.clear();
        let prompt = self.system(INPUT_PREFIX);
        self.input_line = Some(self.log.push(prompt));
        self.state = ConsoleState::AwaitingInput;
    }

    fn handle_key(&mut self, key: ConsoleKey, ui: &mut dyn PlayerUi) {
        match key {
            ConsoleKey::Char(ch) => self.editor.push_char(ch),
            ConsoleKey::Backspace => self.editor.backspace(),
            ConsoleKey::Submit => self.submit(ui),
        }
    }

    fn submit(&mut self, ui: &mut dyn PlayerUi) {
        let raw = self.editor.take();
        if let Some(line) = self.input_line.take() {
            let echo = format!("{}{}", self.system(INPUT_PREFIX), raw);
            self.log.set_text(line, echo);
        }

        match self.commands.resolve_line(&raw) {
            Some(command) => {
                info!(command = ?command, "console_command_started");
                self.state = ConsoleState::RunningCommand(command);
                self.run_command(command, ui);
            }
            None => {
                debug!(input = raw.as_str(), "console_unknown_command");
                let error = self.styled(UNKNOWN_COMMAND_TEXT, Emphasis::Error);
                self.log.push(error);
                self.arm_input();
            }
        }
    }

    fn run_command(&mut self, command: ComputerCommand, ui: &mut dyn PlayerUi) {
        match command {
            ComputerCommand::Help => {
                let lines: Vec<String> = self
                    .commands
                    .iter_specs_in_order()
                    .map(|spec| self.system(&format!("{}: {}", spec.name(), spec.help())))
                    .collect();
                for line in lines {
                    self.log.push(line);
                }
                self.arm_input();
            }
            ComputerCommand::Clear => {
                self.log.clear();
                self.arm_input();
            }
            ComputerCommand::Diagnostics => {
                self.begin_sequence(Sequence::Diagnostics(DiagnosticsStep::Begin), ui);
            }
            ComputerCommand::Launch => {
                self.begin_sequence(Sequence::Launch(LaunchStep::Begin), ui);
            }
        }
    }

    /// Runs the first step right away; the rest is driven by `pump_sequences`.
    fn begin_sequence(&mut self, sequence: Sequence, ui: &mut dyn PlayerUi) {
        let ticket = self.scheduler.start();
        let step = self.run_step(sequence, 0.0, ui);
        self.scheduler.settle(ticket, step);
    }

    fn pump_sequences(&mut self, dt_seconds: f32, ui: &mut dyn PlayerUi) {
        for resumed in self.scheduler.advance(dt_seconds) {
            if !self.scheduler.is_current(resumed.ticket) {
                continue;
            }
            let step = self.run_step(resumed.state, dt_seconds, ui);
            self.scheduler.settle(resumed.ticket, step);
        }
    }

    fn run_step(&mut self, sequence: Sequence, dt: f32, ui: &mut dyn PlayerUi) -> Step<Sequence> {
        match sequence {
            Sequence::Boot(presentation) => self.step_boot(presentation, dt),
            Sequence::Diagnostics(step) => self
                .step_diagnostics(step, dt, ui)
                .map(Sequence::Diagnostics),
            Sequence::Launch(step) => self.step_launch(step, dt).map(Sequence::Launch),
            Sequence::Credits(step) => self.step_credits(step).map(Sequence::Credits),
        }
    }

    fn step_boot(&mut self, mut presentation: TimedText, dt: f32) -> Step<Sequence> {
        let done = presentation.advance(dt, |text| {
            self.loading_text = emphasize(text, Emphasis::System, &self.config.system_colour);
        });
        if !done {
            return Step::Yield(Sequence::Boot(presentation));
        }

        self.loading_text.clear();
        self.log.clear();
        let welcome = self.styled(WELCOME_TEXT, self.config.welcome_emphasis);
        self.log.push(welcome);
        self.arm_input();
        self.push_event(ComputerEvent::PowerChanged(true));
        info!("console_powered_on");
        Step::Done
    }

    /// Animates a presentation into its log line; true once it has finished.
    fn present(&mut self, line: LineId, presentation: &mut TimedText, dt: f32) -> bool {
        presentation.advance(dt, |text| {
            self.log.set_text(line, text);
        })
    }

    fn step_diagnostics(
        &mut self,
        step: DiagnosticsStep,
        dt: f32,
        ui: &mut dyn PlayerUi,
    ) -> Step<DiagnosticsStep> {
        match step {
            DiagnosticsStep::Begin => {
                let line = self.log.push("");
                let presentation = TimedText::new(CHECK_LABEL, self.config.check_time);
                self.step_diagnostics(
                    DiagnosticsStep::CheckingEngines { line, presentation },
                    0.0,
                    ui,
                )
            }
            DiagnosticsStep::CheckingEngines {
                line,
                mut presentation,
            } => {
                if !self.present(line, &mut presentation, dt) {
                    return Step::Yield(DiagnosticsStep::CheckingEngines { line, presentation });
                }
                if self.engines_fuelled {
                    let passed = self.system(&format!("Engines Fuelled: {TICK_SPRITE}"));
                    self.log.push(passed);
                    let presentation = TimedText::new(CHECK_LABEL, self.config.check_time);
                    return self.step_diagnostics(
                        DiagnosticsStep::CheckingFlightPath { line, presentation },
                        0.0,
                        ui,
                    );
                }

                let suffix = self.styled(" Error.", Emphasis::Error);
                self.log.append_text(line, &suffix);
                let failed =
                    self.styled(&format!("Engines Fuelled: {CROSS_SPRITE}"), Emphasis::Error);
                self.log.push(failed);
                ui.add_task(FUEL_TASK);
                self.finish_diagnostics(false);
                Step::Done
            }
            DiagnosticsStep::CheckingFlightPath {
                line,
                mut presentation,
            } => {
                if !self.present(line, &mut presentation, dt) {
                    return Step::Yield(DiagnosticsStep::CheckingFlightPath { line, presentation });
                }
                if self.flight_path_created {
                    let suffix = self.system(" Done");
                    self.log.append_text(line, &suffix);
                    let passed = self.system(&format!("Flight path: {TICK_SPRITE}"));
                    self.log.push(passed);
                } else {
                    let suffix = self.styled(" Error.", Emphasis::Error);
                    self.log.append_text(line, &suffix);
                    let failed =
                        self.styled(&format!("Flight path: {CROSS_SPRITE}"), Emphasis::Error);
                    self.log.push(failed);
                }
                self.finish_diagnostics(self.flight_path_created);
                Step::Done
            }
        }
    }

    fn finish_diagnostics(&mut self, all_passed: bool) {
        info!(
            engines_fuelled = self.engines_fuelled,
            flight_path = self.flight_path_created,
            all_passed,
            "diagnostics_finished"
        );
        self.arm_input();
    }

    fn step_launch(&mut self, step: LaunchStep, dt: f32) -> Step<LaunchStep> {
        match step {
            LaunchStep::Begin => {
                let line = self.log.push("");
                let label = self.styled(LAUNCH_INIT_LABEL, Emphasis::Warning);
                let presentation = TimedText::new(label, self.config.check_time);
                self.step_launch(LaunchStep::Initializing { line, presentation }, 0.0)
            }
            LaunchStep::Initializing {
                line,
                mut presentation,
            } => {
                if !self.present(line, &mut presentation, dt) {
                    return Step::Yield(LaunchStep::Initializing { line, presentation });
                }
                if !(self.engines_fuelled && self.flight_path_created) {
                    let suffix = self.styled(" Error!", Emphasis::Error);
                    self.log.append_text(line, &suffix);
                    let failed = self.styled(NOT_READY_TEXT, Emphasis::Error);
                    self.log.push(failed);
                    warn!(
                        engines_fuelled = self.engines_fuelled,
                        flight_path = self.flight_path_created,
                        "launch_refused"
                    );
                    self.arm_input();
                    return Step::Done;
                }

                let suffix = self.styled(" Done", Emphasis::Warning);
                self.log.append_text(line, &suffix);
                let countdown = self.log.push("");
                self.step_launch(
                    LaunchStep::Countdown {
                        line: countdown,
                        remaining: self.config.countdown_from,
                    },
                    0.0,
                )
            }
            LaunchStep::Countdown { line, remaining } if remaining > 0 => {
                let text = self.styled(&format!("Launching in... {remaining}"), Emphasis::Warning);
                self.log.set_text(line, text);
                Step::Wait {
                    seconds: COUNTDOWN_STEP_SECONDS,
                    then: LaunchStep::Countdown {
                        line,
                        remaining: remaining - 1,
                    },
                }
            }
            LaunchStep::Countdown { line, .. } => {
                let text = self.styled("Launching!", Emphasis::Warning);
                self.log.set_text(line, text);
                self.push_event(ComputerEvent::Launched);
                info!(launch_time = self.config.launch_time, "rocket_launched");
                Step::Wait {
                    seconds: self.config.launch_time,
                    then: LaunchStep::Launched,
                }
            }
            LaunchStep::Launched => {
                self.push_event(ComputerEvent::AfterLaunch);
                info!("rocket_after_launch");
                Step::Done
            }
        }
    }

    fn step_credits(&mut self, step: CreditsStep) -> Step<CreditsStep> {
        let index = match step {
            CreditsStep::Begin => {
                self.log.push(CREDITS_HEADER);
                return Step::Wait {
                    seconds: self.config.credit_interval,
                    then: CreditsStep::Next { index: 0 },
                };
            }
            CreditsStep::Next { index } => index,
        };

        let count = self.config.credits.len();
        if count == 0 {
            return Step::Done;
        }
        let credit = self.config.credits[index % count].clone();
        self.log.push(credit);
        Step::Wait {
            seconds: self.config.credit_interval,
            then: CreditsStep::Next {
                index: (index + 1) % count,
            },
        }
    }

    fn refresh_display(&mut self, elapsed_seconds: f32) {
        if self.state == ConsoleState::AwaitingInput {
            if let Some(line) = self.input_line {
                let text = format!(
                    "{}{}{}",
                    self.system(INPUT_PREFIX),
                    self.editor.as_str(),
                    caret_glyph(elapsed_seconds, self.config.blink_speed)
                );
                self.log.set_text(line, text);
            }
        }
        self.log.render_into(&mut self.console_text);
    }
}

impl SessionHooks for RocketComputer {
    fn hover_label(&self) -> &str {
        "Use computer"
    }

    fn check_requirements(
        &mut self,
        _player: &mut dyn PlayerRig,
        _ui: &mut dyn PlayerUi,
    ) -> InteractionResult {
        InteractionResult::success()
    }

    fn on_join(&mut self, _player: &mut dyn PlayerRig, ui: &mut dyn PlayerUi) {
        if !self.is_powered() {
            self.power_on(ui);
        }
    }

    fn on_leave(&mut self, _player: &mut dyn PlayerRig, _ui: &mut dyn PlayerUi) {
        if self.config.power_off_on_leave {
            self.power_off();
        }
    }

    fn on_update(&mut self, ctx: &mut TickContext<'_>) -> SessionFlow {
        if self.state != ConsoleState::AwaitingInput {
            return SessionFlow::Continue;
        }
        if let Some(key) = ctx.input.console_key() {
            self.handle_key(key, ctx.ui);
        }
        SessionFlow::Continue
    }

    fn on_tick(&mut self, ctx: &mut TickContext<'_>) {
        if !self.is_powered() {
            return;
        }
        self.pump_sequences(ctx.frame.dt_seconds, ctx.ui);
        self.refresh_display(ctx.frame.elapsed_seconds);
    }
}

fn builtin_commands() -> ConsoleCommandRegistry<ComputerCommand> {
    let mut registry = ConsoleCommandRegistry::new();
    registry
        .register("help", "See list of commands.", ComputerCommand::Help)
        .expect("built-in command registration should not fail");
    registry
        .register("clear", "Clear console.", ComputerCommand::Clear)
        .expect("built-in command registration should not fail");
    registry
        .register(
            "diagnostics",
            "Run flight checks.",
            ComputerCommand::Diagnostics,
        )
        .expect("built-in command registration should not fail");
    registry
        .register("launch", "Launch rocket.", ComputerCommand::Launch)
        .expect("built-in command registration should not fail");
    registry
}

#[cfg(test)]
mod tests {
    use station_engine::tools::CARET_GLYPH;
    use station_engine::{FrameTime, InputSnapshot, Player, PlayerId, Transform, Vec3};

    use super::*;
    use crate::app::hud::Hud;

    // Binary-exact step so timed sequences land on whole ticks.
    const DT: f32 = 0.125;
    const MAX_TICKS: u32 = 2_000;

    struct Harness {
        station: ConsoleStation,
        player: Player,
        hud: Hud,
        elapsed: f32,
        events: Vec<ComputerEvent>,
    }

    impl Harness {
        fn joined(config: ConsoleConfig) -> Self {
            let computer = RocketComputer::new(config).expect("computer");
            let mut harness = Self {
                station: Session::new(Transform::at(Vec3::new(0.0, 1.5, 0.0)), computer),
                player: Player::new(PlayerId(1), "pilot", Transform::at(Vec3::ZERO)),
                hud: Hud::default(),
                elapsed: 0.0,
                events: Vec::new(),
            };
            let result = harness.station.try_join(&mut harness.player, &mut harness.hud);
            assert!(result.is_success());
            harness
        }

        fn booted(config: ConsoleConfig) -> Self {
            let mut harness = Self::joined(config);
            harness.run_until(|computer| computer.state() == ConsoleState::AwaitingInput);
            harness.collect_events();
            harness.events.clear();
            harness
        }

        fn computer(&self) -> &RocketComputer {
            self.station.hooks()
        }

        fn computer_mut(&mut self) -> &mut RocketComputer {
            self.station.hooks_mut()
        }

        fn tick_with(&mut self, input: InputSnapshot) {
            self.elapsed += DT;
            let mut ctx = TickContext {
                frame: FrameTime {
                    dt_seconds: DT,
                    elapsed_seconds: self.elapsed,
                },
                input: &input,
                player: &mut self.player,
                ui: &mut self.hud,
            };
            self.station.update(&mut ctx);
            self.collect_events();
        }

        fn tick(&mut self, key: Option<ConsoleKey>) {
            self.tick_with(InputSnapshot::empty().with_console_key(key));
        }

        fn run_ticks(&mut self, ticks: u32) {
            for _ in 0..ticks {
                self.tick(None);
            }
        }

        fn run_until(&mut self, done: impl Fn(&RocketComputer) -> bool) -> u32 {
            for ticks in 1..=MAX_TICKS {
                self.tick(None);
                if done(self.computer()) {
                    return ticks;
                }
            }
            panic!("condition not reached within {MAX_TICKS} ticks");
        }

        fn type_line(&mut self, text: &str) {
            for ch in text.chars() {
                self.tick(Some(ConsoleKey::Char(ch)));
            }
            self.tick(Some(ConsoleKey::Submit));
        }

        fn collect_events(&mut self) {
            let mut events = Vec::new();
            self.station.hooks_mut().drain_events_into(&mut events);
            self.events.extend(events);
        }

        fn lines(&self) -> Vec<String> {
            self.computer().log().lines().map(ToString::to_string).collect()
        }

        fn count_events(&self, event: ComputerEvent) -> usize {
            self.events.iter().filter(|seen| **seen == event).count()
        }
    }

    fn green(text: &str) -> String {
        emphasize(text, Emphasis::System, "green")
    }

    fn yellow(text: &str) -> String {
        emphasize(text, Emphasis::Warning, "green")
    }

    fn red(text: &str) -> String {
        emphasize(text, Emphasis::Error, "green")
    }

    fn is_fresh_input_line(line: &str) -> bool {
        let prompt = green(INPUT_PREFIX);
        line == prompt || line == format!("{prompt}{CARET_GLYPH}")
    }

    #[test]
    fn join_boots_console_then_shows_prompt() {
        let mut harness = Harness::joined(ConsoleConfig::default());
        assert_eq!(harness.computer().state(), ConsoleState::PoweringOn);
        assert_eq!(harness.computer().loading_text(), green("Booting"));

        let ticks =
            harness.run_until(|computer| computer.state() == ConsoleState::AwaitingInput);

        assert_eq!(ticks, 24);
        assert_eq!(harness.computer().loading_text(), "");
        let lines = harness.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], green(WELCOME_TEXT));
        assert!(is_fresh_input_line(&lines[1]));
        assert_eq!(harness.events, vec![ComputerEvent::PowerChanged(true)]);
    }

    #[test]
    fn display_joins_lines_with_trailing_newlines() {
        let harness = Harness::booted(ConsoleConfig::default());
        let lines = harness.lines();
        assert_eq!(harness.computer().display(), format!("{}\n{}\n", lines[0], lines[1]));
    }

    #[test]
    fn typed_characters_show_on_input_line() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.tick(Some(ConsoleKey::Char('h')));
        harness.tick(Some(ConsoleKey::Char('i')));

        assert_eq!(harness.computer().input_buffer(), "hi");
        let last = harness.computer().log().last().expect("input line").to_string();
        assert!(last.starts_with(&format!("{}hi", green(INPUT_PREFIX))));
    }

    #[test]
    fn backspace_on_empty_input_changes_nothing() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        let before = harness.lines().len();

        harness.tick(Some(ConsoleKey::Backspace));

        assert_eq!(harness.computer().input_buffer(), "");
        assert_eq!(harness.lines().len(), before);
        assert_eq!(harness.computer().state(), ConsoleState::AwaitingInput);
    }

    #[test]
    fn unknown_command_reports_error_and_rearms_same_tick() {
        let mut harness = Harness::booted(ConsoleConfig::default());

        harness.type_line("foo bar");

        let lines = harness.lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], format!("{}foo bar", green(INPUT_PREFIX)));
        assert_eq!(lines[2], red(UNKNOWN_COMMAND_TEXT));
        assert!(is_fresh_input_line(&lines[3]));
        assert_eq!(harness.computer().input_buffer(), "");
        assert_eq!(harness.computer().state(), ConsoleState::AwaitingInput);
        assert_eq!(
            lines
                .iter()
                .filter(|line| line.contains(UNKNOWN_COMMAND_TEXT))
                .count(),
            1
        );
    }

    #[test]
    fn command_names_are_case_sensitive() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.type_line("HELP");
        assert!(harness.lines().contains(&red(UNKNOWN_COMMAND_TEXT)));
    }

    #[test]
    fn help_lists_commands_in_order() {
        let mut harness = Harness::booted(ConsoleConfig::default());

        harness.type_line("help");

        let lines = harness.lines();
        assert_eq!(
            &lines[2..6],
            &[
                green("help: See list of commands."),
                green("clear: Clear console."),
                green("diagnostics: Run flight checks."),
                green("launch: Launch rocket."),
            ]
        );
        assert!(is_fresh_input_line(&lines[6]));
    }

    #[test]
    fn clear_leaves_only_a_fresh_prompt() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.type_line("help");

        harness.type_line("clear   now");

        let lines = harness.lines();
        assert_eq!(lines.len(), 1);
        assert!(is_fresh_input_line(&lines[0]));
        assert_eq!(harness.computer().state(), ConsoleState::AwaitingInput);
    }

    #[test]
    fn diagnostics_without_fuel_stops_at_engines() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.computer_mut().path_calculated();

        harness.type_line("diagnostics");
        assert_eq!(
            harness.computer().state(),
            ConsoleState::RunningCommand(ComputerCommand::Diagnostics)
        );
        harness.run_until(|computer| computer.state() == ConsoleState::AwaitingInput);

        let lines = harness.lines();
        let n = lines.len();
        assert_eq!(lines[n - 3], format!("Checking...{}", red(" Error.")));
        assert_eq!(lines[n - 2], red(&format!("Engines Fuelled: {CROSS_SPRITE}")));
        assert!(is_fresh_input_line(&lines[n - 1]));
        assert!(!lines.iter().any(|line| line.contains("Flight path")));
        assert_eq!(harness.hud.tasks(), [FUEL_TASK.to_string()]);
    }

    #[test]
    fn diagnostics_all_clear_checks_both_systems() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.computer_mut().engines_fuelled();
        harness.computer_mut().path_calculated();

        harness.type_line("diagnostics");
        let ticks =
            harness.run_until(|computer| computer.state() == ConsoleState::AwaitingInput);

        // Two back-to-back checks of two seconds each.
        assert!((31..=33).contains(&ticks), "{ticks}");
        let lines = harness.lines();
        let n = lines.len();
        assert_eq!(lines[n - 4], format!("Checking...{}", green(" Done")));
        assert_eq!(lines[n - 3], green(&format!("Engines Fuelled: {TICK_SPRITE}")));
        assert_eq!(lines[n - 2], green(&format!("Flight path: {TICK_SPRITE}")));
        assert!(harness.hud.tasks().is_empty());
    }

    #[test]
    fn diagnostics_flags_missing_flight_path() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.computer_mut().engines_fuelled();

        harness.type_line("diagnostics");
        harness.run_until(|computer| computer.state() == ConsoleState::AwaitingInput);

        let lines = harness.lines();
        let n = lines.len();
        assert_eq!(lines[n - 4], format!("Checking...{}", red(" Error.")));
        assert_eq!(lines[n - 2], red(&format!("Flight path: {CROSS_SPRITE}")));
    }

    #[test]
    fn input_is_ignored_while_command_runs() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.type_line("diagnostics");

        harness.tick(Some(ConsoleKey::Char('x')));
        harness.tick(Some(ConsoleKey::Submit));

        assert_eq!(harness.computer().input_buffer(), "");
        assert_eq!(
            harness.computer().state(),
            ConsoleState::RunningCommand(ComputerCommand::Diagnostics)
        );
    }

    #[test]
    fn launch_counts_down_then_fires_events_once() {
        let config = ConsoleConfig::default();
        let launch_ticks = (config.launch_time / DT) as usize;
        let mut harness = Harness::booted(config);
        harness.computer_mut().engines_fuelled();
        harness.computer_mut().path_calculated();

        harness.type_line("launch");
        let mut countdown_texts: Vec<String> = Vec::new();
        let mut launched_at = None;
        let mut after_launch_at = None;
        for tick in 0..MAX_TICKS as usize {
            harness.tick(None);
            let last = harness.computer().log().last().unwrap_or("").to_string();
            if last.contains("Launching") && countdown_texts.last() != Some(&last) {
                countdown_texts.push(last);
            }
            if launched_at.is_none() && harness.count_events(ComputerEvent::Launched) > 0 {
                launched_at = Some(tick);
            }
            if harness.count_events(ComputerEvent::AfterLaunch) > 0 {
                after_launch_at = Some(tick);
                break;
            }
        }

        let mut expected: Vec<String> = (1..=10)
            .rev()
            .map(|n| yellow(&format!("Launching in... {n}")))
            .collect();
        expected.push(yellow("Launching!"));
        assert_eq!(countdown_texts, expected);

        let launched_at = launched_at.expect("launch event");
        let after_launch_at = after_launch_at.expect("after launch event");
        assert_eq!(after_launch_at - launched_at, launch_ticks);

        harness.run_ticks(200);
        assert_eq!(harness.count_events(ComputerEvent::Launched), 1);
        assert_eq!(harness.count_events(ComputerEvent::AfterLaunch), 1);
        assert_eq!(
            harness.computer().state(),
            ConsoleState::RunningCommand(ComputerCommand::Launch)
        );
        assert!(harness
            .lines()
            .iter()
            .any(|line| line == &format!("{}...{}", yellow(LAUNCH_INIT_LABEL), yellow(" Done"))));
    }

    #[test]
    fn launch_refuses_when_systems_not_ready() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.computer_mut().engines_fuelled();

        harness.type_line("launch");
        harness.run_until(|computer| computer.state() == ConsoleState::AwaitingInput);

        let lines = harness.lines();
        let n = lines.len();
        assert_eq!(
            lines[n - 3],
            format!("{}...{}", yellow(LAUNCH_INIT_LABEL), red(" Error!"))
        );
        assert_eq!(lines[n - 2], red(NOT_READY_TEXT));
        assert!(harness.events.is_empty());
    }

    #[test]
    fn power_off_cancels_running_sequences() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.type_line("diagnostics");
        harness.run_ticks(4);

        harness.computer_mut().power_off();
        harness.run_ticks(100);

        assert_eq!(harness.computer().state(), ConsoleState::PoweredOff);
        assert!(harness.computer().log().is_empty());
        assert_eq!(harness.computer().display(), "");
        assert!(harness.hud.tasks().is_empty());
        assert_eq!(harness.events, vec![ComputerEvent::PowerChanged(false)]);
    }

    #[test]
    fn power_off_while_off_emits_nothing() {
        let mut computer = RocketComputer::new(ConsoleConfig::default()).expect("computer");
        computer.power_off();
        let mut events = Vec::new();
        computer.drain_events_into(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn leaving_keeps_console_running_by_default() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.tick_with(InputSnapshot::empty().with_exit_pressed(true));

        assert!(!harness.station.is_bound());
        assert_eq!(harness.computer().state(), ConsoleState::AwaitingInput);
    }

    #[test]
    fn leaving_powers_off_when_configured() {
        let mut harness = Harness::booted(ConsoleConfig {
            power_off_on_leave: true,
            ..ConsoleConfig::default()
        });
        harness.tick_with(InputSnapshot::empty().with_exit_pressed(true));

        assert_eq!(harness.computer().state(), ConsoleState::PoweredOff);
        assert_eq!(harness.events, vec![ComputerEvent::PowerChanged(false)]);
    }

    #[test]
    fn credits_roll_and_wrap_around_the_list() {
        let mut harness = Harness::booted(ConsoleConfig {
            credits: vec!["Code: A".to_string(), "Art: B".to_string()],
            ..ConsoleConfig::default()
        });
        let mut hud = Hud::default();
        harness.computer_mut().start_rolling_credits(&mut hud);
        assert_eq!(harness.computer().state(), ConsoleState::RollingCredits);
        assert_eq!(harness.lines(), vec![CREDITS_HEADER.to_string()]);

        harness.run_ticks(48);

        assert_eq!(
            harness.lines(),
            vec![CREDITS_HEADER, "Code: A", "Art: B", "Code: A"]
        );
    }

    #[test]
    fn credits_cancel_running_command_and_stop_input() {
        let mut harness = Harness::booted(ConsoleConfig::default());
        harness.type_line("diagnostics");
        let mut hud = Hud::default();
        harness.computer_mut().start_rolling_credits(&mut hud);

        harness.tick(Some(ConsoleKey::Char('x')));
        harness.run_ticks(80);

        assert_eq!(harness.lines(), vec![CREDITS_HEADER.to_string()]);
        assert_eq!(harness.computer().input_buffer(), "");
        assert!(harness.hud.tasks().is_empty());
    }

    #[test]
    fn credits_need_a_powered_console() {
        let mut computer = RocketComputer::new(ConsoleConfig::default()).expect("computer");
        let mut hud = Hud::default();
        computer.start_rolling_credits(&mut hud);
        assert_eq!(computer.state(), ConsoleState::PoweredOff);
        assert!(computer.log().is_empty());
    }

    #[test]
    fn log_capacity_bounds_console_output() {
        let mut harness = Harness::booted(ConsoleConfig {
            max_lines: 3,
            ..ConsoleConfig::default()
        });
        harness.type_line("help");

        let lines = harness.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], green("diagnostics: Run flight checks."));
        assert!(is_fresh_input_line(&lines[2]));
    }

    #[test]
    fn welcome_line_uses_configured_emphasis() {
        let harness = Harness::booted(ConsoleConfig {
            welcome_emphasis: Emphasis::Warning,
            ..ConsoleConfig::default()
        });
        assert_eq!(harness.lines()[0], yellow(WELCOME_TEXT));
    }
}
