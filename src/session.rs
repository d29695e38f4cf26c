//! Per-instance game driver
//!
//! `GameSession` is what a host embeds: it owns the simulation state, latches
//! host input into `TickInput`, runs fixed-timestep substeps per animation
//! frame, and turns `GameEvent`s into notifications and score submission.
//! One session per game instance; nothing here is global.

use glam::Vec2;

use crate::consts::*;
use crate::leaderboard::{Ack, ScoreSink, SubmitError};
use crate::render::FrameSnapshot;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Discrete host commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    PauseToggle,
    Reset,
    /// Reset and immediately start a new run
    Replay,
}

/// How long a transient notification stays visible, in seconds
pub const NOTIFICATION_TTL: f32 = 2.0;

/// A transient user-facing message (level-ups, submission outcomes)
#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    /// Seconds until the message expires
    pub ttl: f32,
}

/// Owns one game instance and its collaborators
pub struct GameSession<S: ScoreSink> {
    state: GameState,
    sink: S,
    input: TickInput,
    accumulator: f32,
    events: Vec<GameEvent>,
    notifications: Vec<Notification>,
    /// Bumped on every reset; stale submission acks are discarded against it
    generation: u64,
}

impl<S: ScoreSink> GameSession<S> {
    pub fn new(seed: u64, sink: S) -> Self {
        Self {
            state: GameState::new(seed),
            sink,
            input: TickInput::default(),
            accumulator: 0.0,
            events: Vec::new(),
            notifications: Vec::new(),
            generation: 0,
        }
    }

    /// Latch the latest pointer position (canvas space)
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.input.pointer = Some(Vec2::new(x, y));
    }

    /// Latch a shoot trigger for the next tick
    pub fn trigger_shot(&mut self) {
        self.input.shoot = true;
    }

    /// Latch a discrete command for the next tick
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Start => self.input.start = true,
            Command::PauseToggle => self.input.pause = true,
            Command::Reset => {
                self.input.reset = true;
                self.generation += 1;
            }
            Command::Replay => {
                self.input.replay = true;
                self.generation += 1;
            }
        }
    }

    /// Advance the session by one host frame
    pub fn frame(&mut self, dt: f32) {
        // Clamp runaway frame gaps (tab switch, debugger)
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT, &mut self.events);
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.input.clear_one_shot();
        }

        let mut events = std::mem::take(&mut self.events);
        for event in events.drain(..) {
            self.handle_event(event);
        }
        self.events = events;

        for notification in &mut self.notifications {
            notification.ttl -= dt;
        }
        self.notifications.retain(|n| n.ttl > 0.0);
    }

    fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::LevelUp { level } => {
                log::info!("level up: {level}");
                self.notify(format!("Level {level}!"));
            }
            GameEvent::TargetEscaped { lives } => {
                log::debug!("target escaped, {lives} lives left");
            }
            GameEvent::GameOver { score, level } => {
                log::info!("game over: score {score}, level {level}");
                self.submit_score(score, level);
            }
        }
    }

    /// Submit the final score; called exactly once per completed run
    fn submit_score(&mut self, score: u32, level: u32) {
        match self.sink.submit(score, level) {
            Ok(Ack::Pending) => {
                log::debug!("score submission pending (generation {})", self.generation);
            }
            outcome => self.report_submission(outcome),
        }
    }

    /// Deliver a deferred submission result
    ///
    /// `generation` must be the value of [`GameSession::generation`] at
    /// submission time; acks from before a reset are dropped.
    pub fn complete_submission(&mut self, generation: u64, result: Result<Ack, SubmitError>) {
        if generation != self.generation {
            log::debug!(
                "ignoring stale submission ack (generation {generation}, now {})",
                self.generation
            );
            return;
        }
        self.report_submission(result);
    }

    fn report_submission(&mut self, result: Result<Ack, SubmitError>) {
        match result {
            Ok(Ack::Recorded { rank: Some(rank) }) => {
                self.notify(format!("Score saved (rank #{rank})"));
            }
            Ok(Ack::Recorded { rank: None }) => {
                self.notify("Score saved".to_string());
            }
            Ok(Ack::Pending) => {}
            Err(err) => {
                // Never fatal; the game-over screen and restart flow continue
                log::warn!("failed to save score: {err}");
                self.notify("Score could not be saved".to_string());
            }
        }
    }

    fn notify(&mut self, text: String) {
        self.notifications.push(Notification {
            text,
            ttl: NOTIFICATION_TTL,
        });
    }

    /// Read-only view of the current frame for a renderer
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        FrameSnapshot {
            cannon: &self.state.cannon,
            pointer: self.state.pointer,
            projectiles: &self.state.projectiles,
            targets: &self.state.targets,
            particles: &self.state.particles,
            paused: self.state.phase == GamePhase::Paused,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[cfg(test)]
    fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{ColorTag, Projectile, Target};

    /// Sink that records calls and answers with a canned response
    struct StubSink {
        calls: Vec<(u32, u32)>,
        response: Result<Ack, SubmitError>,
    }

    impl StubSink {
        fn with(response: Result<Ack, SubmitError>) -> Self {
            Self {
                calls: Vec::new(),
                response,
            }
        }
    }

    impl ScoreSink for StubSink {
        fn submit(&mut self, score: u32, level: u32) -> Result<Ack, SubmitError> {
            self.calls.push((score, level));
            self.response.clone()
        }
    }

    fn session_with(response: Result<Ack, SubmitError>) -> GameSession<StubSink> {
        let mut session = GameSession::new(42, StubSink::with(response));
        session.apply(Command::Start);
        session.frame(SIM_DT);
        // Keep tests in control of the entity population
        session.state_mut().spawn_rate = 0.0;
        session
    }

    fn escaped_target() -> Target {
        Target {
            pos: Vec2::new(100.0, CANVAS_H + 20.0),
            vel: Vec2::ZERO,
            radius: 15.0,
            color: ColorTag::Coral,
            points: 10,
        }
    }

    #[test]
    fn test_start_command_runs_the_game() {
        let session = session_with(Ok(Ack::Recorded { rank: None }));
        assert_eq!(session.phase(), GamePhase::Running);
    }

    #[test]
    fn test_submit_called_once_with_final_score() {
        let mut session = session_with(Ok(Ack::Recorded { rank: Some(1) }));
        session.state_mut().score = 260;
        session.state_mut().lives = 1;
        session.state_mut().targets.push(escaped_target());

        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.sink().calls, vec![(260, 1)]);

        // Further frames never resubmit
        for _ in 0..10 {
            session.frame(SIM_DT);
        }
        assert_eq!(session.sink().calls.len(), 1);
    }

    #[test]
    fn test_three_escapes_one_submission() {
        let mut session = session_with(Ok(Ack::Recorded { rank: None }));
        session.state_mut().score = 120;
        for _ in 0..3 {
            session.state_mut().targets.push(escaped_target());
            session.frame(SIM_DT);
        }

        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.lives(), 0);
        assert_eq!(session.sink().calls, vec![(120, 1)]);
    }

    #[test]
    fn test_successful_submission_notifies_rank() {
        let mut session = session_with(Ok(Ack::Recorded { rank: Some(3) }));
        session.state_mut().lives = 1;
        session.state_mut().targets.push(escaped_target());
        session.frame(SIM_DT);

        assert!(
            session
                .notifications()
                .iter()
                .any(|n| n.text.contains("rank #3"))
        );
    }

    #[test]
    fn test_sink_failure_is_non_fatal() {
        let mut session = session_with(Err(SubmitError::Unavailable("offline".into())));
        session.state_mut().lives = 1;
        session.state_mut().targets.push(escaped_target());
        session.frame(SIM_DT);

        assert_eq!(session.phase(), GamePhase::GameOver);
        assert!(
            session
                .notifications()
                .iter()
                .any(|n| n.text.contains("could not be saved"))
        );

        // Restart flow is not blocked
        session.apply(Command::Replay);
        session.frame(SIM_DT);
        assert_eq!(session.phase(), GamePhase::Running);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_stale_ack_discarded_after_reset() {
        let mut session = session_with(Ok(Ack::Pending));
        session.state_mut().lives = 1;
        session.state_mut().targets.push(escaped_target());
        session.frame(SIM_DT);

        // Pending submission produced no notification yet
        assert_eq!(session.sink().calls.len(), 1);
        assert!(session.notifications().is_empty());
        let stale_generation = session.generation();

        session.apply(Command::Reset);
        session.frame(SIM_DT);

        // The late ack arrives after the reset and must be dropped
        session.complete_submission(stale_generation, Ok(Ack::Recorded { rank: Some(1) }));
        assert!(session.notifications().is_empty());

        // A current-generation ack still lands
        session.complete_submission(session.generation(), Ok(Ack::Recorded { rank: Some(1) }));
        assert!(
            session
                .notifications()
                .iter()
                .any(|n| n.text.contains("rank #1"))
        );
    }

    #[test]
    fn test_level_up_notification() {
        let mut session = session_with(Ok(Ack::Recorded { rank: None }));
        session.state_mut().score = 499;
        session.state_mut().targets.push(Target {
            pos: Vec2::new(105.0, 100.0),
            vel: Vec2::ZERO,
            radius: 15.0,
            color: ColorTag::Sky,
            points: 37,
        });
        session.state_mut().projectiles.push(Projectile {
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::ZERO,
            radius: 3.0,
        });

        session.frame(SIM_DT);

        assert_eq!(session.score(), 536);
        assert_eq!(session.level(), 2);
        assert!(
            session
                .notifications()
                .iter()
                .any(|n| n.text == "Level 2!")
        );
    }

    #[test]
    fn test_notifications_expire() {
        let mut session = session_with(Ok(Ack::Recorded { rank: None }));
        session.complete_submission(session.generation(), Ok(Ack::Recorded { rank: None }));
        assert_eq!(session.notifications().len(), 1);

        let frames = (NOTIFICATION_TTL / SIM_DT) as usize + 2;
        for _ in 0..frames {
            session.frame(SIM_DT);
        }
        assert!(session.notifications().is_empty());
    }

    #[test]
    fn test_snapshot_reflects_pause() {
        let mut session = session_with(Ok(Ack::Recorded { rank: None }));
        assert!(!session.snapshot().paused);
        session.apply(Command::PauseToggle);
        session.frame(SIM_DT);
        assert!(session.snapshot().paused);
    }
}
