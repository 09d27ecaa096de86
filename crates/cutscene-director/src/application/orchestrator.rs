//! The single-flight timeline director.
//!
//! The director is a state machine advanced by [`Orchestrator::tick`]. Every
//! suspension point (fade, settle delay, playback, input wait, closing fade)
//! is a phase checked once per tick, so no two transitions interleave within
//! one tick and only one wait is live at a time.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cutscene_core::affordance::SkipAffordance;
use cutscene_core::clock::Clock;
use cutscene_core::engine::{FinishedSubscription, PlaybackEngine};
use cutscene_core::error::CutsceneError;
use cutscene_core::input::{InputEventSource, InputWait};
use cutscene_core::sequence::SequenceHandle;
use cutscene_core::signal::SignalState;
use cutscene_presentation::{FadeSurface, FadeTarget, SubtitleQueue};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::application::one_shot::OneShotGate;
use crate::domain::commands::DirectorCommand;
use crate::domain::events::{
    DirectorEvent, DirectorEventKind, DirectorReleased, EndReason, EngineFailed, OneShotFailed,
    OneShotRecorded, PausedForInput, PlaybackAccepted, PlaybackEnded, PlaybackStarted,
    RequestRejected, Resumed,
};
use crate::domain::registry::SequenceRegistry;
use crate::domain::state::{OrchestratorState, Phase};
use crate::settings::DirectorSettings;

/// Steps of the closing fade that follows teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClosingFade {
    FadeOut,
    Settle(Duration),
    FadeIn,
}

/// Everything tied to the timeline currently holding the director.
#[derive(Debug)]
struct ActivePlayback {
    playback_id: Uuid,
    key: String,
    handle: SequenceHandle,
    uses_fade: bool,
    one_shot: bool,
    settle_remaining: Duration,
    finished: Option<FinishedSubscription>,
    input_wait: Option<InputWait>,
    closing: Option<ClosingFade>,
}

/// Plays one timeline at a time: fade out, settle, play with a concurrent
/// fade in, optional pause for input, then a teardown shared by natural
/// completion, skip and forced stop.
pub struct Orchestrator {
    registry: SequenceRegistry,
    settings: DirectorSettings,
    engine: Box<dyn PlaybackEngine>,
    input: Option<Box<dyn InputEventSource>>,
    skip_button: Option<Box<dyn SkipAffordance>>,
    fade: Option<FadeSurface>,
    subtitles: Option<SubtitleQueue>,
    gate: Option<OneShotGate>,
    clock: Arc<dyn Clock>,
    phase: Phase,
    active: Option<ActivePlayback>,
    skip_visible: bool,
    events: Vec<DirectorEvent>,
}

impl Orchestrator {
    /// Creates an idle director with its own fade surface and subtitle queue.
    #[must_use]
    pub fn new(
        registry: SequenceRegistry,
        engine: Box<dyn PlaybackEngine>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            settings: DirectorSettings::default(),
            engine,
            input: None,
            skip_button: None,
            fade: Some(FadeSurface::new()),
            subtitles: Some(SubtitleQueue::default()),
            gate: None,
            clock,
            phase: Phase::Idle,
            active: None,
            skip_visible: false,
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: DirectorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Source for pause-for-input waits. Without one, pause requests are
    /// rejected and playback continues.
    #[must_use]
    pub fn with_input(mut self, input: Box<dyn InputEventSource>) -> Self {
        self.input = Some(input);
        self
    }

    #[must_use]
    pub fn with_skip_affordance(mut self, button: Box<dyn SkipAffordance>) -> Self {
        self.skip_button = Some(button);
        self
    }

    #[must_use]
    pub fn with_one_shot_gate(mut self, gate: OneShotGate) -> Self {
        self.gate = Some(gate);
        self
    }

    #[must_use]
    pub fn with_subtitles(mut self, subtitles: SubtitleQueue) -> Self {
        self.subtitles = Some(subtitles);
        self
    }

    /// Runs without a subtitle overlay; subtitle lines are dropped.
    #[must_use]
    pub fn without_subtitles(mut self) -> Self {
        self.subtitles = None;
        self
    }

    /// Runs without a fade surface; every fade step is skipped.
    #[must_use]
    pub fn without_fade_surface(mut self) -> Self {
        self.fade = None;
        self
    }

    // --- trigger boundary ---

    /// Plays the timeline registered under `key`. Rejected (and reported)
    /// while another timeline is active or when the key is unknown.
    #[instrument(skip(self))]
    pub fn play_by_key(&mut self, key: &str) {
        self.request_play(key, false);
    }

    /// Plays `key` only if the one-shot gate has no record of it, and records
    /// it once the timeline ends, whether it completed or was skipped.
    #[instrument(skip(self))]
    pub fn play_once(&mut self, key: &str) {
        self.request_play(key, true);
    }

    /// Ends the active timeline early. A no-op when idle or already ending.
    pub fn skip(&mut self) {
        self.request_end(EndReason::Skipped);
    }

    /// Same teardown as [`Orchestrator::skip`], reported as a forced stop.
    pub fn force_stop(&mut self) {
        self.request_end(EndReason::Stopped);
    }

    /// Pauses the engine until `event_name` fires. Only valid while playing;
    /// there is no timeout.
    #[instrument(skip(self))]
    pub fn pause_for_input(&mut self, event_name: &str) {
        if let Err(err) = self.try_pause(event_name) {
            let key = self.active.as_ref().map(|a| a.key.clone());
            self.reject("pause_for_input", key.as_deref(), &err);
        }
    }

    /// Enqueues a subtitle line on the overlay, whatever the phase.
    pub fn show_subtitle(&mut self, text: &str, duration: Option<Duration>) {
        match self.subtitles.as_mut() {
            Some(subtitles) => {
                subtitles.show(text, duration);
            }
            None => debug!(text, "no subtitle overlay; line dropped"),
        }
    }

    /// Routes a command to the matching entry point.
    pub fn dispatch(&mut self, command: DirectorCommand) {
        debug!(command = command.name(), "dispatching director command");
        match command {
            DirectorCommand::PlayByKey { key } => self.play_by_key(&key),
            DirectorCommand::PlayOnce { key } => self.play_once(&key),
            DirectorCommand::Skip => self.skip(),
            DirectorCommand::ForceStop => self.force_stop(),
            DirectorCommand::PauseForInput { event_name } => self.pause_for_input(&event_name),
            DirectorCommand::ShowSubtitle { text, duration } => self.show_subtitle(&text, duration),
        }
    }

    /// Drops a leftover fade input block while idle, e.g. when a one-shot
    /// trigger decides at startup not to play.
    pub fn release_input_block(&mut self) {
        if self.phase != Phase::Idle {
            return;
        }
        if let Some(fade) = self.fade.as_mut() {
            fade.hide_immediately();
        }
    }

    /// Swaps the whole registry.
    ///
    /// # Errors
    ///
    /// Returns `CutsceneError::InvalidPhase` unless the director is idle.
    pub fn replace_registry(&mut self, registry: SequenceRegistry) -> Result<(), CutsceneError> {
        if self.phase != Phase::Idle {
            return Err(CutsceneError::InvalidPhase {
                operation: "replace the registry",
                phase: self.phase.to_string(),
            });
        }
        info!(entries = registry.len(), "timeline registry replaced");
        self.registry = registry;
        Ok(())
    }

    // --- scheduler ---

    /// Advances overlays and the active timeline by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(fade) = self.fade.as_mut() {
            fade.tick(dt);
        }
        if let Some(subtitles) = self.subtitles.as_mut() {
            subtitles.tick(dt);
        }

        match self.phase {
            Phase::Idle => {}
            Phase::FadingOut => {
                if self.fade_settled_at(FadeTarget::Opaque) {
                    self.enter_settling();
                }
            }
            Phase::Settling => {
                if self.settle_elapsed(dt) {
                    self.start_playback();
                }
            }
            Phase::FadingIn => {
                if self.finished_fired() {
                    self.begin_ending(EndReason::Completed);
                } else if self.fade_settled_at(FadeTarget::Clear) {
                    self.phase = Phase::Playing;
                }
            }
            Phase::Playing => {
                if self.finished_fired() {
                    self.begin_ending(EndReason::Completed);
                }
            }
            Phase::PausedForInput => self.poll_input(),
            Phase::Ending => self.advance_closing(dt),
        }
    }

    // --- read side ---

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    #[must_use]
    pub fn active_key(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.key.as_str())
    }

    #[must_use]
    pub fn skip_visible(&self) -> bool {
        self.skip_visible
    }

    /// Snapshot for UI affordances.
    #[must_use]
    pub fn state(&self) -> OrchestratorState {
        match &self.active {
            Some(active) => OrchestratorState {
                phase: self.phase,
                active_key: Some(active.key.clone()),
                uses_fade: active.uses_fade,
                skip_visible: self.skip_visible,
            },
            None => OrchestratorState {
                skip_visible: self.skip_visible,
                ..OrchestratorState::idle()
            },
        }
    }

    #[must_use]
    pub fn fade_surface(&self) -> Option<&FadeSurface> {
        self.fade.as_ref()
    }

    #[must_use]
    pub fn subtitles(&self) -> Option<&SubtitleQueue> {
        self.subtitles.as_ref()
    }

    #[must_use]
    pub fn registry(&self) -> &SequenceRegistry {
        &self.registry
    }

    /// Whether the one-shot gate has a record of `key`. Always `false`
    /// without a gate.
    #[must_use]
    pub fn has_played(&self, key: &str) -> bool {
        self.gate.as_ref().is_some_and(|gate| gate.has_played(key))
    }

    /// Events reported since the last drain, oldest first.
    #[must_use]
    pub fn events(&self) -> &[DirectorEvent] {
        &self.events
    }

    /// Takes every reported event.
    pub fn drain_events(&mut self) -> Vec<DirectorEvent> {
        std::mem::take(&mut self.events)
    }

    // --- internals ---

    /// Returns whether the request was accepted.
    pub(crate) fn request_play(&mut self, key: &str, one_shot: bool) -> bool {
        let operation = if one_shot { "play_once" } else { "play_by_key" };
        match self.try_play(key, one_shot) {
            Ok(()) => true,
            Err(err) => {
                self.reject(operation, Some(key), &err);
                false
            }
        }
    }

    fn try_play(&mut self, key: &str, one_shot: bool) -> Result<(), CutsceneError> {
        if let Some(active) = &self.active {
            return Err(CutsceneError::Busy {
                requested: key.to_owned(),
                active: active.key.clone(),
            });
        }
        let sequence = self.registry.resolve(key)?.clone();
        if one_shot {
            let gate = self.gate.as_ref().ok_or_else(|| {
                CutsceneError::Validation("one-shot play requires a one-shot gate".into())
            })?;
            if gate.has_played(key) {
                return Err(CutsceneError::AlreadyPlayed(key.to_owned()));
            }
        }

        let playback_id = Uuid::new_v4();
        info!(key, %playback_id, uses_fade = sequence.uses_fade, one_shot, "timeline accepted");
        self.active = Some(ActivePlayback {
            playback_id,
            key: sequence.key.clone(),
            handle: sequence.handle,
            uses_fade: sequence.uses_fade,
            one_shot,
            settle_remaining: Duration::ZERO,
            finished: None,
            input_wait: None,
            closing: None,
        });
        self.record(
            playback_id,
            DirectorEventKind::PlaybackAccepted(PlaybackAccepted {
                key: sequence.key,
                uses_fade: sequence.uses_fade,
                one_shot,
            }),
        );

        let fade_duration = self.settings.fade_duration;
        match self.fade.as_mut() {
            Some(fade) if sequence.uses_fade => {
                fade.fade_to(FadeTarget::Opaque, fade_duration);
                self.phase = Phase::FadingOut;
            }
            _ => self.enter_settling(),
        }
        Ok(())
    }

    fn try_pause(&mut self, event_name: &str) -> Result<(), CutsceneError> {
        if event_name.trim().is_empty() {
            return Err(CutsceneError::Validation(
                "input event name must not be empty".into(),
            ));
        }
        if !matches!(self.phase, Phase::Playing | Phase::FadingIn) {
            return Err(CutsceneError::InvalidPhase {
                operation: "pause for input",
                phase: self.phase.to_string(),
            });
        }
        let input = self
            .input
            .as_mut()
            .ok_or_else(|| CutsceneError::Validation("no input event source configured".into()))?;
        let Some(active) = self.active.as_mut() else {
            return Err(CutsceneError::InvalidPhase {
                operation: "pause for input",
                phase: self.phase.to_string(),
            });
        };

        active.input_wait = Some(input.wait_for_event(event_name));
        self.engine.pause();
        self.phase = Phase::PausedForInput;

        let (playback_id, key) = (active.playback_id, active.key.clone());
        info!(key = %key, event_name, "timeline paused for input");
        self.record(
            playback_id,
            DirectorEventKind::PausedForInput(PausedForInput {
                key,
                event_name: event_name.to_owned(),
            }),
        );
        Ok(())
    }

    fn request_end(&mut self, reason: EndReason) {
        match self.phase {
            Phase::Idle => debug!(?reason, "no active timeline to end"),
            Phase::Ending => debug!(?reason, "timeline already ending"),
            _ => self.begin_ending(reason),
        }
    }

    fn enter_settling(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.settle_remaining = self.settings.settle_delay;
        }
        self.phase = Phase::Settling;
    }

    fn settle_elapsed(&mut self, dt: Duration) -> bool {
        let Some(active) = self.active.as_mut() else {
            return true;
        };
        active.settle_remaining = active.settle_remaining.saturating_sub(dt);
        active.settle_remaining.is_zero()
    }

    fn fade_settled_at(&self, target: FadeTarget) -> bool {
        self.fade
            .as_ref()
            .is_none_or(|fade| fade.is_settled_at(target))
    }

    /// Loads the handle, subscribes to the finish notification and starts
    /// the engine. The subscription is taken before `play` so a sequence that
    /// ends immediately is not missed.
    fn launch_engine(&mut self, handle: &SequenceHandle) -> Result<FinishedSubscription, CutsceneError> {
        self.engine.set_sequence(handle)?;
        let subscription = self.engine.subscribe_finished();
        self.engine.play()?;
        Ok(subscription)
    }

    fn start_playback(&mut self) {
        let Some(handle) = self.active.as_ref().map(|a| a.handle.clone()) else {
            self.phase = Phase::Idle;
            return;
        };
        let subscription = match self.launch_engine(&handle) {
            Ok(subscription) => subscription,
            Err(err) => {
                self.abort_start(&err);
                return;
            }
        };

        let fade_duration = self.settings.fade_duration;
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.finished = Some(subscription);
        let (playback_id, key, uses_fade) = (active.playback_id, active.key.clone(), active.uses_fade);

        self.phase = match self.fade.as_mut() {
            Some(fade) if uses_fade => {
                fade.fade_to(FadeTarget::Clear, fade_duration);
                Phase::FadingIn
            }
            _ => Phase::Playing,
        };
        self.show_skip();

        info!(key = %key, asset = %handle, "timeline playing");
        self.record(
            playback_id,
            DirectorEventKind::PlaybackStarted(PlaybackStarted {
                key,
                asset: handle.asset().to_owned(),
            }),
        );
    }

    /// The engine refused to start: release the director without teardown,
    /// clearing only what is always safe to clear.
    fn abort_start(&mut self, err: &CutsceneError) {
        let Some(active) = self.active.take() else {
            self.phase = Phase::Idle;
            return;
        };
        warn!(key = %active.key, error = %err, "engine failed to start; returning to idle");
        self.hide_skip();
        if let Some(fade) = self.fade.as_mut() {
            fade.hide_immediately();
        }
        self.phase = Phase::Idle;
        self.record(
            active.playback_id,
            DirectorEventKind::EngineFailed(EngineFailed {
                key: active.key,
                message: err.to_string(),
            }),
        );
    }

    fn finished_fired(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let Some(subscription) = active.finished.as_mut() else {
            return false;
        };
        match subscription.poll() {
            SignalState::Fired => true,
            SignalState::Pending => false,
            SignalState::Abandoned => {
                warn!(key = %active.key, "engine dropped the finish notification; waiting for skip");
                active.finished = None;
                false
            }
        }
    }

    fn poll_input(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(wait) = active.input_wait.as_mut() else {
            return;
        };
        match wait.poll() {
            SignalState::Pending => {}
            SignalState::Fired => self.resume_from_input(),
            SignalState::Abandoned => {
                warn!(
                    key = %active.key,
                    event_name = wait.event_name(),
                    "input source dropped the wait; timeline stays paused until skipped"
                );
                active.input_wait = None;
            }
        }
    }

    fn resume_from_input(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let Some(wait) = active.input_wait.take() else {
            return;
        };
        self.engine.resume();
        self.phase = Phase::Playing;

        let (playback_id, key) = (active.playback_id, active.key.clone());
        info!(key = %key, event_name = wait.event_name(), "input received; timeline resumed");
        self.record(
            playback_id,
            DirectorEventKind::Resumed(Resumed {
                key,
                event_name: wait.event_name().to_owned(),
            }),
        );
    }

    /// Teardown shared by completion, skip and forced stop. Every step is
    /// safe to run from any intermediate phase.
    fn begin_ending(&mut self, reason: EndReason) {
        let Some(active) = self.active.as_mut() else {
            self.phase = Phase::Idle;
            return;
        };
        active.input_wait = None;
        active.finished = None;
        let (playback_id, key, uses_fade, one_shot) = (
            active.playback_id,
            active.key.clone(),
            active.uses_fade,
            active.one_shot,
        );

        if self.phase.engine_running() {
            self.engine.stop();
        }
        self.hide_skip();
        if let Some(subtitles) = self.subtitles.as_mut() {
            subtitles.hide_immediate();
        }
        if let Some(fade) = self.fade.as_mut() {
            fade.hide_immediately();
        }

        info!(key = %key, ?reason, "timeline ended");
        self.record(
            playback_id,
            DirectorEventKind::PlaybackEnded(PlaybackEnded {
                key: key.clone(),
                reason,
            }),
        );
        if one_shot {
            self.record_one_shot(playback_id, &key);
        }

        let fade_duration = self.settings.fade_duration;
        match self.fade.as_mut() {
            Some(fade) if uses_fade => {
                fade.fade_to(FadeTarget::Opaque, fade_duration);
                if let Some(active) = self.active.as_mut() {
                    active.closing = Some(ClosingFade::FadeOut);
                }
                self.phase = Phase::Ending;
            }
            _ => self.release(),
        }
    }

    fn advance_closing(&mut self, dt: Duration) {
        let Some(step) = self.active.as_ref().and_then(|a| a.closing) else {
            self.release();
            return;
        };
        let next = match step {
            ClosingFade::FadeOut if self.fade_settled_at(FadeTarget::Opaque) => {
                Some(ClosingFade::Settle(self.settings.settle_delay))
            }
            ClosingFade::Settle(remaining) => {
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    let fade_duration = self.settings.fade_duration;
                    if let Some(fade) = self.fade.as_mut() {
                        fade.fade_to(FadeTarget::Clear, fade_duration);
                    }
                    Some(ClosingFade::FadeIn)
                } else {
                    Some(ClosingFade::Settle(remaining))
                }
            }
            ClosingFade::FadeIn if self.fade_settled_at(FadeTarget::Clear) => None,
            other => Some(other),
        };
        match next {
            Some(step) => {
                if let Some(active) = self.active.as_mut() {
                    active.closing = Some(step);
                }
            }
            None => self.release(),
        }
    }

    fn release(&mut self) {
        self.phase = Phase::Idle;
        if let Some(active) = self.active.take() {
            debug!(key = %active.key, "director released");
            self.record(
                active.playback_id,
                DirectorEventKind::DirectorReleased(DirectorReleased { key: active.key }),
            );
        }
    }

    fn record_one_shot(&mut self, playback_id: Uuid, key: &str) {
        let Some(gate) = self.gate.as_mut() else {
            return;
        };
        let kind = match gate.mark_played(key) {
            Ok(()) => DirectorEventKind::OneShotRecorded(OneShotRecorded {
                key: key.to_owned(),
            }),
            Err(err) => {
                warn!(key, error = %err, "failed to record one-shot timeline");
                DirectorEventKind::OneShotFailed(OneShotFailed {
                    key: key.to_owned(),
                    message: err.to_string(),
                })
            }
        };
        self.record(playback_id, kind);
    }

    fn show_skip(&mut self) {
        if let Some(button) = self.skip_button.as_mut() {
            button.show();
        }
        self.skip_visible = true;
    }

    fn hide_skip(&mut self) {
        if !self.skip_visible {
            return;
        }
        if let Some(button) = self.skip_button.as_mut() {
            button.hide();
        }
        self.skip_visible = false;
    }

    fn reject(&mut self, operation: &str, key: Option<&str>, err: &CutsceneError) {
        warn!(operation, key, phase = %self.phase, error = %err, "request rejected");
        self.record(
            Uuid::new_v4(),
            DirectorEventKind::RequestRejected(RequestRejected {
                operation: operation.to_owned(),
                key: key.map(str::to_owned),
                code: err.code().to_owned(),
                message: err.to_string(),
            }),
        );
    }

    fn record(&mut self, correlation_id: Uuid, kind: DirectorEventKind) {
        let event = DirectorEvent::new(correlation_id, kind, self.clock.as_ref());
        self.events.push(event);
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("phase", &self.phase)
            .field("active_key", &self.active_key())
            .field("skip_visible", &self.skip_visible)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
