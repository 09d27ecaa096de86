//! Application context: the one director and everything that talks to it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cutscene_core::affordance::SkipAffordance;
use cutscene_core::clock::Clock;
use cutscene_core::event::ObservableEvent;
use cutscene_core::input::InputBus;
use cutscene_core::store::KeyValueStore;
use cutscene_director::application::one_shot::OneShotGate;
use cutscene_director::application::orchestrator::Orchestrator;
use cutscene_director::application::triggers::{EventTrigger, Interactable, ZoneTrigger};
use cutscene_director::domain::events::DirectorEvent;
use cutscene_director::domain::registry::SequenceRegistry;
use cutscene_presentation::SubtitleQueue;
use tracing::info;

use crate::command::HostCommand;
use crate::config::ContentFile;
use crate::engine::{Marker, SimulatedEngine};
use crate::error::AppError;

/// Skip button that only logs its visibility.
#[derive(Debug, Default)]
pub struct ConsoleSkipButton;

impl SkipAffordance for ConsoleSkipButton {
    fn show(&mut self) {
        info!("skip available (type 'skip')");
    }

    fn hide(&mut self) {
        info!("skip hidden");
    }
}

/// Whether the host loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the director, the simulated engine driving it and the scene
/// triggers. Triggers borrow the director per call.
pub struct AppContext {
    director: Orchestrator,
    engine: SimulatedEngine,
    input: InputBus,
    triggers: Vec<EventTrigger>,
    zones: HashMap<String, ZoneTrigger>,
}

impl AppContext {
    /// Wires a context from parsed content.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the content has invalid durations.
    pub fn new(
        content: &ContentFile,
        store: Box<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let registry = SequenceRegistry::build(content.sequences());
        info!(
            timelines = registry.len(),
            skipped = registry.rejected().len(),
            "timeline registry built"
        );

        let engine = SimulatedEngine::new(content.scripts()?);
        let input = InputBus::new();
        let director = Orchestrator::new(registry, Box::new(engine.clone()), clock)
            .with_settings(content.director_settings()?)
            .with_subtitles(SubtitleQueue::new(content.subtitle_settings()?))
            .with_input(Box::new(input.clone()))
            .with_skip_affordance(Box::new(ConsoleSkipButton))
            .with_one_shot_gate(OneShotGate::new(store));

        let zones = content
            .zones
            .iter()
            .map(|zone| {
                let mut trigger = ZoneTrigger::new(zone.key.clone(), zone.mode);
                if let Some(action) = &zone.require_input {
                    trigger = trigger.requiring_input(action.clone());
                }
                (zone.name.clone(), trigger)
            })
            .collect();

        Ok(Self {
            director,
            engine,
            input,
            triggers: content.triggers.clone(),
            zones,
        })
    }

    /// Runs every event trigger's scene-start hook, in file order.
    pub fn start(&mut self) {
        for trigger in &mut self.triggers {
            let outcome = trigger.start(&mut self.director);
            info!(key = %trigger.key, ?outcome, "event trigger started");
        }
    }

    /// Advances the engine, forwards the markers it crossed, then ticks
    /// the director.
    pub fn step(&mut self, dt: Duration) {
        for marker in self.engine.advance(dt) {
            match marker {
                Marker::Subtitle(cue) => cue.fire(&mut self.director),
                Marker::Pause(cue) => cue.fire(&mut self.director),
            }
        }
        self.director.tick(dt);
    }

    /// Applies one console command.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Command` when a command names an unknown zone or
    /// trigger. Director rejections are reported as events, not errors.
    pub fn apply(&mut self, command: HostCommand) -> Result<Flow, AppError> {
        match command {
            HostCommand::Play(key) => self.director.play_by_key(&key),
            HostCommand::PlayOnce(key) => self.director.play_once(&key),
            HostCommand::Skip => self.director.skip(),
            HostCommand::Stop => self.director.force_stop(),
            HostCommand::Pause(event_name) => self.director.pause_for_input(&event_name),
            HostCommand::Input(event_name) => {
                let delivered = self.input.fire(&event_name);
                // Zones only start timelines on a free director.
                if self.director.is_idle() {
                    for (name, zone) in &mut self.zones {
                        let outcome = zone.input(&mut self.director, &event_name);
                        info!(zone = %name, ?outcome, "action offered to zone");
                    }
                }
                info!(event_name = %event_name, delivered, "input event");
            }
            HostCommand::Subtitle { text, duration } => self.director.show_subtitle(&text, duration),
            HostCommand::Enter(name) => {
                let zone = zone_mut(&mut self.zones, &name)?;
                let outcome = zone.player_entered(&mut self.director);
                info!(zone = %name, ?outcome, "player entered zone");
            }
            HostCommand::Exit(name) => {
                zone_mut(&mut self.zones, &name)?.player_exited();
                info!(zone = %name, "player left zone");
            }
            HostCommand::Interact(key) => {
                let trigger = self
                    .triggers
                    .iter_mut()
                    .find(|trigger| trigger.key == key)
                    .ok_or_else(|| AppError::Command(format!("no event trigger for '{key}'")))?;
                trigger.interact(&mut self.director);
            }
            HostCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Drains director events and logs each as structured JSON.
    pub fn publish_events(&mut self) -> Vec<DirectorEvent> {
        let events = self.director.drain_events();
        for event in &events {
            let metadata = event.metadata();
            info!(
                event_type = event.event_type(),
                event_id = %metadata.event_id,
                correlation_id = %metadata.correlation_id,
                payload = %event.to_payload(),
                "director event"
            );
        }
        events
    }

    /// Ends any active timeline before the host exits.
    pub fn shutdown(&mut self) {
        if !self.director.is_idle() {
            info!("stopping active timeline for shutdown");
            self.director.force_stop();
        }
        self.publish_events();
    }

    #[must_use]
    pub fn director(&self) -> &Orchestrator {
        &self.director
    }

    #[must_use]
    pub fn engine(&self) -> &SimulatedEngine {
        &self.engine
    }

    #[must_use]
    pub fn zone(&self, name: &str) -> Option<&ZoneTrigger> {
        self.zones.get(name)
    }

    #[must_use]
    pub fn triggers(&self) -> &[EventTrigger] {
        &self.triggers
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("director", &self.director)
            .field("engine", &self.engine)
            .field("triggers", &self.triggers)
            .field("zones", &self.zones)
            .finish_non_exhaustive()
    }
}

fn zone_mut<'a>(
    zones: &'a mut HashMap<String, ZoneTrigger>,
    name: &str,
) -> Result<&'a mut ZoneTrigger, AppError> {
    zones
        .get_mut(name)
        .ok_or_else(|| AppError::Command(format!("no zone named '{name}'")))
}
