//! Simulated playback engine.
//!
//! Stands in for a real timeline player: it advances a playhead through an
//! authored script, hands back the markers it crosses and fires the finish
//! notification when the script runs out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use cutscene_core::engine::{FinishedNotifier, FinishedSubscription, PlaybackEngine, finished_channel};
use cutscene_core::error::CutsceneError;
use cutscene_core::sequence::SequenceHandle;
use cutscene_director::application::triggers::{InputPauseCue, SubtitleCue};
use tracing::{debug, info};

/// Something authored on a timeline that reaches out to the director.
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    Subtitle(SubtitleCue),
    Pause(InputPauseCue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimedMarker {
    /// Offset from the start of the timeline.
    pub at: Duration,
    pub marker: Marker,
}

/// Length and markers of one timeline asset.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScript {
    length: Duration,
    markers: Vec<TimedMarker>,
}

impl TimelineScript {
    /// Markers past `length` never fire.
    #[must_use]
    pub fn new(length: Duration, mut markers: Vec<TimedMarker>) -> Self {
        markers.sort_by_key(|timed| timed.at);
        Self { length, markers }
    }

    #[must_use]
    pub fn length(&self) -> Duration {
        self.length
    }

    /// Markers ordered by time.
    #[must_use]
    pub fn markers(&self) -> &[TimedMarker] {
        &self.markers
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug)]
struct Playhead {
    asset: Option<String>,
    script: Option<Arc<TimelineScript>>,
    position: Duration,
    next_marker: usize,
    status: EngineStatus,
    notifier: Option<FinishedNotifier>,
}

/// A playback engine over a fixed library of scripts. Clones share the same
/// playhead, so the host keeps one clone to drive time while the director
/// owns another.
#[derive(Debug, Clone)]
pub struct SimulatedEngine {
    library: Arc<HashMap<String, Arc<TimelineScript>>>,
    playhead: Arc<Mutex<Playhead>>,
}

impl SimulatedEngine {
    #[must_use]
    pub fn new(scripts: impl IntoIterator<Item = (String, TimelineScript)>) -> Self {
        let library = scripts
            .into_iter()
            .map(|(asset, script)| (asset, Arc::new(script)))
            .collect();
        Self {
            library: Arc::new(library),
            playhead: Arc::new(Mutex::new(Playhead {
                asset: None,
                script: None,
                position: Duration::ZERO,
                next_marker: 0,
                status: EngineStatus::Stopped,
                notifier: None,
            })),
        }
    }

    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.lock().status
    }

    #[must_use]
    pub fn position(&self) -> Duration {
        self.lock().position
    }

    #[must_use]
    pub fn loaded_asset(&self) -> Option<String> {
        self.lock().asset.clone()
    }

    /// Moves the playhead forward while playing and returns the markers it
    /// crossed. A pause marker halts the playhead on the marker so nothing
    /// after it fires before the director has paused.
    pub fn advance(&self, dt: Duration) -> Vec<Marker> {
        let mut playhead = self.lock();
        if playhead.status != EngineStatus::Playing {
            return Vec::new();
        }
        let Some(script) = playhead.script.clone() else {
            return Vec::new();
        };

        let target = (playhead.position + dt).min(script.length);
        let mut due = Vec::new();
        while let Some(timed) = script.markers.get(playhead.next_marker) {
            if timed.at > target {
                break;
            }
            playhead.next_marker += 1;
            due.push(timed.marker.clone());
            if matches!(timed.marker, Marker::Pause(_)) {
                playhead.position = timed.at;
                return due;
            }
        }
        playhead.position = target;

        if target >= script.length {
            playhead.status = EngineStatus::Stopped;
            let observed = playhead
                .notifier
                .take()
                .is_some_and(|mut notifier| notifier.fire());
            info!(asset = ?playhead.asset, observed, "simulated timeline reached its end");
        }
        due
    }

    fn lock(&self) -> MutexGuard<'_, Playhead> {
        self.playhead.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlaybackEngine for SimulatedEngine {
    fn set_sequence(&mut self, handle: &SequenceHandle) -> Result<(), CutsceneError> {
        if handle.is_null() {
            return Err(CutsceneError::Engine("null sequence handle".into()));
        }
        let script = self
            .library
            .get(handle.asset())
            .cloned()
            .ok_or_else(|| CutsceneError::Engine(format!("unknown asset '{handle}'")))?;
        let mut playhead = self.lock();
        playhead.asset = Some(handle.asset().to_owned());
        playhead.script = Some(script);
        playhead.status = EngineStatus::Stopped;
        debug!(asset = %handle, "sequence loaded");
        Ok(())
    }

    fn play(&mut self) -> Result<(), CutsceneError> {
        let mut playhead = self.lock();
        if playhead.script.is_none() {
            return Err(CutsceneError::Engine("no sequence loaded".into()));
        }
        playhead.position = Duration::ZERO;
        playhead.next_marker = 0;
        playhead.status = EngineStatus::Playing;
        Ok(())
    }

    fn pause(&mut self) {
        let mut playhead = self.lock();
        if playhead.status == EngineStatus::Playing {
            playhead.status = EngineStatus::Paused;
        }
    }

    fn resume(&mut self) {
        let mut playhead = self.lock();
        if playhead.status == EngineStatus::Paused {
            playhead.status = EngineStatus::Playing;
        }
    }

    fn stop(&mut self) {
        let mut playhead = self.lock();
        playhead.status = EngineStatus::Stopped;
        playhead.notifier = None;
    }

    fn subscribe_finished(&mut self) -> FinishedSubscription {
        let (notifier, subscription) = finished_channel();
        self.lock().notifier = Some(notifier);
        subscription
    }
}
