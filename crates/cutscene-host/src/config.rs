//! Host configuration: environment settings and the YAML content file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use cutscene_core::sequence::{NamedSequence, SequenceHandle};
use cutscene_director::application::triggers::{EventTrigger, InputPauseCue, SubtitleCue, ZoneMode};
use cutscene_director::settings::DirectorSettings;
use cutscene_presentation::SubtitleSettings;
use serde::Deserialize;

use crate::engine::{Marker, TimedMarker, TimelineScript};
use crate::error::AppError;

const DEFAULT_SAVE_PATH: &str = "cutscene-save.json";
const DEFAULT_TICK_HZ: u32 = 60;
const MAX_TICK_HZ: u32 = 1000;

/// Settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// YAML content file (`CUTSCENE_CONFIG`, required).
    pub content_path: PathBuf,
    /// JSON save file (`CUTSCENE_SAVE_PATH`).
    pub save_path: PathBuf,
    /// Scheduler rate (`CUTSCENE_TICK_HZ`).
    pub tick_hz: u32,
}

impl HostConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `CUTSCENE_CONFIG` is unset or
    /// `CUTSCENE_TICK_HZ` is not an integer in `1..=1000`.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`HostConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let content_path = lookup("CUTSCENE_CONFIG")
            .map(PathBuf::from)
            .ok_or_else(|| AppError::Config("CUTSCENE_CONFIG environment variable must be set".into()))?;
        let save_path = lookup("CUTSCENE_SAVE_PATH")
            .map_or_else(|| PathBuf::from(DEFAULT_SAVE_PATH), PathBuf::from);
        let tick_hz = match lookup("CUTSCENE_TICK_HZ") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|hz| (1..=MAX_TICK_HZ).contains(hz))
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "CUTSCENE_TICK_HZ must be an integer in 1..={MAX_TICK_HZ}, got '{raw}'"
                    ))
                })?,
            None => DEFAULT_TICK_HZ,
        };
        Ok(Self {
            content_path,
            save_path,
            tick_hz,
        })
    }

    /// Fixed step between scheduler ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_hz.max(1)
    }
}

fn default_true() -> bool {
    true
}

/// Fade timing in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectorSection {
    pub fade_secs: f64,
    pub settle_secs: f64,
}

impl Default for DirectorSection {
    fn default() -> Self {
        Self {
            fade_secs: 1.0,
            settle_secs: 0.2,
        }
    }
}

/// Subtitle overlay timing in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SubtitleSection {
    pub fade_secs: f64,
    pub default_display_secs: f64,
}

impl Default for SubtitleSection {
    fn default() -> Self {
        Self {
            fade_secs: 0.4,
            default_display_secs: 3.0,
        }
    }
}

/// A subtitle authored at a point on a timeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubtitleMarker {
    pub at_secs: f64,
    pub text: String,
    #[serde(default)]
    pub duration_secs: Option<f64>,
}

/// A point on a timeline where playback waits for input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PauseMarker {
    pub at_secs: f64,
    pub event_name: String,
}

/// One playable timeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimelineSpec {
    pub key: String,
    pub asset: String,
    #[serde(default = "default_true")]
    pub uses_fade: bool,
    pub length_secs: f64,
    #[serde(default)]
    pub subtitles: Vec<SubtitleMarker>,
    #[serde(default)]
    pub pauses: Vec<PauseMarker>,
}

/// An area that plays a timeline when the player walks in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoneSpec {
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub mode: ZoneMode,
    #[serde(default)]
    pub require_input: Option<String>,
}

/// The YAML content file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentFile {
    pub director: DirectorSection,
    pub subtitles: SubtitleSection,
    pub timelines: Vec<TimelineSpec>,
    pub triggers: Vec<EventTrigger>,
    pub zones: Vec<ZoneSpec>,
}

impl ContentFile {
    /// Reads and parses the content file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read and
    /// `AppError::Content` if it is not valid content YAML.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    /// Parses content YAML.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Content` for malformed YAML.
    pub fn from_yaml(raw: &str) -> Result<Self, AppError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// # Errors
    ///
    /// Returns `AppError::Config` for negative or non-finite durations.
    pub fn director_settings(&self) -> Result<DirectorSettings, AppError> {
        Ok(DirectorSettings {
            fade_duration: secs("director.fade_secs", self.director.fade_secs)?,
            settle_delay: secs("director.settle_secs", self.director.settle_secs)?,
        })
    }

    /// # Errors
    ///
    /// Returns `AppError::Config` for negative or non-finite durations.
    pub fn subtitle_settings(&self) -> Result<SubtitleSettings, AppError> {
        Ok(SubtitleSettings {
            fade_duration: secs("subtitles.fade_secs", self.subtitles.fade_secs)?,
            default_display: secs(
                "subtitles.default_display_secs",
                self.subtitles.default_display_secs,
            )?,
        })
    }

    /// Registry entries, in file order.
    #[must_use]
    pub fn sequences(&self) -> Vec<NamedSequence> {
        self.timelines
            .iter()
            .map(|timeline| {
                let sequence =
                    NamedSequence::new(timeline.key.clone(), SequenceHandle::new(timeline.asset.clone()));
                if timeline.uses_fade {
                    sequence
                } else {
                    sequence.without_fade()
                }
            })
            .collect()
    }

    /// Engine scripts keyed by asset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for negative or non-finite times.
    pub fn scripts(&self) -> Result<Vec<(String, TimelineScript)>, AppError> {
        self.timelines
            .iter()
            .map(|timeline| {
                let length = secs(&format!("{}.length_secs", timeline.key), timeline.length_secs)?;
                let mut markers = Vec::with_capacity(timeline.subtitles.len() + timeline.pauses.len());
                for subtitle in &timeline.subtitles {
                    markers.push(TimedMarker {
                        at: secs(&format!("{}.subtitles.at_secs", timeline.key), subtitle.at_secs)?,
                        marker: Marker::Subtitle(SubtitleCue {
                            text: subtitle.text.clone(),
                            duration_secs: subtitle.duration_secs,
                        }),
                    });
                }
                for pause in &timeline.pauses {
                    markers.push(TimedMarker {
                        at: secs(&format!("{}.pauses.at_secs", timeline.key), pause.at_secs)?,
                        marker: Marker::Pause(InputPauseCue {
                            event_name: pause.event_name.clone(),
                        }),
                    });
                }
                Ok((timeline.asset.clone(), TimelineScript::new(length, markers)))
            })
            .collect()
    }
}

fn secs(field: &str, value: f64) -> Result<Duration, AppError> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| AppError::Config(format!("{field} must be a non-negative number of seconds: {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const CONTENT: &str = r#"
director:
  fade_secs: 0.5
timelines:
  - key: Intro
    asset: intro.timeline
    length_secs: 10
    subtitles:
      - { at_secs: 1.0, text: "Where am I?", duration_secs: 2.0 }
    pauses:
      - { at_secs: 4.0, event_name: Confirm }
  - key: Door
    asset: door.timeline
    uses_fade: false
    length_secs: 2
triggers:
  - { key: Intro, play_on_start: true, play_only_once: true }
zones:
  - { name: bus_stop, key: Door, mode: everytime, require_input: Submit }
"#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_applies_defaults() {
        // Arrange
        let lookup = env(&[("CUTSCENE_CONFIG", "content.yaml")]);

        // Act
        let config = HostConfig::from_lookup(lookup).unwrap();

        // Assert
        assert_eq!(config.content_path, PathBuf::from("content.yaml"));
        assert_eq!(config.save_path, PathBuf::from(DEFAULT_SAVE_PATH));
        assert_eq!(config.tick_hz, 60);
    }

    #[test]
    fn test_from_lookup_requires_content_path() {
        let result = HostConfig::from_lookup(env(&[]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_from_lookup_rejects_out_of_range_tick_rate() {
        let result =
            HostConfig::from_lookup(env(&[("CUTSCENE_CONFIG", "c.yaml"), ("CUTSCENE_TICK_HZ", "0")]));

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_tick_interval_from_rate() {
        let config = HostConfig::from_lookup(env(&[
            ("CUTSCENE_CONFIG", "c.yaml"),
            ("CUTSCENE_TICK_HZ", "50"),
        ]))
        .unwrap();

        assert_eq!(config.tick_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_content_parses_with_section_defaults() {
        // Act
        let content = ContentFile::from_yaml(CONTENT).unwrap();

        // Assert
        let director = content.director_settings().unwrap();
        assert_eq!(director.fade_duration, Duration::from_millis(500));
        assert_eq!(director.settle_delay, Duration::from_millis(200));
        assert_eq!(content.subtitle_settings().unwrap(), SubtitleSettings::default());
        assert_eq!(content.triggers, vec![EventTrigger::new("Intro").on_start().only_once()]);
        assert_eq!(content.zones[0].mode, ZoneMode::Everytime);
    }

    #[test]
    fn test_sequences_carry_fade_flag() {
        let content = ContentFile::from_yaml(CONTENT).unwrap();

        let sequences = content.sequences();

        assert!(sequences[0].uses_fade);
        assert!(!sequences[1].uses_fade);
        assert_eq!(sequences[1].handle.asset(), "door.timeline");
    }

    #[test]
    fn test_scripts_collect_markers() {
        let content = ContentFile::from_yaml(CONTENT).unwrap();

        let scripts = content.scripts().unwrap();

        assert_eq!(scripts[0].0, "intro.timeline");
        assert_eq!(scripts[0].1.length(), Duration::from_secs(10));
        assert_eq!(scripts[0].1.markers().len(), 2);
    }

    #[test]
    fn test_negative_length_is_a_config_error() {
        let content = ContentFile::from_yaml(
            "timelines:\n  - { key: Bad, asset: bad.timeline, length_secs: -1 }\n",
        )
        .unwrap();

        assert!(matches!(content.scripts(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_unknown_subtitle_setting_is_a_content_error() {
        let result = ContentFile::from_yaml("subtitles:\n  clear_on_new: false\n");

        assert!(matches!(result, Err(AppError::Content(_))));
    }

    #[test]
    fn test_malformed_yaml_is_a_content_error() {
        let result = ContentFile::from_yaml("timelines: 7");

        assert!(matches!(result, Err(AppError::Content(_))));
    }
}
