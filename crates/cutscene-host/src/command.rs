//! Console commands.

use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

/// One line typed at the host console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// `play <key>`
    Play(String),
    /// `once <key>`
    PlayOnce(String),
    /// `skip`
    Skip,
    /// `stop`
    Stop,
    /// `pause <event>`
    Pause(String),
    /// `input <event>`: fires an input event and, while the director is
    /// idle, offers it to zones.
    Input(String),
    /// `subtitle [<secs>s] <text>`
    Subtitle {
        text: String,
        duration: Option<Duration>,
    },
    /// `enter <zone>`
    Enter(String),
    /// `exit <zone>`
    Exit(String),
    /// `interact <key>`: interacts with the event trigger for `key`.
    Interact(String),
    /// `quit`
    Quit,
}

impl FromStr for HostCommand {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        let argument = |usage: &str| {
            if rest.is_empty() {
                Err(AppError::Command(format!("usage: {usage}")))
            } else {
                Ok(rest.to_owned())
            }
        };

        match verb.to_ascii_lowercase().as_str() {
            "play" => argument("play <key>").map(Self::Play),
            "once" => argument("once <key>").map(Self::PlayOnce),
            "skip" => Ok(Self::Skip),
            "stop" => Ok(Self::Stop),
            "pause" => argument("pause <event>").map(Self::Pause),
            "input" => argument("input <event>").map(Self::Input),
            "subtitle" => {
                let text = argument("subtitle [<secs>s] <text>")?;
                Ok(parse_subtitle(&text))
            }
            "enter" => argument("enter <zone>").map(Self::Enter),
            "exit" => argument("exit <zone>").map(Self::Exit),
            "interact" => argument("interact <key>").map(Self::Interact),
            "quit" => Ok(Self::Quit),
            "" => Err(AppError::Command("empty line".into())),
            other => Err(AppError::Command(other.to_owned())),
        }
    }
}

/// Splits an optional leading `<secs>s` hold time from the text.
fn parse_subtitle(rest: &str) -> HostCommand {
    let hold = rest.split_once(char::is_whitespace).and_then(|(first, text)| {
        let secs = first.strip_suffix('s')?.parse::<f64>().ok()?;
        let duration = Duration::try_from_secs_f64(secs).ok()?;
        Some((duration, text.trim()))
    });
    match hold {
        Some((duration, text)) if !text.is_empty() => HostCommand::Subtitle {
            text: text.to_owned(),
            duration: Some(duration),
        },
        _ => HostCommand::Subtitle {
            text: rest.to_owned(),
            duration: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_keyed_commands() {
        assert_eq!("play Intro".parse::<HostCommand>().unwrap(), HostCommand::Play("Intro".into()));
        assert_eq!(
            "  ONCE   Intro  ".parse::<HostCommand>().unwrap(),
            HostCommand::PlayOnce("Intro".into())
        );
        assert_eq!(
            "input Confirm".parse::<HostCommand>().unwrap(),
            HostCommand::Input("Confirm".into())
        );
        assert_eq!("quit".parse::<HostCommand>().unwrap(), HostCommand::Quit);
    }

    #[test]
    fn test_missing_argument_reports_usage() {
        let err = "play".parse::<HostCommand>().unwrap_err();

        assert_eq!(err.to_string(), "unrecognised command: usage: play <key>");
    }

    #[test]
    fn test_unknown_verb_is_rejected() {
        assert!(matches!(
            "dance now".parse::<HostCommand>(),
            Err(AppError::Command(verb)) if verb == "dance"
        ));
    }

    #[test]
    fn test_subtitle_with_hold_time() {
        let command = "subtitle 2.5s Where am I?".parse::<HostCommand>().unwrap();

        assert_eq!(
            command,
            HostCommand::Subtitle {
                text: "Where am I?".into(),
                duration: Some(Duration::from_millis(2500)),
            }
        );
    }

    #[test]
    fn test_subtitle_without_hold_time_keeps_every_word() {
        let command = "subtitle 3 little pigs".parse::<HostCommand>().unwrap();

        assert_eq!(
            command,
            HostCommand::Subtitle {
                text: "3 little pigs".into(),
                duration: None,
            }
        );
    }
}
