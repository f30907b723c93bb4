use crate::events::SimEvent;
use async_channel::Sender;
use orbit::event::RotaryDirection;
use orbit::geometry::{Point, Size};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

/// Grace period after the last line so running animations and timers can finish.
const TAIL: Duration = Duration::from_millis(2500);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Invalid timestamp '{0}'")]
    InvalidTime(String),
    #[error("Missing command after timestamp")]
    MissingCommand,
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    #[error("'{command}' expects {expected}")]
    MissingArgument {
        command: Verb,
        expected: &'static str,
    },
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
    #[error("Invalid switch '{0}', expected on or off")]
    InvalidSwitch(String),
    #[error("Invalid rotary direction '{0}'")]
    InvalidRotary(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    Press,
    Move,
    Release,
    Cancel,
    Resize,
    Rotary,
    Panel,
    Active,
    Hold,
    Back,
    Append,
    Select,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Press(Point),
    Move(Point),
    Release(Point),
    Cancel,
    Resize(Size),
    Rotary(RotaryDirection),
    Panel(f64),
    Active(bool),
    Hold(bool),
    Back,
    Append(String),
    Select(usize),
}

/// One script line: `<at_ms> <command> [args...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    pub at: Duration,
    pub command: Command,
}

impl FromStr for ScriptLine {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let at = words.next().ok_or(ScriptError::MissingCommand)?;
        let at = at
            .parse::<u64>()
            .map_err(|_| ScriptError::InvalidTime(at.to_string()))?;
        let verb = words.next().ok_or(ScriptError::MissingCommand)?;
        let verb: Verb = verb
            .parse()
            .map_err(|_| ScriptError::UnknownCommand(verb.to_string()))?;
        let args: Vec<&str> = words.collect();

        Ok(Self {
            at: Duration::from_millis(at),
            command: parse_command(verb, &args)?,
        })
    }
}

fn parse_command(verb: Verb, args: &[&str]) -> Result<Command, ScriptError> {
    let command = match verb {
        Verb::Press => Command::Press(point(verb, args)?),
        Verb::Move => Command::Move(point(verb, args)?),
        Verb::Release => Command::Release(point(verb, args)?),
        Verb::Cancel => Command::Cancel,
        Verb::Resize => {
            let (w, h) = pair(verb, args, "a width and a height")?;
            Command::Resize(Size::new(w, h))
        }
        Verb::Rotary => {
            let dir = arg(verb, args, 0, "cw or ccw")?;
            Command::Rotary(
                dir.parse()
                    .map_err(|_| ScriptError::InvalidRotary(dir.to_string()))?,
            )
        }
        Verb::Panel => Command::Panel(number(arg(verb, args, 0, "a relative position")?)?),
        Verb::Active => Command::Active(switch(arg(verb, args, 0, "on or off")?)?),
        Verb::Hold => Command::Hold(switch(arg(verb, args, 0, "on or off")?)?),
        Verb::Back => Command::Back,
        Verb::Append => {
            if args.is_empty() {
                return Err(ScriptError::MissingArgument {
                    command: verb,
                    expected: "a label",
                });
            }
            Command::Append(args.join(" "))
        }
        Verb::Select => {
            let index = arg(verb, args, 0, "an index")?;
            Command::Select(
                index
                    .parse()
                    .map_err(|_| ScriptError::InvalidNumber(index.to_string()))?,
            )
        }
    };
    Ok(command)
}

fn arg<'a>(
    verb: Verb,
    args: &[&'a str],
    i: usize,
    expected: &'static str,
) -> Result<&'a str, ScriptError> {
    args.get(i).copied().ok_or(ScriptError::MissingArgument {
        command: verb,
        expected,
    })
}

fn number(s: &str) -> Result<f64, ScriptError> {
    s.parse()
        .map_err(|_| ScriptError::InvalidNumber(s.to_string()))
}

fn pair(verb: Verb, args: &[&str], expected: &'static str) -> Result<(f64, f64), ScriptError> {
    Ok((
        number(arg(verb, args, 0, expected)?)?,
        number(arg(verb, args, 1, expected)?)?,
    ))
}

fn point(verb: Verb, args: &[&str]) -> Result<Point, ScriptError> {
    let (x, y) = pair(verb, args, "x and y")?;
    Ok(Point::new(x, y))
}

fn switch(s: &str) -> Result<bool, ScriptError> {
    match s.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(ScriptError::InvalidSwitch(s.to_string())),
    }
}

/// Parses one line; blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ScriptLine>, ScriptError> {
    let line = line.split('#').next().unwrap_or_default().trim();
    if line.is_empty() {
        return Ok(None);
    }
    line.parse().map(Some)
}

/// Streams the script, sending each line once its timestamp comes due.
pub async fn feed_script(path: PathBuf, tx: Sender<SimEvent>, start: Instant) {
    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) => {
            log::error!("Failed to open script {}: {}", path.display(), e);
            let _ = tx.send(SimEvent::ScriptDone(Duration::ZERO)).await;
            return;
        }
    };

    let mut lines = BufReader::new(file).lines();
    let mut last = Duration::ZERO;
    let mut number = 0usize;

    while let Ok(Some(line)) = lines.next_line().await {
        number += 1;
        let script_line = match parse_line(&line) {
            Ok(Some(l)) => l,
            Ok(None) => continue,
            Err(e) => {
                log::error!("{}:{}: {}", path.display(), number, e);
                continue;
            }
        };

        if script_line.at < last {
            log::warn!(
                "{}:{}: timestamp goes backwards, sending immediately",
                path.display(),
                number
            );
        }
        last = last.max(script_line.at);
        tokio::time::sleep_until(start + script_line.at).await;

        if tx.send(SimEvent::Script(script_line)).await.is_err() {
            return;
        }
    }

    let end = last + TAIL;
    tokio::time::sleep_until(start + end).await;
    let _ = tx.send(SimEvent::ScriptDone(end)).await;
}
