//! Fixed-rate host loop.
//!
//! A single task owns the context. Console commands arrive over an mpsc
//! channel and are applied between ticks, so the director never sees two
//! calls at once.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::command::HostCommand;
use crate::context::{AppContext, Flow};

/// Parses lines from `reader` and forwards them as commands until the
/// reader ends or the receiver is dropped. Unparseable lines are logged and
/// skipped.
pub fn spawn_command_reader<R>(reader: R, commands: mpsc::Sender<HostCommand>) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<HostCommand>() {
                    Ok(command) => {
                        if commands.send(command).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(line = %line, error = %err, code = err.code(), "ignoring console line"),
                },
                Ok(None) => {
                    debug!("console closed");
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "console read failed");
                    break;
                }
            }
        }
    })
}

/// Real time elapsed between frames, including any ticks the interval
/// skipped.
#[derive(Debug, Clone, Copy)]
struct FrameTimer {
    last: Instant,
}

impl FrameTimer {
    fn new(start: Instant) -> Self {
        Self { last: start }
    }

    fn next(&mut self, now: Instant) -> Duration {
        let dt = now.saturating_duration_since(self.last);
        self.last = self.last.max(now);
        dt
    }
}

/// Ticks the context every `tick` until `quit`, the command channel closes
/// or `shutdown` resolves. Returns the context after stopping any active
/// timeline.
pub async fn run<F>(
    mut context: AppContext,
    mut commands: mpsc::Receiver<HostCommand>,
    tick: Duration,
    shutdown: F,
) -> AppContext
where
    F: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut frames = FrameTimer::new(Instant::now());
    info!(?tick, "host loop started");
    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    info!("command channel closed");
                    break;
                };
                match context.apply(command) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(err) => warn!(error = %err, code = err.code(), "command failed"),
                }
            }
            _ = interval.tick() => context.step(frames.next(Instant::now())),
        }
        context.publish_events();
    }

    context.shutdown();
    info!("host loop stopped");
    context
}
