use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use tilerun_core::frame::Renderer;
use tilerun_core::input::InputSource;
use tilerun_core::state::GameState;

use crate::GameSession;

/// Default tick rate.
pub const DEFAULT_FPS: f32 = 60.0;

/// Loop timing, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    pub fps: f32,
    /// Stop after this many ticks. `None` runs until quit or stop.
    pub max_ticks: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            max_ticks: None,
        }
    }
}

impl LoopConfig {
    /// Duration of one tick. Unusable rates fall back to [`DEFAULT_FPS`].
    pub fn tick_interval(&self) -> Duration {
        let fps = if self.fps.is_finite() && self.fps > 0.0 {
            self.fps
        } else {
            DEFAULT_FPS
        };
        Duration::from_secs_f32(1.0 / fps)
    }
}

/// Commands sent to a running loop from outside.
#[derive(Debug)]
pub enum LoopCommand {
    Stop,
}

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The input source reported quit.
    Quit,
    /// A `Stop` command arrived or the command channel closed.
    Stopped,
    /// `max_ticks` was reached.
    TickLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopSummary {
    pub ticks: u64,
    pub final_state: GameState,
    pub reason: StopReason,
}

/// Drive a session at a fixed rate until quit, stop, or the tick limit.
///
/// Each tick polls input once, advances the session, and hands the resulting
/// frame to the renderer. Commands are checked before every tick, so a stop
/// takes effect before the next tick begins. Missed ticks are skipped rather
/// than replayed in a burst.
pub async fn run_game_loop<I, R>(
    session: &mut GameSession,
    input: &mut I,
    renderer: &mut R,
    config: &LoopConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<LoopCommand>,
) -> LoopSummary
where
    I: InputSource + ?Sized,
    R: Renderer + ?Sized,
{
    let tick_interval = config.tick_interval();
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!(
        interval_ms = tick_interval.as_secs_f64() * 1000.0,
        max_ticks = ?config.max_ticks,
        level = session.level_name(),
        "Game loop started"
    );

    let mut ticks: u64 = 0;
    let reason = loop {
        if let Some(limit) = config.max_ticks
            && ticks >= limit
        {
            break StopReason::TickLimit;
        }

        tokio::select! {
            biased;
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(LoopCommand::Stop) | None => break StopReason::Stopped,
                }
            }
            _ = interval.tick() => {
                let frame = input.poll();
                if frame.quit {
                    break StopReason::Quit;
                }
                let report = session.tick(&frame);
                ticks += 1;
                tracing::trace!(tick = ticks, state = %report.state, "tick");
                renderer.present(&session.snapshot());
            }
        }
    };

    let summary = LoopSummary {
        ticks,
        final_state: session.state(),
        reason,
    };
    tracing::info!(
        ticks = summary.ticks,
        state = %summary.final_state,
        reason = ?summary.reason,
        "Game loop ended"
    );
    summary
}
