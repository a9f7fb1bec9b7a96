use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Movement intent for one tick, assembled by the input collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputIntent {
    pub const IDLE: Self = Self {
        left: false,
        right: false,
        jump: false,
    };

    /// Horizontal direction: +1 right, -1 left, 0 neither. Right wins when both are held.
    pub fn horizontal(&self) -> f32 {
        if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        }
    }
}

/// Everything the core reads from the input collaborator in one tick:
/// the movement intent plus one-shot session signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFrame {
    pub intent: InputIntent,
    pub start: bool,
    pub pause: bool,
    pub restart: bool,
    pub quit: bool,
}

impl InputFrame {
    pub fn with_intent(intent: InputIntent) -> Self {
        Self {
            intent,
            ..Default::default()
        }
    }

    pub fn start() -> Self {
        Self {
            start: true,
            ..Default::default()
        }
    }

    pub fn pause() -> Self {
        Self {
            pause: true,
            ..Default::default()
        }
    }

    pub fn restart() -> Self {
        Self {
            restart: true,
            ..Default::default()
        }
    }

    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Default::default()
        }
    }
}

/// Input collaborator. Polled exactly once per tick; never pushes.
pub trait InputSource {
    fn poll(&mut self) -> InputFrame;
}

/// One entry of an input script: hold `frame` for `ticks` consecutive polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub ticks: u32,
    pub frame: InputFrame,
}

impl ScriptStep {
    pub fn new(ticks: u32, frame: InputFrame) -> Self {
        Self { ticks, frame }
    }
}

/// Replays a fixed input script, then reports `quit` forever.
///
/// Used by headless hosts and tests in place of a keyboard.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: VecDeque<ScriptStep>,
    exhausted: bool,
}

impl ScriptedInput {
    pub fn new(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().filter(|s| s.ticks > 0).collect(),
            exhausted: false,
        }
    }

    /// Number of polls left before the script starts reporting `quit`.
    pub fn remaining_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.ticks)).sum()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        let Some(step) = self.steps.front_mut() else {
            if !self.exhausted {
                self.exhausted = true;
                tracing::debug!("input script exhausted, signalling quit");
            }
            return InputFrame::quit();
        };
        let frame = step.frame;
        step.ticks -= 1;
        if step.ticks == 0 {
            self.steps.pop_front();
        }
        frame
    }
}
