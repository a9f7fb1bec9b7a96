//! Headless host: picks a campaign, wires scripted input and a logging
//! renderer to a session, and runs the fixed-tick loop.

use tokio::sync::mpsc;

use tilerun_core::frame::{FrameSnapshot, Renderer, SpriteKind};
use tilerun_core::input::{InputFrame, InputIntent, ScriptStep, ScriptedInput};
use tilerun_core::state::GameState;
use tilerun_platformer::GameSession;
use tilerun_platformer::config::TilerunConfig;
use tilerun_platformer::error::LevelError;
use tilerun_platformer::game_loop::{LoopCommand, LoopSummary, run_game_loop};
use tilerun_platformer::level::LevelData;
use tilerun_platformer::level_gen::generate_level;
use tilerun_platformer::levels::campaign;
use tilerun_platformer::rules::FallOutRules;

/// Where the host gets its levels from, parsed from `TILERUN_LEVEL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSource {
    Builtin,
    Seed(u64),
    File(String),
}

impl LevelSource {
    /// `None`, empty, `builtin`, or `1-1` mean the built-in campaign;
    /// `seed:<n>` a generated level; anything else a level file path.
    pub fn parse(value: Option<&str>) -> Result<Self, LevelError> {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() || value == "builtin" || value == "1-1" {
            return Ok(Self::Builtin);
        }
        if let Some(seed) = value.strip_prefix("seed:") {
            return seed
                .trim()
                .parse::<u64>()
                .map(Self::Seed)
                .map_err(|e| LevelError::InvalidSeed {
                    value: seed.trim().to_string(),
                    message: e.to_string(),
                });
        }
        Ok(Self::File(value.to_string()))
    }

    pub fn campaign(&self) -> Result<Vec<LevelData>, LevelError> {
        match self {
            Self::Builtin => Ok(campaign()),
            Self::Seed(seed) => Ok(vec![generate_level(*seed)]),
            Self::File(path) => Ok(vec![LevelData::from_path(path)?]),
        }
    }
}

/// Input script for unattended runs: start, walk right with a few jumps, then quit.
pub fn demo_script() -> ScriptedInput {
    let right = InputIntent {
        right: true,
        ..Default::default()
    };
    let right_jump = InputIntent {
        jump: true,
        ..right
    };
    ScriptedInput::new([
        ScriptStep::new(1, InputFrame::start()),
        ScriptStep::new(30, InputFrame::default()),
        ScriptStep::new(40, InputFrame::with_intent(right)),
        ScriptStep::new(12, InputFrame::with_intent(right_jump)),
        ScriptStep::new(60, InputFrame::with_intent(right)),
        ScriptStep::new(12, InputFrame::with_intent(right_jump)),
        ScriptStep::new(120, InputFrame::with_intent(right)),
    ])
}

/// Renderer that reports frames through `tracing` instead of drawing them.
#[derive(Debug)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
    last_state: Option<GameState>,
}

impl LogRenderer {
    /// Log a position line every `every` frames; state changes are always logged.
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            last_state: None,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_state(&self) -> Option<GameState> {
        self.last_state
    }
}

impl Renderer for LogRenderer {
    fn present(&mut self, frame: &FrameSnapshot) {
        self.frames += 1;

        if self.last_state != Some(frame.state) {
            tracing::info!(tick = frame.tick, state = %frame.state, "Screen");
            self.last_state = Some(frame.state);
        }

        if self.frames % self.every == 0 {
            let player = frame.of_kind(SpriteKind::Player).next().map(|d| d.rect);
            tracing::debug!(
                tick = frame.tick,
                camera = frame.camera_offset_x,
                player = ?player.map(|r| (r.x, r.y)),
                enemies = frame.of_kind(SpriteKind::Enemy).count(),
                "Frame"
            );
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            match serde_json::to_string(frame) {
                Ok(json) => tracing::trace!(frame = %json),
                Err(e) => tracing::warn!(error = %e, "Failed to encode frame"),
            }
        }
    }
}

/// Build a session for `level_spec` and run it until the script ends, the
/// tick limit is hit, or a stop command arrives.
pub async fn run(
    config: TilerunConfig,
    level_spec: Option<&str>,
    cmd_rx: mpsc::UnboundedReceiver<LoopCommand>,
) -> Result<LoopSummary, LevelError> {
    let source = LevelSource::parse(level_spec)?;
    tracing::info!(?source, "Loading campaign");
    let levels = source.campaign()?;

    let rules = FallOutRules::new(&config.rules);
    let loop_config = config.game_loop.clone();
    let mut session = GameSession::new(levels, config)?.with_rules(rules);

    let mut input = demo_script();
    let mut renderer = LogRenderer::new(30);
    let summary = run_game_loop(
        &mut session,
        &mut input,
        &mut renderer,
        &loop_config,
        cmd_rx,
    )
    .await;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilerun_core::frame::Rgb;
    use tilerun_platformer::game_loop::StopReason;

    #[test]
    fn level_source_parsing() {
        assert_eq!(LevelSource::parse(None).unwrap(), LevelSource::Builtin);
        assert_eq!(LevelSource::parse(Some(" ")).unwrap(), LevelSource::Builtin);
        assert_eq!(LevelSource::parse(Some("1-1")).unwrap(), LevelSource::Builtin);
        assert_eq!(
            LevelSource::parse(Some("seed:42")).unwrap(),
            LevelSource::Seed(42)
        );
        assert_eq!(
            LevelSource::parse(Some("levels/1-1.toml")).unwrap(),
            LevelSource::File("levels/1-1.toml".to_string())
        );
        assert!(matches!(
            LevelSource::parse(Some("seed:abc")),
            Err(LevelError::InvalidSeed { ref value, .. }) if value == "abc"
        ));
        let err = LevelSource::parse(Some("seed:-1")).unwrap_err();
        assert!(err.to_string().starts_with("invalid level seed \"-1\""));
    }

    #[test]
    fn sources_produce_campaigns() {
        assert_eq!(LevelSource::Builtin.campaign().unwrap().len(), 1);
        let generated = LevelSource::Seed(7).campaign().unwrap();
        assert_eq!(generated[0].name, "generated-7");
        assert!(matches!(
            LevelSource::File("nope/missing.toml".into()).campaign(),
            Err(LevelError::Io { .. })
        ));
    }

    #[test]
    fn demo_script_length() {
        assert_eq!(demo_script().remaining_ticks(), 275);
    }

    #[test]
    fn log_renderer_tracks_state_changes() {
        let mut renderer = LogRenderer::new(0);
        let mut frame = FrameSnapshot {
            tick: 1,
            state: GameState::Playing,
            camera_offset_x: 0.0,
            background: Rgb::new(0, 0, 0),
            drawables: Vec::new(),
        };
        renderer.present(&frame);
        frame.state = GameState::GameOver;
        renderer.present(&frame);
        assert_eq!(renderer.frames(), 2);
        assert_eq!(renderer.last_state(), Some(GameState::GameOver));
    }

    #[tokio::test(start_paused = true)]
    async fn run_builtin_until_script_ends() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let summary = run(TilerunConfig::default(), None, rx).await.unwrap();
        assert_eq!(summary.reason, StopReason::Quit);
        assert_eq!(summary.ticks, 275);
    }

    #[tokio::test(start_paused = true)]
    async fn run_respects_tick_limit() {
        let mut config = TilerunConfig::default();
        config.game_loop.max_ticks = Some(50);
        let (_tx, rx) = mpsc::unbounded_channel();
        let summary = run(config, Some("seed:3"), rx).await.unwrap();
        assert_eq!(summary.ticks, 50);
        assert_eq!(summary.reason, StopReason::TickLimit);
        assert_eq!(summary.final_state, GameState::Playing);
    }

    #[tokio::test]
    async fn bad_level_spec_fails_before_running() {
        let (_tx, rx) = mpsc::unbounded_channel();
        assert!(run(TilerunConfig::default(), Some("seed:-1"), rx).await.is_err());
    }
}
