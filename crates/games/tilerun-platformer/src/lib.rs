pub mod camera;
pub mod config;
pub mod enemy;
pub mod error;
pub mod game_loop;
pub mod level;
pub mod level_gen;
pub mod levels;
pub mod physics;
pub mod player;
pub mod render;
pub mod rules;

use serde::{Deserialize, Serialize};

use tilerun_core::frame::FrameSnapshot;
use tilerun_core::input::InputFrame;
use tilerun_core::state::{GameState, StateEvent};

use camera::Camera;
use config::TilerunConfig;
use enemy::{Enemy, Patrol};
use error::LevelError;
use level::{Level, LevelData};
use physics::Contacts;
use player::Player;
use rules::{GameRules, NoRules};

/// A validated campaign entry.
struct Stage {
    name: String,
    spawn: [f32; 2],
    level: Level,
}

/// What one call to [`GameSession::tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    /// State after the tick.
    pub state: GameState,
    /// Whether physics ran this tick.
    pub simulated: bool,
    #[serde(skip)]
    pub contacts: Contacts,
    pub enemies_turned: usize,
}

/// Owns all mutable game state: the campaign, the active level, actors,
/// camera, and the state machine.
pub struct GameSession {
    config: TilerunConfig,
    stages: Vec<Stage>,
    level_index: usize,
    player: Player,
    enemies: Vec<Enemy>,
    camera: Camera,
    state: GameState,
    tick_count: u64,
    rules: Box<dyn GameRules>,
}

impl GameSession {
    /// Validate and load every level up front, then start on the title screen
    /// with the first level ready.
    pub fn new(campaign: Vec<LevelData>, config: TilerunConfig) -> Result<Self, LevelError> {
        if campaign.is_empty() {
            return Err(LevelError::EmptyCampaign);
        }

        let stages = campaign
            .into_iter()
            .enumerate()
            .map(|(index, data)| {
                let level = data
                    .load(&config.level)
                    .map_err(|source| LevelError::InLevel {
                        level: index,
                        name: data.name.clone(),
                        source: Box::new(source),
                    })?;
                Ok(Stage {
                    name: data.name,
                    spawn: data.player_spawn,
                    level,
                })
            })
            .collect::<Result<Vec<_>, LevelError>>()?;

        let [spawn_x, spawn_y] = stages[0].spawn;
        let mut session = Self {
            player: Player::new(spawn_x, spawn_y, &config.player),
            camera: Camera::new(&config.camera),
            config,
            stages,
            level_index: 0,
            enemies: Vec::new(),
            state: GameState::Title,
            tick_count: 0,
            rules: Box::new(NoRules),
        };
        session.load_level_at(0);
        tracing::info!(levels = session.stages.len(), "Game session created");
        Ok(session)
    }

    pub fn with_rules(mut self, rules: impl GameRules + 'static) -> Self {
        self.rules = Box::new(rules);
        self
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Ticks processed so far, simulated or not.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Active enemy roster.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn level(&self) -> &Level {
        &self.stages[self.level_index].level
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.stages.len()
    }

    pub fn level_name(&self) -> &str {
        &self.stages[self.level_index].name
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_offset(&self) -> f32 {
        self.camera.offset_x()
    }

    pub fn config(&self) -> &TilerunConfig {
        &self.config
    }

    /// Apply a state event. Returns `false` when the event means nothing in
    /// the current state.
    ///
    /// `Restart` reloads the first level. `NextLevel` loads the following
    /// level and is refused on the last one.
    pub fn dispatch(&mut self, event: StateEvent) -> bool {
        let has_next = self.level_index + 1 < self.stages.len();
        let next = match self.state.next(event) {
            Some(_) if event == StateEvent::NextLevel && !has_next => None,
            next => next,
        };
        let Some(next) = next else {
            tracing::debug!(state = %self.state, ?event, "Ignoring state event");
            return false;
        };

        tracing::info!(from = %self.state, to = %next, ?event, "State change");
        self.state = next;
        match event {
            StateEvent::Restart => self.load_level_at(0),
            StateEvent::NextLevel => self.load_level_at(self.level_index + 1),
            _ => {},
        }
        true
    }

    /// Leave LEVEL_COMPLETE for the next level, or GAME_WON after the last.
    pub fn advance_level(&mut self) -> bool {
        if self.level_index + 1 < self.stages.len() {
            self.dispatch(StateEvent::NextLevel)
        } else {
            self.dispatch(StateEvent::FinalLevelCleared)
        }
    }

    /// Back to the title screen on the first level, whatever the current state.
    pub fn reset(&mut self) {
        self.state = GameState::Title;
        self.load_level_at(0);
    }

    /// Remove an enemy from the active roster.
    pub fn defeat_enemy(&mut self, index: usize) -> Option<Enemy> {
        if index >= self.enemies.len() {
            return None;
        }
        let enemy = self.enemies.remove(index);
        tracing::debug!(index, x = enemy.body.rect.x, "Enemy defeated");
        Some(enemy)
    }

    /// Run one fixed tick: state signals first, then, while PLAYING, the
    /// player, every enemy, the camera, and finally the rule hooks.
    pub fn tick(&mut self, frame: &InputFrame) -> TickReport {
        self.tick_count += 1;
        self.apply_signals(frame);

        let mut report = TickReport {
            tick: self.tick_count,
            state: self.state,
            simulated: false,
            contacts: Contacts::default(),
            enemies_turned: 0,
        };
        if !self.state.is_simulating() {
            return report;
        }

        let colliders = self.stages[self.level_index].level.colliders();
        report.contacts = self
            .player
            .tick(&frame.intent, colliders, &self.config.physics);
        for enemy in &mut self.enemies {
            if enemy.update(colliders) == Patrol::Turned {
                report.enemies_turned += 1;
            }
        }
        self.camera.follow(self.player.rect().center_x());

        if self.rules.player_died(self) {
            self.dispatch(StateEvent::PlayerDied);
        } else if self.rules.level_ended(self) {
            self.dispatch(StateEvent::LevelEnded);
        }

        tracing::trace!(
            tick = self.tick_count,
            x = self.player.body.rect.x,
            y = self.player.body.rect.y,
            camera = self.camera.offset_x(),
            "simulated"
        );
        report.simulated = true;
        report.state = self.state;
        report
    }

    /// Frame for the renderer, in camera space.
    pub fn snapshot(&self) -> FrameSnapshot {
        render::build_snapshot(self, &self.config.palette)
    }

    fn apply_signals(&mut self, frame: &InputFrame) {
        if frame.restart {
            self.dispatch(StateEvent::Restart);
        }
        if frame.start {
            if self.state == GameState::LevelComplete {
                self.advance_level();
            } else {
                self.dispatch(StateEvent::Start);
            }
        }
        if frame.pause {
            self.dispatch(StateEvent::TogglePause);
        }
    }

    fn load_level_at(&mut self, index: usize) {
        let Some(stage) = self.stages.get(index) else {
            return;
        };
        let [spawn_x, spawn_y] = stage.spawn;
        self.level_index = index;
        self.player.respawn(spawn_x, spawn_y);
        self.enemies = stage.level.enemies().to_vec();
        self.camera.reset(stage.level.bounds());
        tracing::info!(
            index,
            name = %stage.name,
            colliders = stage.level.colliders().len(),
            enemies = self.enemies.len(),
            "Level loaded"
        );
    }
}
