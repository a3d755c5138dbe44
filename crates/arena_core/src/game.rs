//! Game state machine
//!
//! [`Game`] owns every simulation collaborator and is the one entry point a
//! host loop talks to: call [`Game::update`] once per frame with the frame
//! delta and a controller provider, then [`Game::draw`] with a renderer.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assets::AssetProvider;
use crate::config::GameConfig;
use crate::director::{default_pool, DirectorContext, DirectorScheduler};
use crate::entity::EnemyFilter;
use crate::error::{GameError, SpawnError};
use crate::events::{EventQueue, EventSink, GameEvent};
use crate::foundation::collections::EnemyKey;
use crate::foundation::logging::{debug, info};
use crate::foundation::time::FrameTimer;
use crate::input::{ControllerHub, ControllerId, ControllerProvider};
use crate::render::{Camera, Renderer};
use crate::spawn::SpawnRequest;
use crate::world::{Command, EntityCounts, World};

/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Waiting for the first start
    #[default]
    NotStarted,
    /// Resetting; never observed between frames
    Starting,
    /// Simulation advancing
    Running,
    /// Simulation frozen
    Paused,
    /// Every player eliminated
    GameOver,
}

/// Display view of one player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Controller slot
    pub id: ControllerId,
    /// Score so far
    pub score: u64,
    /// Lives left
    pub lives: i32,
    /// Bombs left
    pub bombs: u32,
    /// Whether the player is on the field
    pub active: bool,
}

/// Display view of the whole game
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    /// Lifecycle state
    pub state: GameState,
    /// Current level
    pub level: u32,
    /// Simulated seconds since the last reset
    pub elapsed: f32,
    /// Players still in the game, in controller order
    pub players: Vec<PlayerSnapshot>,
    /// Collection sizes
    pub counts: EntityCounts,
}

/// The arena game
pub struct Game {
    config: GameConfig,
    state: GameState,
    world: World,
    scheduler: DirectorScheduler,
    hub: ControllerHub,
    rng: StdRng,
    events: EventQueue,
    requests: Vec<SpawnRequest>,
    clock: FrameTimer,
}

impl Game {
    /// Build a game from a validated configuration. Every template and
    /// director invariant is checked here, so a running game cannot hit a
    /// missing collaborator.
    pub fn new(config: GameConfig, assets: &dyn AssetProvider) -> Result<Self, GameError> {
        config.validate()?;

        let world = World::new(&config, assets)?;
        if !world.factory().can_satisfy(EnemyFilter::ROAMING) {
            return Err(SpawnError::NoMatchingCategory(EnemyFilter::ROAMING).into());
        }
        let scheduler = DirectorScheduler::new(default_pool(&config.director), &config.director)?;

        let rng = config.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        info!(
            "Game created: arena half-extent {}, seed {:?}",
            config.arena.half_extent, config.seed
        );

        Ok(Self {
            config,
            state: GameState::NotStarted,
            world,
            scheduler,
            hub: ControllerHub::new(),
            rng,
            events: EventQueue::new(),
            requests: Vec::new(),
            clock: FrameTimer::new(),
        })
    }

    /// Lifecycle state
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Current level, 0 before the first level starts
    pub fn level(&self) -> u32 {
        self.scheduler.level()
    }

    /// Active configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Entity collections
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable entity collections
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Director scheduler
    pub fn scheduler(&self) -> &DirectorScheduler {
        &self.scheduler
    }

    /// Controllers seen at the last poll
    pub fn controllers(&self) -> &ControllerHub {
        &self.hub
    }

    /// Spawn an enemy right away with the game's generator
    pub fn spawn(&mut self, request: &SpawnRequest) -> Result<EnemyKey, SpawnError> {
        self.world.spawn(request, &mut self.rng)
    }

    /// Register a notification sink
    pub fn subscribe(&mut self, sink: impl EventSink + 'static) {
        self.events.subscribe(Box::new(sink));
    }

    /// Events dispatched so far and not yet drained
    pub fn events(&self) -> &[GameEvent] {
        self.events.dispatched()
    }

    /// Take every dispatched event
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Start a new game with the currently connected controllers
    pub fn reset(&mut self, provider: &mut dyn ControllerProvider) -> Result<(), GameError> {
        self.hub.poll(provider);
        let result = self.start();
        self.events.dispatch();
        result
    }

    /// Switch between Running and Paused. Other states are left alone.
    pub fn toggle_pause(&mut self) -> GameState {
        match self.state {
            GameState::Running => self.set_state(GameState::Paused),
            GameState::Paused => self.set_state(GameState::Running),
            _ => {}
        }
        self.state
    }

    /// Advance one frame
    ///
    /// Menu input is handled first: a held Start begins a game from
    /// NotStarted or GameOver, a pressed Start toggles pause. Then the
    /// simulation runs if the game is Running; after game over only the
    /// explosion particles keep moving. Events raised during the frame are
    /// dispatched before returning.
    pub fn update(
        &mut self,
        delta_time: f32,
        provider: &mut dyn ControllerProvider,
    ) -> Result<(), GameError> {
        self.hub.poll(provider);
        let result = self.frame(delta_time);
        self.events.dispatch();
        result
    }

    /// Hand every visible entity to `renderer`
    pub fn draw(&self, renderer: &mut dyn Renderer, aspect_ratio: f32) {
        let camera = Camera::for_arena(self.world.boundary(), aspect_ratio);
        self.world.draw(renderer, &camera);
    }

    /// Current state for display
    pub fn snapshot(&self) -> GameSnapshot {
        let mut players: Vec<PlayerSnapshot> = self
            .world
            .players()
            .values()
            .map(|player| PlayerSnapshot {
                id: player.id(),
                score: player.score(),
                lives: player.lives(),
                bombs: player.bombs(),
                active: player.is_active(),
            })
            .collect();
        players.sort_by_key(|player| player.id);

        GameSnapshot {
            state: self.state,
            level: self.scheduler.level(),
            elapsed: self.clock.total_time(),
            players,
            counts: self.world.counts(),
        }
    }

    fn frame(&mut self, delta_time: f32) -> Result<(), GameError> {
        match self.state {
            GameState::NotStarted | GameState::GameOver if self.hub.any_start_held() => {
                self.start()?;
            }
            GameState::Running | GameState::Paused if self.hub.any_start_pressed() => {
                self.toggle_pause();
            }
            _ => {}
        }

        match self.state {
            GameState::Running => self.run(delta_time),
            GameState::GameOver => {
                self.world.step_particles(&mut self.rng);
                Ok(())
            }
            GameState::NotStarted | GameState::Starting | GameState::Paused => Ok(()),
        }
    }

    fn start(&mut self) -> Result<(), GameError> {
        if self.hub.is_empty() {
            return Err(GameError::NoControllers);
        }

        self.events.clear_dispatched();
        self.set_state(GameState::Starting);
        self.world.clear();
        self.scheduler.reset();
        self.requests.clear();
        self.clock = FrameTimer::new();

        for id in self.hub.ids() {
            self.world.add_player(id, &mut self.rng);
        }
        let players = self.world.players().len();
        info!("Game reset with {} players", players);
        self.events.push(GameEvent::GameReset { players });

        self.set_state(GameState::Running);
        Ok(())
    }

    fn run(&mut self, delta_time: f32) -> Result<(), GameError> {
        self.clock.update(delta_time);

        let boundary = *self.world.boundary();
        let mut ctx = DirectorContext {
            boundary: &boundary,
            rng: &mut self.rng,
            requests: &mut self.requests,
        };
        if let Some(change) = self.scheduler.update(delta_time, &mut ctx)? {
            self.events.push(GameEvent::LevelIncreased {
                level: change.level,
                budget: change.budget,
                director: change.director,
            });
            self.world.reroll_weapons(&mut self.rng);
        }

        for request in self.requests.drain(..) {
            debug!("Spawn requested: {:?}", request);
            self.world.queue(Command::Spawn(request));
        }

        let outcome = self.world.step(delta_time, &self.hub, &mut self.rng, &mut self.events)?;
        for id in &outcome.eliminated {
            info!("Player {:?} eliminated", id);
        }

        if self.world.players().is_empty() {
            self.game_over();
        }
        Ok(())
    }

    fn game_over(&mut self) {
        self.world.kill_all();
        self.world.sweep(&mut self.events);
        self.set_state(GameState::GameOver);
    }

    fn set_state(&mut self, to: GameState) {
        let from = self.state;
        if from == to {
            return;
        }
        info!("Game state {:?} -> {:?}", from, to);
        self.state = to;
        self.events.push(GameEvent::StateChanged { from, to });
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .field("world", &self.world)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetProvider;
    use crate::config::{DirectorConfig, PlayerConfig};
    use crate::entity::EnemyType;
    use crate::input::ScriptedControllers;
    use crate::weapon::WeaponKind;
    use std::collections::HashSet;

    fn game() -> Game {
        let config = GameConfig {
            seed: Some(3),
            ..GameConfig::default()
        };
        Game::new(config, &MemoryAssetProvider::with_defaults()).unwrap()
    }

    fn one_controller() -> ScriptedControllers {
        let mut controllers = ScriptedControllers::new();
        controllers.connect(ControllerId(0));
        controllers
    }

    #[test]
    fn test_new_game_is_not_started() {
        let game = game();
        assert_eq!(game.state(), GameState::NotStarted);
        assert_eq!(game.level(), 0);
        assert_eq!(game.world().counts(), EntityCounts::default());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.spatial.cell_size = 0.0;
        let result = Game::new(config, &MemoryAssetProvider::with_defaults());
        assert!(matches!(result, Err(GameError::Config(_))));
    }

    #[test]
    fn test_new_rejects_missing_template() {
        let mut assets = MemoryAssetProvider::with_defaults();
        assets.remove(crate::assets::template_ids::DARTER);
        let result = Game::new(GameConfig::default(), &assets);
        assert!(matches!(result, Err(GameError::Asset(_))));
    }

    #[test]
    fn test_reset_requires_controllers() {
        let mut game = game();
        let result = game.reset(&mut ScriptedControllers::new());
        assert!(matches!(result, Err(GameError::NoControllers)));
        assert_eq!(game.state(), GameState::NotStarted);
    }

    #[test]
    fn test_reset_creates_one_player_per_controller() {
        let mut game = game();
        let mut controllers = one_controller();
        controllers.connect(ControllerId(3));

        game.reset(&mut controllers).unwrap();
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.world().players().len(), 2);

        let events = game.drain_events();
        assert_eq!(
            events,
            vec![
                GameEvent::StateChanged {
                    from: GameState::NotStarted,
                    to: GameState::Starting,
                },
                GameEvent::GameReset { players: 2 },
                GameEvent::StateChanged {
                    from: GameState::Starting,
                    to: GameState::Running,
                },
            ]
        );
    }

    #[test]
    fn test_held_start_begins_game() {
        let mut game = game();
        let mut controllers = one_controller();
        game.update(1.0 / 60.0, &mut controllers).unwrap();
        assert_eq!(game.state(), GameState::NotStarted);

        controllers.state_mut(ControllerId(0)).unwrap().start = true;
        game.update(1.0 / 60.0, &mut controllers).unwrap();
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.level(), 1);
    }

    #[test]
    fn test_start_press_toggles_pause() {
        let mut game = game();
        let mut controllers = one_controller();
        game.reset(&mut controllers).unwrap();

        controllers.state_mut(ControllerId(0)).unwrap().start = true;
        game.update(1.0 / 60.0, &mut controllers).unwrap();
        assert_eq!(game.state(), GameState::Paused);

        // Holding is not a new press
        game.update(1.0 / 60.0, &mut controllers).unwrap();
        assert_eq!(game.state(), GameState::Paused);

        controllers.state_mut(ControllerId(0)).unwrap().start = false;
        game.update(1.0 / 60.0, &mut controllers).unwrap();
        controllers.state_mut(ControllerId(0)).unwrap().start = true;
        game.update(1.0 / 60.0, &mut controllers).unwrap();
        assert_eq!(game.state(), GameState::Running);
    }

    #[test]
    fn test_toggle_pause_ignores_other_states() {
        let mut game = game();
        assert_eq!(game.toggle_pause(), GameState::NotStarted);
        assert!(game.events().is_empty());
    }

    #[test]
    fn test_level_increase_is_announced() {
        let mut game = game();
        let mut controllers = one_controller();
        game.reset(&mut controllers).unwrap();
        game.drain_events();

        game.update(1.0 / 60.0, &mut controllers).unwrap();
        let levels: Vec<GameEvent> = game
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, GameEvent::LevelIncreased { .. }))
            .collect();
        assert_eq!(levels.len(), 1);
        assert!(matches!(levels[0], GameEvent::LevelIncreased { level: 1, .. }));
    }

    #[test]
    fn test_subscribers_see_every_event() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut game = game();
        game.subscribe(move |event: &GameEvent| sink.borrow_mut().push(event.clone()));
        game.reset(&mut one_controller()).unwrap();

        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(seen.borrow().as_slice(), game.events());
    }

    #[test]
    fn test_snapshot_reports_players() {
        let mut game = game();
        let mut controllers = one_controller();
        game.reset(&mut controllers).unwrap();
        game.update(0.5, &mut controllers).unwrap();

        let snapshot = game.snapshot();
        assert_eq!(snapshot.state, GameState::Running);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.players.len(), 1);
        assert_eq!(snapshot.players[0].id, ControllerId(0));
        assert_eq!(snapshot.players[0].lives, 3);
        assert_eq!(snapshot.players[0].bombs, 3);
        assert!(snapshot.players[0].active);
        assert!((snapshot.elapsed - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_reset_forgets_undrained_events() {
        let mut game = game();
        game.subscribe(|_: &GameEvent| {});
        let mut controllers = one_controller();

        for _ in 0..3 {
            game.reset(&mut controllers).unwrap();
            assert_eq!(game.events().len(), 3);

            let position = game.world().boundary().center();
            game.spawn(&SpawnRequest::Exact {
                kind: EnemyType::Spiral,
                position,
            })
            .unwrap();
            for _ in 0..30 {
                game.update(1.0 / 60.0, &mut controllers).unwrap();
            }
            assert!(game.events().len() > 3);
        }
    }

    #[test]
    fn test_every_level_rearms_every_player() {
        let config = GameConfig {
            seed: Some(11),
            director: DirectorConfig {
                initial_level_time: 0.5,
                time_coefficient: 0.0,
                minimum_level_time: 0.5,
                ..DirectorConfig::default()
            },
            player: PlayerConfig {
                starting_lives: 100,
                ..PlayerConfig::default()
            },
            ..GameConfig::default()
        };
        let mut game = Game::new(config, &MemoryAssetProvider::with_defaults()).unwrap();
        let mut controllers = one_controller();
        controllers.connect(ControllerId(1));
        game.reset(&mut controllers).unwrap();

        let ids = [ControllerId(0), ControllerId(1)];
        let mut armouries = [HashSet::new(), HashSet::new()];
        for frame in 1..=24 {
            // Each frame outlasts the level budget, so every frame starts a level
            game.update(1.0, &mut controllers).unwrap();
            assert_eq!(game.level(), frame);

            for (id, seen) in ids.iter().zip(&mut armouries) {
                let key = game.world().player_key(*id).unwrap();
                seen.insert(game.world().players()[key].weapon().kind());
            }
        }

        for seen in &armouries {
            assert_eq!(seen.len(), WeaponKind::ALL.len());
        }
    }
}
