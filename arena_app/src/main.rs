//! Headless arena demo
//!
//! Runs the simulation without a window: a handful of bots wander the arena
//! firing in random directions while the directors ramp up the levels. Draw
//! requests are counted instead of rendered.
//!
//! Usage: `arena_headless [config.toml|config.ron] [frames]`

use arena_core::foundation::logging;
use arena_core::foundation::math::Vec2;
use arena_core::prelude::*;
use arena_core::render::DrawKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const FRAME_TIME: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 60 * 60;
const BOT_COUNT: u8 = 2;

/// Controllers steered by a random walk
struct BotControllers {
    rng: StdRng,
    states: Vec<(ControllerId, ControllerState)>,
}

impl BotControllers {
    fn new(count: u8, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            states: (0..count)
                .map(|slot| (ControllerId(slot), ControllerState::default()))
                .collect(),
        }
    }

    fn random_stick(&mut self) -> Vec2 {
        Vec2::new(self.rng.gen_range(-1.0..=1.0), self.rng.gen_range(-1.0..=1.0))
    }
}

impl ControllerProvider for BotControllers {
    fn connected_controllers(&mut self) -> Vec<(ControllerId, ControllerState)> {
        for index in 0..self.states.len() {
            // Change direction now and then so the walk covers the arena
            if self.rng.gen_bool(0.05) {
                let left = self.random_stick();
                let right = self.random_stick();
                let state = &mut self.states[index].1;
                state.left_stick = left;
                state.right_stick = right;
            }
            self.states[index].1.right_trigger = if self.rng.gen_bool(0.002) { 1.0 } else { 0.0 };
        }
        self.states.clone()
    }
}

/// Renderer that only counts what it is asked to draw
#[derive(Debug, Default)]
struct CountingRenderer {
    players: u64,
    enemies: u64,
    projectiles: u64,
    particles: u64,
}

impl Renderer for CountingRenderer {
    fn draw(&mut self, request: &DrawRequest) {
        match request.kind {
            DrawKind::Player(_) => self.players += 1,
            DrawKind::Enemy(_) => self.enemies += 1,
            DrawKind::Projectile => self.projectiles += 1,
            DrawKind::Particle => self.particles += 1,
        }
    }
}

fn load_config(path: Option<&str>) -> Result<GameConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            log::info!("Loading config from {}", path);
            Ok(GameConfig::load_from_file(path)?)
        }
        None => Ok(GameConfig::default()),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let frames = match args.get(1) {
        Some(frames) => frames.parse()?,
        None => DEFAULT_FRAMES,
    };
    let seed = config.seed.unwrap_or(0);

    let assets = MemoryAssetProvider::with_defaults();
    let mut game = Game::new(config, &assets)?;
    game.subscribe(|event: &GameEvent| match event {
        GameEvent::LevelIncreased { level, budget, director } => {
            log::info!("Level {} ({:.1}s, {})", level, budget, director);
        }
        GameEvent::PlayerEliminated { player, score } => {
            log::info!("Player {} out with {} points", player.0, score);
        }
        _ => log::debug!("{:?}", event),
    });

    let mut controllers = BotControllers::new(BOT_COUNT, seed);
    let mut renderer = CountingRenderer::default();
    game.reset(&mut controllers)?;

    let mut frame = 0;
    while frame < frames && game.state() != GameState::GameOver {
        game.update(FRAME_TIME, &mut controllers)?;
        game.draw(&mut renderer, 16.0 / 9.0);
        game.drain_events();
        frame += 1;
    }

    let snapshot = game.snapshot();
    log::info!(
        "Stopped after {} frames ({:.1}s simulated) in {:?} at level {}",
        frame,
        snapshot.elapsed,
        snapshot.state,
        snapshot.level
    );
    for player in &snapshot.players {
        log::info!(
            "Player {}: {} points, {} lives, {} bombs",
            player.id.0,
            player.score,
            player.lives,
            player.bombs
        );
    }
    log::info!(
        "Draw requests: {} players, {} enemies, {} projectiles, {} particles",
        renderer.players,
        renderer.enemies,
        renderer.projectiles,
        renderer.particles
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level("info");
    log::info!("Starting headless arena");

    let result = run();
    if let Err(e) = &result {
        log::error!("Arena stopped: {}", e);
    }
    result
}
