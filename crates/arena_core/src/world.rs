//! Entity collections and the frame pipeline
//!
//! A frame runs in fixed order:
//!
//! 1. queued commands (spawns, shots, bombs, explosions) are applied
//! 2. update pass: every entity moves and recomputes its bounding volumes
//! 3. collision pass: projectiles against enemies, then players against
//!    enemies, through the spatial grid
//! 4. death sweep: dead entities fire their death effects once and leave
//!    their collection
//!
//! Nothing that happens during a frame inserts into a collection directly.
//! New entities are queued as [`Command`]s and appear at step 1 of the next
//! frame, so the passes never see a collection change under them.

use std::sync::Arc;

use rand::rngs::StdRng;

use crate::assets::{AssetProvider, TemplateSet};
use crate::config::{GameConfig, ParticleConfig, PlayerConfig, WeaponConfig};
use crate::entity::{Drawable, Enemy, Explosion, Killable, Particle, Player, Projectile};
use crate::error::{GameError, SpawnError};
use crate::events::{EventQueue, GameEvent};
use crate::foundation::collections::{EnemyKey, Key, ParticleKey, PlayerKey, ProjectileKey, SlotMap};
use crate::foundation::logging::{debug, trace, warn};
use crate::foundation::math::Vec3;
use crate::input::{ControllerHub, ControllerId};
use crate::physics::{intersects_any, Boundary};
use crate::render::{Camera, Renderer};
use crate::spatial::SpatialGrid;
use crate::spawn::{SpawnFactory, SpawnRequest};
use crate::weapon::{ProjectileRequest, Weapon};

/// Deferred change to the collections
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Spawn an enemy through the factory
    Spawn(SpawnRequest),
    /// Create a projectile owned by a player
    Fire {
        /// Firing player
        owner: PlayerKey,
        /// Projectile to create
        request: ProjectileRequest,
    },
    /// Emit explosion particles
    Explode(Explosion),
    /// Kill every enemy, crediting the bomber
    Detonate(PlayerKey),
}

/// What the game loop needs to know after a step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Players that ran out of lives this frame
    pub eliminated: Vec<ControllerId>,
}

/// Sizes of the four collections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityCounts {
    /// Players still in the game
    pub players: usize,
    /// Live enemies
    pub enemies: usize,
    /// Projectiles in flight
    pub projectiles: usize,
    /// Explosion particles
    pub particles: usize,
}

/// Every live entity plus the machinery to advance them
pub struct World {
    boundary: Boundary,
    templates: TemplateSet,
    factory: SpawnFactory,
    player_config: PlayerConfig,
    weapon_config: WeaponConfig,
    particle_config: ParticleConfig,
    players: SlotMap<PlayerKey, Player>,
    enemies: SlotMap<EnemyKey, Enemy>,
    projectiles: SlotMap<ProjectileKey, Projectile>,
    particles: SlotMap<ParticleKey, Particle>,
    commands: Vec<Command>,
    grid: SpatialGrid<EnemyKey>,
    player_deaths: Vec<(PlayerKey, Vec<Explosion>)>,
}

impl World {
    /// Load templates and build an empty world
    pub fn new(config: &GameConfig, assets: &dyn AssetProvider) -> Result<Self, GameError> {
        let templates = TemplateSet::load(assets)?;
        let factory = SpawnFactory::with_templates(&templates)?;

        Ok(Self {
            boundary: Boundary::centered(config.arena.half_extent),
            templates,
            factory,
            player_config: config.player.clone(),
            weapon_config: config.weapons.clone(),
            particle_config: config.particles.clone(),
            players: SlotMap::with_key(),
            enemies: SlotMap::with_key(),
            projectiles: SlotMap::with_key(),
            particles: SlotMap::with_key(),
            commands: Vec::new(),
            grid: SpatialGrid::new(config.spatial.cell_size),
            player_deaths: Vec::new(),
        })
    }

    /// Playfield
    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    /// Loaded templates
    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Enemy factory
    pub fn factory(&self) -> &SpawnFactory {
        &self.factory
    }

    /// Players
    pub fn players(&self) -> &SlotMap<PlayerKey, Player> {
        &self.players
    }

    /// Enemies
    pub fn enemies(&self) -> &SlotMap<EnemyKey, Enemy> {
        &self.enemies
    }

    /// Projectiles
    pub fn projectiles(&self) -> &SlotMap<ProjectileKey, Projectile> {
        &self.projectiles
    }

    /// Particles
    pub fn particles(&self) -> &SlotMap<ParticleKey, Particle> {
        &self.particles
    }

    /// Mutable player access
    pub fn player_mut(&mut self, key: PlayerKey) -> Option<&mut Player> {
        self.players.get_mut(key)
    }

    /// Mutable enemy access
    pub fn enemy_mut(&mut self, key: EnemyKey) -> Option<&mut Enemy> {
        self.enemies.get_mut(key)
    }

    /// Mutable projectile access
    pub fn projectile_mut(&mut self, key: ProjectileKey) -> Option<&mut Projectile> {
        self.projectiles.get_mut(key)
    }

    /// Find the player bound to a controller
    pub fn player_key(&self, id: ControllerId) -> Option<PlayerKey> {
        self.players
            .iter()
            .find(|(_, player)| player.id() == id)
            .map(|(key, _)| key)
    }

    /// Collection sizes
    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            players: self.players.len(),
            enemies: self.enemies.len(),
            projectiles: self.projectiles.len(),
            particles: self.particles.len(),
        }
    }

    /// Commands waiting for the next step
    pub fn pending_commands(&self) -> &[Command] {
        &self.commands
    }

    /// Empty every collection and drop queued commands
    pub fn clear(&mut self) {
        self.players.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.particles.clear();
        self.commands.clear();
        self.grid.clear();
        self.player_deaths.clear();
    }

    /// Add a player at the arena centre with a random weapon
    pub fn add_player(&mut self, id: ControllerId, rng: &mut StdRng) -> PlayerKey {
        let weapon = Weapon::random(&self.weapon_config, rng);
        let player = Player::new(
            id,
            Arc::clone(&self.templates.player),
            self.boundary.center(),
            &self.player_config,
            weapon,
        );
        self.players.insert(player)
    }

    /// Insert an already built enemy
    pub fn insert_enemy(&mut self, enemy: Enemy) -> EnemyKey {
        self.enemies.insert(enemy)
    }

    /// Insert an already built projectile
    pub fn insert_projectile(&mut self, projectile: Projectile) -> ProjectileKey {
        self.projectiles.insert(projectile)
    }

    /// Spawn an enemy right away, outside the frame pipeline
    pub fn spawn(
        &mut self,
        request: &SpawnRequest,
        rng: &mut StdRng,
    ) -> Result<EnemyKey, SpawnError> {
        let enemy = self.factory.fulfil(request, rng)?;
        Ok(self.enemies.insert(enemy))
    }

    /// Queue a command for the next step
    pub fn queue(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Give every player a new random weapon
    pub fn reroll_weapons(&mut self, rng: &mut StdRng) {
        for player in self.players.values_mut() {
            let weapon = Weapon::random(&self.weapon_config, rng);
            debug!("Player {:?} re-armed with {:?}", player.id(), weapon.kind());
            player.set_weapon(weapon);
        }
    }

    /// Run one frame of the pipeline
    pub fn step(
        &mut self,
        delta_time: f32,
        hub: &ControllerHub,
        rng: &mut StdRng,
        events: &mut EventQueue,
    ) -> Result<StepOutcome, GameError> {
        self.apply_commands(rng)?;
        self.update_pass(delta_time, hub);
        self.collision_pass();
        let outcome = self.sweep(events);

        let counts = self.counts();
        trace!(
            "Frame: {} players, {} enemies, {} projectiles, {} particles",
            counts.players,
            counts.enemies,
            counts.projectiles,
            counts.particles
        );
        Ok(outcome)
    }

    /// Advance only the particles, materialising queued explosions and
    /// dropping every other queued command.
    pub fn step_particles(&mut self, rng: &mut StdRng) {
        for command in std::mem::take(&mut self.commands) {
            if let Command::Explode(explosion) = command {
                self.emit(&explosion, rng);
            }
        }

        for particle in self.particles.values_mut() {
            particle.update();
        }
        sweep_dead(&mut self.particles, |_| {});
    }

    /// Apply and clear every queued command
    pub fn apply_commands(&mut self, rng: &mut StdRng) -> Result<(), SpawnError> {
        for command in std::mem::take(&mut self.commands) {
            match command {
                Command::Spawn(request) => {
                    let enemy = self.factory.fulfil(&request, rng)?;
                    self.enemies.insert(enemy);
                }
                Command::Fire { owner, request } => {
                    if self.players.contains_key(owner) {
                        self.projectiles.insert(Projectile::new(
                            Arc::clone(&self.templates.projectile),
                            Some(owner),
                            request.position,
                            request.direction,
                            request.power,
                        ));
                    }
                }
                Command::Explode(explosion) => self.emit(&explosion, rng),
                Command::Detonate(bomber) => {
                    self.detonate(bomber);
                }
            }
        }
        Ok(())
    }

    /// Kill every live enemy and credit its value to `bomber`. Returns the
    /// number of enemies killed.
    pub fn detonate(&mut self, bomber: PlayerKey) -> usize {
        let Some(player) = self.players.get_mut(bomber) else {
            return 0;
        };

        let mut killed = 0;
        let mut total = 0;
        for enemy in self.enemies.values_mut().filter(|enemy| enemy.is_alive()) {
            enemy.kill();
            enemy.credit_to(player.id());
            total += enemy.value();
            killed += 1;
        }
        player.add_score(total);
        debug!("Player {:?} bombed {} enemies for {}", player.id(), killed, total);
        killed
    }

    /// Force every enemy and projectile dead, crediting nobody
    pub fn kill_all(&mut self) {
        for enemy in self.enemies.values_mut() {
            enemy.kill();
        }
        for projectile in self.projectiles.values_mut() {
            projectile.kill();
        }
    }

    /// Update pass
    pub fn update_pass(&mut self, delta_time: f32, hub: &ControllerHub) {
        let boundary = self.boundary;

        for (key, player) in &mut self.players {
            let intent = player.update(delta_time, hub.get(player.id()), &boundary);
            for request in intent.shots {
                self.commands.push(Command::Fire { owner: key, request });
            }
            if intent.bomb {
                self.commands.push(Command::Detonate(key));
            }
            if player.is_active() && !player.body().is_finite() {
                warn!("Player {:?} left the number line, killing it", player.id());
                self.player_deaths.push((key, player.kill()));
            }
        }

        let targets: Vec<Vec3> = self
            .players
            .values()
            .filter(|player| player.is_active())
            .map(|player| player.body().position)
            .collect();

        for (key, enemy) in &mut self.enemies {
            enemy.update(delta_time, &targets, &boundary);
            if enemy.is_alive() && !enemy.body().is_finite() {
                warn!(
                    "Enemy {:?} ({:?}) has a non-finite transform, removing it",
                    key,
                    enemy.kind()
                );
                enemy.kill();
            }
        }

        for (key, projectile) in &mut self.projectiles {
            projectile.update(&boundary);
            if projectile.is_alive() && !projectile.body().is_finite() {
                warn!("Projectile {:?} has a non-finite transform, removing it", key);
                projectile.kill();
            }
        }

        for particle in self.particles.values_mut() {
            particle.update();
            if particle.is_alive() && !particle.body().is_finite() {
                particle.kill();
            }
        }
    }

    /// Collision pass
    ///
    /// Each projectile damages at most the first live enemy it overlaps, in
    /// key order, and dies. Each active player touching a live enemy is
    /// killed and takes that enemy with it.
    pub fn collision_pass(&mut self) {
        self.grid.clear();
        for (key, enemy) in &self.enemies {
            if enemy.is_alive() {
                self.grid.insert(key, enemy.body().bounding_volumes());
            }
        }

        for projectile in self.projectiles.values_mut() {
            if !projectile.is_alive() {
                continue;
            }

            for key in self.grid.query(projectile.body().bounding_volumes()) {
                let Some(enemy) = self.enemies.get_mut(key) else {
                    continue;
                };
                let touching = intersects_any(
                    projectile.body().bounding_volumes(),
                    enemy.body().bounding_volumes(),
                );
                if !enemy.is_alive() || !touching {
                    continue;
                }

                projectile.kill();
                if let Some(value) = enemy.damage(projectile.power()) {
                    let owner = projectile.owner().and_then(|owner| self.players.get_mut(owner));
                    if let Some(owner) = owner {
                        owner.add_score(value);
                        enemy.credit_to(owner.id());
                    }
                }
                break;
            }
        }

        for (player_key, player) in &mut self.players {
            if !player.is_active() {
                continue;
            }

            for key in self.grid.query(player.body().bounding_volumes()) {
                let Some(enemy) = self.enemies.get_mut(key) else {
                    continue;
                };
                let touching = intersects_any(
                    player.body().bounding_volumes(),
                    enemy.body().bounding_volumes(),
                );
                if !enemy.is_alive() || !touching {
                    continue;
                }

                enemy.kill();
                self.player_deaths.push((player_key, player.kill()));
                break;
            }
        }
    }

    /// Death sweep
    ///
    /// Every dead entity fires its death effect exactly once and is removed.
    /// Running it again without an update in between changes nothing.
    pub fn sweep(&mut self, events: &mut EventQueue) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        for (key, explosions) in std::mem::take(&mut self.player_deaths) {
            let Some(player) = self.players.get(key) else {
                continue;
            };
            let (id, lives, score) = (player.id(), player.lives(), player.score());
            let eliminated = player.is_eliminated();

            self.commands.extend(explosions.into_iter().map(Command::Explode));
            events.push(GameEvent::PlayerKilled {
                player: id,
                lives_remaining: lives,
            });

            if eliminated {
                events.push(GameEvent::PlayerEliminated { player: id, score });
                outcome.eliminated.push(id);
                self.players.remove(key);
            }
        }

        let commands = &mut self.commands;
        sweep_dead(&mut self.enemies, |enemy| {
            commands.push(Command::Explode(enemy.death_explosion()));
            events.push(GameEvent::EnemyDestroyed {
                kind: enemy.kind(),
                position: enemy.body().position,
                credited: enemy.credited(),
            });
        });
        sweep_dead(&mut self.projectiles, |projectile| {
            commands.push(Command::Explode(projectile.death_explosion()));
        });
        sweep_dead(&mut self.particles, |_| {});

        outcome
    }

    /// Send one draw request per visible entity
    pub fn draw(&self, renderer: &mut dyn Renderer, camera: &Camera) {
        let view_projection = camera.view_projection();
        draw_all(&self.players, renderer, &view_projection);
        draw_all(&self.enemies, renderer, &view_projection);
        draw_all(&self.projectiles, renderer, &view_projection);
        draw_all(&self.particles, renderer, &view_projection);
    }

    fn emit(&mut self, explosion: &Explosion, rng: &mut StdRng) {
        for _ in 0..explosion.size.particle_count() {
            self.particles.insert(Particle::new(
                Arc::clone(&self.templates.particle),
                explosion,
                &self.particle_config,
                rng,
            ));
        }
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("boundary", &self.boundary)
            .field("counts", &self.counts())
            .field("commands", &self.commands.len())
            .finish()
    }
}

/// Remove every dead entity, calling `on_death` once for each
fn sweep_dead<K: Key, T: Killable>(
    collection: &mut SlotMap<K, T>,
    mut on_death: impl FnMut(&T),
) -> usize {
    let before = collection.len();
    collection.retain(|_, entity| {
        if entity.is_alive() {
            true
        } else {
            on_death(entity);
            false
        }
    });
    before - collection.len()
}

fn draw_all<K: Key, T: Drawable>(
    collection: &SlotMap<K, T>,
    renderer: &mut dyn Renderer,
    view_projection: &crate::foundation::math::Mat4,
) {
    for entity in collection.values().filter(|entity| entity.is_visible()) {
        renderer.draw(&entity.draw_request(view_projection));
    }
}
