//! Players

use std::sync::Arc;

use super::body::{Body, Drawable};
use super::particle::{Explosion, ExplosionSize};
use crate::assets::ModelTemplate;
use crate::config::PlayerConfig;
use crate::foundation::math::{angle_of, extend, Vec3};
use crate::input::{ControllerId, GameController};
use crate::physics::Boundary;
use crate::render::{Color, DrawKind};
use crate::weapon::{ProjectileRequest, Weapon};

/// What a player wants the world to do after its update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerIntent {
    /// Projectiles fired this frame
    pub shots: Vec<ProjectileRequest>,
    /// A bomb was triggered this frame
    pub bomb: bool,
}

/// A player ship bound to a controller slot
#[derive(Debug, Clone)]
pub struct Player {
    id: ControllerId,
    body: Body,
    score: u64,
    lives: i32,
    bombs: u32,
    active: bool,
    respawn_in: f32,
    speed: f32,
    respawn_delay: f32,
    weapon: Weapon,
}

impl Player {
    /// Create an active player at `position`
    pub fn new(
        id: ControllerId,
        template: Arc<ModelTemplate>,
        position: Vec3,
        config: &PlayerConfig,
        weapon: Weapon,
    ) -> Self {
        Self {
            id,
            body: Body::new(template, position),
            score: 0,
            lives: config.starting_lives,
            bombs: config.bombs,
            active: true,
            respawn_in: 0.0,
            speed: config.speed,
            respawn_delay: config.respawn_delay,
            weapon,
        }
    }

    /// Controller slot
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// Score so far
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Lives left; negative once eliminated
    pub fn lives(&self) -> i32 {
        self.lives
    }

    /// Bombs left
    pub fn bombs(&self) -> u32 {
        self.bombs
    }

    /// On the field and collidable
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Out of lives
    pub fn is_eliminated(&self) -> bool {
        self.lives < 0
    }

    /// Current weapon
    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Swap the weapon
    pub fn set_weapon(&mut self, weapon: Weapon) {
        self.weapon = weapon;
    }

    /// Credit a kill
    pub fn add_score(&mut self, value: u64) {
        self.score = self.score.saturating_add(value);
    }

    /// Mutable spatial state
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Advance one frame from the controller's state
    pub fn update(
        &mut self,
        delta_time: f32,
        controller: Option<&GameController>,
        boundary: &Boundary,
    ) -> PlayerIntent {
        self.weapon.tick(delta_time);

        if !self.active {
            if !self.is_eliminated() {
                self.respawn_in -= delta_time;
                if self.respawn_in <= 0.0 {
                    self.active = true;
                    self.body.position = boundary.center();
                    self.body.rotation = 0.0;
                }
            }
            self.body.recompute();
            return PlayerIntent::default();
        }

        let Some(controller) = controller else {
            self.body.recompute();
            return PlayerIntent::default();
        };

        let movement = controller.movement();
        if movement.norm_squared() > 0.0 {
            let step =
                boundary.clamp_movement(&self.body.position, movement * self.speed * delta_time);
            self.body.position += extend(&step);
            self.body.rotation = angle_of(movement.x, movement.y);
        }
        self.body.recompute();

        let mut intent = PlayerIntent {
            shots: self.weapon.shoot(self.body.position, controller.aim()),
            bomb: false,
        };

        if controller.is_trigger_pressed() && self.bombs > 0 {
            self.bombs -= 1;
            intent.bomb = true;
        }

        intent
    }

    /// Lose a life. Returns the explosions to emit, or nothing if the player
    /// was not on the field.
    pub fn kill(&mut self) -> Vec<Explosion> {
        if !self.active {
            return Vec::new();
        }

        self.lives -= 1;
        self.active = false;
        self.respawn_in = self.respawn_delay;

        let position = self.body.position;
        vec![
            Explosion::new(position, ExplosionSize::Large, Color::RED),
            Explosion::new(position, ExplosionSize::Large, Color::STEEL_BLUE),
            Explosion::new(position, ExplosionSize::Huge, Color::WHITE),
        ]
    }
}

impl Drawable for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn draw_kind(&self) -> DrawKind {
        DrawKind::Player(self.id)
    }

    fn is_visible(&self) -> bool {
        self.active
    }
}
