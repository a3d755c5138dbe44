//! Game entities
//!
//! Every entity owns a [`Body`] holding its position, rotation, scale and
//! the transform and bounding volumes derived from them. Behaviour is
//! per-type rather than inherited: enemies carry an [`EnemyType`] tag that
//! selects their profile and motion rule.

pub mod body;
pub mod enemy;
pub mod particle;
pub mod player;
pub mod projectile;

pub use body::{Body, Drawable, Killable};
pub use enemy::{Enemy, EnemyFilter, EnemyProfile, EnemyType};
pub use particle::{Explosion, ExplosionSize, Particle};
pub use player::{Player, PlayerIntent};
pub use projectile::Projectile;
