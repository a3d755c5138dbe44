//! Specialized collection types
//!
//! Every live entity sits in a slot map addressed by a typed key. Keys stay
//! valid until their entry is removed, and a removed key never resolves to a
//! newer entry, which is what lets projectiles hold on to their owner.

pub use slotmap::{SlotMap, Key};

slotmap::new_key_type! {
    /// Handle to a player in the player arena
    pub struct PlayerKey;

    /// Handle to an enemy in the enemy arena
    pub struct EnemyKey;

    /// Handle to a projectile in the projectile arena
    pub struct ProjectileKey;

    /// Handle to a particle in the particle arena
    pub struct ParticleKey;
}
