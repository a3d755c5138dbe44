//! Model templates and the asset provider seam
//!
//! The core never loads files or touches GPU resources. It asks an
//! [`AssetProvider`] for a template's local bounding spheres and an opaque
//! visual handle, and hands that handle back to the renderer when drawing.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entity::EnemyType;
use crate::error::AssetError;
use crate::foundation::math::Vec3;
use crate::physics::BoundingSphere;

/// Template ids the game loads at startup
pub mod template_ids {
    /// Player ship
    pub const PLAYER: &str = "player";
    /// Projectile
    pub const PROJECTILE: &str = "projectile";
    /// Explosion particle
    pub const PARTICLE: &str = "particle";
    /// Pinwheel enemy
    pub const PINWHEEL: &str = "pinwheel";
    /// Spiral enemy
    pub const SPIRAL: &str = "spiral";
    /// Diamond enemy
    pub const DIAMOND: &str = "diamond";
    /// Darter enemy
    pub const DARTER: &str = "darter";
}

/// Opaque renderer-side handle for a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// Source of model data
pub trait AssetProvider {
    /// Local-space bounding spheres of a template, one per mesh part
    fn load_bounding_geometry(&self, template_id: &str) -> Result<Vec<BoundingSphere>, AssetError>;

    /// Opaque visual handle for a template
    fn load_visual(&self, template_id: &str) -> Result<VisualHandle, AssetError>;
}

/// A loaded model: visual handle plus local bounding geometry
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTemplate {
    id: String,
    visual: VisualHandle,
    local_bounds: Vec<BoundingSphere>,
}

impl ModelTemplate {
    /// Build a template directly
    pub fn new(
        id: impl Into<String>,
        visual: VisualHandle,
        local_bounds: Vec<BoundingSphere>,
    ) -> Result<Self, AssetError> {
        let id = id.into();
        if local_bounds.is_empty() {
            return Err(AssetError::EmptyGeometry(id));
        }
        Ok(Self { id, visual, local_bounds })
    }

    /// Load a template through a provider
    pub fn load(provider: &dyn AssetProvider, template_id: &str) -> Result<Arc<Self>, AssetError> {
        let local_bounds = provider.load_bounding_geometry(template_id)?;
        let visual = provider.load_visual(template_id)?;
        Self::new(template_id, visual, local_bounds).map(Arc::new)
    }

    /// Template id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Visual handle for the renderer
    pub fn visual(&self) -> VisualHandle {
        self.visual
    }

    /// Local-space bounding spheres
    pub fn local_bounds(&self) -> &[BoundingSphere] {
        &self.local_bounds
    }
}

/// Every template the game needs, loaded once
#[derive(Debug, Clone)]
pub struct TemplateSet {
    /// Player ship
    pub player: Arc<ModelTemplate>,
    /// Projectile
    pub projectile: Arc<ModelTemplate>,
    /// Explosion particle
    pub particle: Arc<ModelTemplate>,
    enemies: HashMap<EnemyType, Arc<ModelTemplate>>,
}

impl TemplateSet {
    /// Load every template, failing on the first missing one
    pub fn load(provider: &dyn AssetProvider) -> Result<Self, AssetError> {
        let mut enemies = HashMap::new();
        for kind in EnemyType::CONCRETE {
            enemies.insert(kind, ModelTemplate::load(provider, kind.template_id())?);
        }

        Ok(Self {
            player: ModelTemplate::load(provider, template_ids::PLAYER)?,
            projectile: ModelTemplate::load(provider, template_ids::PROJECTILE)?,
            particle: ModelTemplate::load(provider, template_ids::PARTICLE)?,
            enemies,
        })
    }

    /// Template for an enemy category
    pub fn enemy(&self, kind: EnemyType) -> Option<&Arc<ModelTemplate>> {
        self.enemies.get(&kind)
    }
}

/// In-memory asset provider, used by tests and the headless app
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetProvider {
    templates: HashMap<String, (VisualHandle, Vec<BoundingSphere>)>,
    next_handle: u64,
}

impl MemoryAssetProvider {
    /// Create an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider holding simple geometry for every template the game loads
    pub fn with_defaults() -> Self {
        let unit = |radius: f32| vec![BoundingSphere::new(Vec3::zeros(), radius)];

        let mut provider = Self::new();
        provider.insert(template_ids::PLAYER, unit(1.5));
        provider.insert(template_ids::PROJECTILE, unit(0.5));
        provider.insert(template_ids::PARTICLE, unit(0.1));
        provider.insert(template_ids::PINWHEEL, unit(1.0));
        provider.insert(template_ids::SPIRAL, unit(1.0));
        provider.insert(
            template_ids::DIAMOND,
            vec![
                BoundingSphere::new(Vec3::new(0.0, 0.5, 0.0), 0.6),
                BoundingSphere::new(Vec3::new(0.0, -0.5, 0.0), 0.6),
            ],
        );
        provider.insert(template_ids::DARTER, unit(1.0));
        provider
    }

    /// Add or replace a template
    pub fn insert(&mut self, template_id: &str, bounds: Vec<BoundingSphere>) {
        self.next_handle += 1;
        self.templates
            .insert(template_id.to_string(), (VisualHandle(self.next_handle), bounds));
    }

    /// Remove a template
    pub fn remove(&mut self, template_id: &str) {
        self.templates.remove(template_id);
    }
}

impl AssetProvider for MemoryAssetProvider {
    fn load_bounding_geometry(&self, template_id: &str) -> Result<Vec<BoundingSphere>, AssetError> {
        self.templates
            .get(template_id)
            .map(|(_, bounds)| bounds.clone())
            .ok_or_else(|| AssetError::MissingTemplate(template_id.to_string()))
    }

    fn load_visual(&self, template_id: &str) -> Result<VisualHandle, AssetError> {
        self.templates
            .get(template_id)
            .map(|(visual, _)| *visual)
            .ok_or_else(|| AssetError::MissingTemplate(template_id.to_string()))
    }
}
