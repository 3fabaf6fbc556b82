use std::collections::HashMap;
use std::sync::Arc;

use crate::effects::{
    BokehEffect, BubbleEffect, FireflyEffect, ParticleEffect, SnowfallEffect, SparkleEffect,
};

/// Name that disables the particle overlay
pub const NO_EFFECT: &str = "none";

/// Normalize a user-facing effect name
///
/// Case and `-`/`_` are not significant, and the legacy `gold_sparkle`
/// name resolves to `sparkle`.
pub fn canonical_name(name: &str) -> String {
    let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
    match normalized.as_str() {
        "gold_sparkle" => "sparkle".to_string(),
        "" => NO_EFFECT.to_string(),
        _ => normalized,
    }
}

/// Registry for managing available particle effects
///
/// Effects are stateless, so the registry hands out shared instances that
/// can be used from every render thread at once.
pub struct EffectRegistry {
    effects: HashMap<String, Arc<dyn ParticleEffect>>,
}

impl EffectRegistry {
    /// Create a new registry with all built-in effects
    pub fn new() -> Self {
        let mut registry = Self {
            effects: HashMap::new(),
        };
        registry.register_builtin_effects();
        registry
    }

    fn register_builtin_effects(&mut self) {
        self.register(Arc::new(SparkleEffect::new()));
        self.register(Arc::new(SnowfallEffect::new()));
        self.register(Arc::new(BokehEffect::new()));
        self.register(Arc::new(FireflyEffect::new()));
        self.register(Arc::new(BubbleEffect::new()));
    }

    /// Register an effect under its own name, replacing any previous one
    pub fn register(&mut self, effect: Arc<dyn ParticleEffect>) {
        self.effects.insert(canonical_name(effect.name()), effect);
    }

    /// Look up an effect by (possibly aliased) name
    ///
    /// Returns `None` for `"none"` and for unknown names.
    pub fn get_effect(&self, name: &str) -> Option<Arc<dyn ParticleEffect>> {
        self.effects.get(&canonical_name(name)).cloned()
    }

    /// Whether `name` is `"none"` or a registered effect
    pub fn is_known(&self, name: &str) -> bool {
        let name = canonical_name(name);
        name == NO_EFFECT || self.effects.contains_key(&name)
    }

    /// Registered effect names in sorted order
    pub fn available_effects(&self) -> Vec<String> {
        let mut names: Vec<String> = self.effects.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
