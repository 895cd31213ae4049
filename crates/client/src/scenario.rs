//! Scripted trigger scenarios.
//!
//! ```toml
//! [[step]]
//! actor = 1
//! item = "blaze_rod"
//! levels = { dragonfire = 2 }
//!
//! [[step]]
//! delay_ms = 300
//! actor = 1
//! action = "strike"
//! item = "bow"
//! levels = { dragonfire = 2 }
//! target = "storage"
//! grant = ["abilities.cooldowntime.half"]
//! ```

use std::collections::HashMap;
use std::path::Path;

use ability_core::{ActionKind, ActorId, ElementKind, ItemFacts, TriggerEvent, ZoneId};
use anyhow::{Context, Result};
use serde::Deserialize;

/// Ordered list of host triggers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// One trigger, plus the permission changes applied just before it.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Pause before this step, measured from the previous one.
    #[serde(default)]
    pub delay_ms: u64,
    pub actor: u64,
    #[serde(default = "Step::default_action")]
    pub action: ActionKind,
    pub item: String,
    #[serde(default)]
    pub levels: HashMap<String, u32>,
    #[serde(default)]
    pub target: Option<ElementKind>,
    #[serde(default = "Step::default_zone")]
    pub zone: String,
    /// Only evaluate this ability. Without it every ability is dispatched.
    #[serde(default)]
    pub ability: Option<String>,
    #[serde(default)]
    pub grant: Vec<String>,
    #[serde(default)]
    pub revoke: Vec<String>,
    /// Drop all engine state for the actor before triggering.
    #[serde(default)]
    pub forget: bool,
}

impl Step {
    fn default_action() -> ActionKind {
        ActionKind::Engage
    }

    fn default_zone() -> String {
        "world".to_string()
    }

    pub fn actor(&self) -> ActorId {
        ActorId(self.actor)
    }

    /// Host trigger described by this step.
    pub fn event(&self) -> TriggerEvent {
        let item = self
            .levels
            .iter()
            .fold(ItemFacts::new(self.item.as_str()), |item, (id, level)| {
                item.with_ability(id.as_str(), *level)
            });

        let event = TriggerEvent::new(
            self.actor(),
            self.action,
            item,
            ZoneId::new(self.zone.as_str()),
        );
        match self.target {
            Some(kind) => event.targeting(kind),
            None => event,
        }
    }
}

/// Loader for scenario TOML files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> Result<Scenario> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Scenario> {
        toml::from_str(content).context("Failed to parse scenario TOML")
    }
}
