//! Ability catalog loader.
//!
//! A catalog is one TOML document:
//!
//! ```toml
//! secondary_trigger_items = ["bow", "fishing_rod", "trident"]
//!
//! [messages]
//! on_cooldown = "Wait %seconds%s for %name%"
//!
//! [[tier]]
//! permission = "abilities.cooldowntime.half"
//! multiplier = 0.5
//!
//! [[ability]]
//! id = "dragonfire"
//! display_name = "Dragonfire"
//! cooldown_seconds = 10
//! activation_sound = "entity_ender_dragon_shoot"
//! ```
//!
//! Every section is optional. Missing `tier` and `secondary_trigger_items`
//! fall back to the stock tables; an empty list is taken literally.

use std::collections::HashSet;
use std::path::Path;

use ability_core::{Ability, AbilitySpec, CooldownTier, GateRules, MessageTemplates, TierTable};
use serde::Deserialize;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    messages: MessageTemplates,
    #[serde(default, rename = "tier")]
    tiers: Option<Vec<CooldownTier>>,
    #[serde(default)]
    secondary_trigger_items: Option<Vec<String>>,
    #[serde(default, rename = "ability")]
    abilities: Vec<AbilitySpec>,
}

/// Validated catalog contents, ready for the runtime builder.
#[derive(Clone, Debug)]
pub struct AbilityCatalog {
    pub abilities: Vec<Ability>,
    pub messages: MessageTemplates,
    pub tiers: TierTable,
    pub rules: GateRules,
}

impl AbilityCatalog {
    pub fn ability(&self, id: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.id().as_str() == id)
    }
}

/// Loader for ability catalogs from TOML files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load and validate a catalog file.
    pub fn load(path: &Path) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        let catalog = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid catalog {}: {:#}", path.display(), e))?;

        debug!(
            path = %path.display(),
            abilities = catalog.abilities.len(),
            tiers = catalog.tiers.tiers().len(),
            "loaded ability catalog"
        );
        Ok(catalog)
    }

    /// Parse and validate catalog TOML.
    pub fn parse(content: &str) -> LoadResult<AbilityCatalog> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog TOML: {}", e))?;

        let tiers = file.tiers.map_or_else(TierTable::default, TierTable::new);

        let rules = match file.secondary_trigger_items {
            Some(items) => GateRules::new(items),
            None => GateRules::default(),
        };

        let mut seen = HashSet::new();
        let mut abilities = Vec::with_capacity(file.abilities.len());
        for (index, spec) in file.abilities.into_iter().enumerate() {
            let ability = Ability::from_spec(spec)
                .map_err(|e| anyhow::anyhow!("ability #{}: {}", index + 1, e))?;
            if !seen.insert(ability.id().clone()) {
                anyhow::bail!("ability {} is defined more than once", ability.id());
            }
            abilities.push(ability);
        }

        Ok(AbilityCatalog {
            abilities,
            messages: file.messages,
            tiers,
            rules,
        })
    }
}
