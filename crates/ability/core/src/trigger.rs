//! Inbound trigger facts reported by the host.
//!
//! The host resolves world and inventory queries before calling into the
//! engine; everything here is an already-computed fact.

use std::collections::HashMap;

use crate::ids::{AbilityId, ActorId, ZoneId};

/// Motion the actor performed.
///
/// `Engage` is the "use" interaction (right click), `Strike` the "hit"
/// interaction (left click).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ActionKind {
    Engage,
    Strike,
}

/// Category of the world element a trigger points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ElementKind {
    /// Chests, barrels, hoppers and anything else with an inventory.
    Storage,
    CraftingStation,
    /// Anvils.
    SmithingStation,
    /// Grindstones.
    GrindingStation,
    EnchantingStation,
    /// Furnaces and similar.
    HeatSource,
    /// Any element without an interaction of its own.
    Plain,
}

impl ElementKind {
    /// Elements whose interaction belongs to another system.
    pub const fn is_reserved(self) -> bool {
        !matches!(self, Self::Plain)
    }
}

/// The world element a trigger targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetedElement {
    pub kind: ElementKind,
}

impl TargetedElement {
    pub const fn new(kind: ElementKind) -> Self {
        Self { kind }
    }
}

/// Facts about the item in the actor's active hand.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemFacts {
    /// Host item type, e.g. `"bow"` or `"diamond_sword"`.
    pub item_type: String,
    /// Ability levels carried by the item.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ability_levels: HashMap<AbilityId, u32>,
}

impl ItemFacts {
    pub fn new(item_type: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            ability_levels: HashMap::new(),
        }
    }

    /// Adds an ability at the given level (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: impl Into<AbilityId>, level: u32) -> Self {
        self.ability_levels.insert(ability.into(), level);
        self
    }

    pub fn level_of(&self, ability: &AbilityId) -> Option<u32> {
        self.ability_levels.get(ability).copied()
    }
}

/// Which motion an item expects before any of its abilities can fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerClass {
    /// Held-and-used items; fire on [`ActionKind::Engage`].
    Primary,
    /// Ranged or thrown tools whose "use" is already taken; fire on
    /// [`ActionKind::Strike`].
    Secondary,
}

impl TriggerClass {
    pub const fn required_action(self) -> ActionKind {
        match self {
            Self::Primary => ActionKind::Engage,
            Self::Secondary => ActionKind::Strike,
        }
    }
}

/// One host-reported actor interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerEvent {
    pub actor: ActorId,
    pub action: ActionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: Option<TargetedElement>,
    pub item: ItemFacts,
    pub zone: ZoneId,
}

impl TriggerEvent {
    pub fn new(actor: ActorId, action: ActionKind, item: ItemFacts, zone: ZoneId) -> Self {
        Self {
            actor,
            action,
            target: None,
            item,
            zone,
        }
    }

    /// Attaches a targeted world element (builder pattern).
    #[must_use]
    pub fn targeting(mut self, kind: ElementKind) -> Self {
        self.target = Some(TargetedElement::new(kind));
        self
    }
}
