//! Registry of abilities and their effects.

use std::collections::HashMap;
use std::sync::Arc;

use ability_core::{Ability, AbilityEffect, AbilityId};

use super::errors::{Result, RuntimeError};
use crate::reentrancy::ReentrancyGuard;

/// An ability together with its effect and its own reentrancy guard.
pub struct RegisteredAbility {
    ability: Ability,
    effect: Arc<dyn AbilityEffect>,
    guard: ReentrancyGuard,
}

impl RegisteredAbility {
    pub fn new(ability: Ability, effect: Arc<dyn AbilityEffect>, guard: ReentrancyGuard) -> Self {
        Self {
            ability,
            effect,
            guard,
        }
    }

    pub fn ability(&self) -> &Ability {
        &self.ability
    }

    pub fn effect(&self) -> &Arc<dyn AbilityEffect> {
        &self.effect
    }

    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }
}

/// Immutable set of registered abilities, kept in registration order.
#[derive(Default)]
pub struct AbilityRegistry {
    order: Vec<AbilityId>,
    entries: HashMap<AbilityId, RegisteredAbility>,
}

impl AbilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: RegisteredAbility) -> Result<()> {
        let id = entry.ability.id().clone();
        if self.entries.contains_key(&id) {
            return Err(RuntimeError::DuplicateAbility(id));
        }
        self.order.push(id.clone());
        self.entries.insert(id, entry);
        Ok(())
    }

    pub fn get(&self, id: &AbilityId) -> Option<&RegisteredAbility> {
        self.entries.get(id)
    }

    /// Abilities in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredAbility> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
