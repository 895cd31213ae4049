//! Runtime configuration structures and loaders.
use std::env;
use std::time::Duration;

use ability_core::{SoundCategory, SoundId, SoundProfile};

/// Runtime configuration shared by the controller and its timers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Reentrancy window length, in host ticks.
    pub debounce_ticks: u32,
    pub ticks_per_second: u32,
    /// Broadcast capacity per event topic.
    pub event_buffer_size: usize,
    /// Lock shards per concurrent map.
    pub store_shards: usize,
    /// Played when a trigger hits an active cooldown.
    pub denial_sound: SoundProfile,
    pub activation_volume: f32,
    pub activation_pitch: f32,
    pub activation_category: SoundCategory,
}

impl RuntimeConfig {
    pub const DEFAULT_DEBOUNCE_TICKS: u32 = 5;
    pub const DEFAULT_TICKS_PER_SECOND: u32 = 20;
    pub const DEFAULT_EVENT_BUFFER: usize = 100;
    pub const DEFAULT_STORE_SHARDS: usize = 16;

    /// Wall-clock length of the reentrancy window.
    pub fn debounce_window(&self) -> Duration {
        let tps = u64::from(self.ticks_per_second.max(1));
        Duration::from_millis(u64::from(self.debounce_ticks) * 1000 / tps)
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ABILITY_DEBOUNCE_TICKS` - Reentrancy window in ticks (default: 5)
    /// - `ABILITY_TICKS_PER_SECOND` - Host tick rate (default: 20)
    /// - `ABILITY_EVENT_BUFFER` - Broadcast capacity per topic (default: 100)
    /// - `ABILITY_STORE_SHARDS` - Lock shards per map (default: 16)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ticks) = read_env::<u32>("ABILITY_DEBOUNCE_TICKS") {
            config.debounce_ticks = ticks;
        }
        if let Some(tps) = read_env::<u32>("ABILITY_TICKS_PER_SECOND") {
            config.ticks_per_second = tps.max(1);
        }
        if let Some(capacity) = read_env::<usize>("ABILITY_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }
        if let Some(shards) = read_env::<usize>("ABILITY_STORE_SHARDS") {
            config.store_shards = shards.max(1);
        }

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            debounce_ticks: Self::DEFAULT_DEBOUNCE_TICKS,
            ticks_per_second: Self::DEFAULT_TICKS_PER_SECOND,
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER,
            store_shards: Self::DEFAULT_STORE_SHARDS,
            denial_sound: SoundProfile::new(SoundId::denied(), 1.0, 0.5, SoundCategory::Master),
            activation_volume: 1.0,
            activation_pitch: 1.0,
            activation_category: SoundCategory::Players,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
