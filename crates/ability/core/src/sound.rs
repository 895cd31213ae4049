//! Sound identifiers and playback requests.

use core::fmt;
use core::str::FromStr;

use crate::error::ConfigError;
use crate::ids::ActorId;

/// Normalised (upper-case) sound identifier, e.g. `ENTITY_BLAZE_SHOOT`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct SoundId(String);

impl SoundId {
    /// Low note played when an ability is still cooling down.
    pub const DENIED: &'static str = "BLOCK_NOTE_BLOCK_BASS";

    /// Parses and normalises a configured sound name.
    ///
    /// Accepts ASCII letters, digits, `_`, `.` and `:`; everything else is
    /// rejected as an unparseable identifier.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':'));

        if !valid {
            return Err(ConfigError::InvalidSound {
                raw: raw.to_string(),
            });
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn denied() -> Self {
        Self(Self::DENIED.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SoundId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SoundId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SoundId> for String {
    fn from(value: SoundId) -> Self {
        value.0
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mixer channel a sound is played on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SoundCategory {
    Master,
    Players,
}

/// Outbound request to play a sound at an actor's location.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundRequest {
    pub actor: ActorId,
    pub sound: SoundId,
    pub volume: f32,
    pub pitch: f32,
    pub category: SoundCategory,
}

/// Volume, pitch and channel for a class of sound without the actor bound.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundProfile {
    pub sound: SoundId,
    pub volume: f32,
    pub pitch: f32,
    pub category: SoundCategory,
}

impl SoundProfile {
    pub fn new(sound: SoundId, volume: f32, pitch: f32, category: SoundCategory) -> Self {
        Self {
            sound,
            volume,
            pitch,
            category,
        }
    }

    /// Binds the profile to the actor that should hear it.
    pub fn for_actor(&self, actor: ActorId) -> SoundRequest {
        SoundRequest {
            actor,
            sound: self.sound.clone(),
            volume: self.volume,
            pitch: self.pitch,
            category: self.category,
        }
    }
}
