//! Player-facing notice templates.

/// Notice templates with `%seconds%` and `%name%` placeholders.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MessageTemplates {
    pub on_cooldown: String,
    pub used_ability: String,
}

impl MessageTemplates {
    pub const SECONDS: &'static str = "%seconds%";
    pub const NAME: &'static str = "%name%";

    pub fn on_cooldown(&self, remaining_seconds: u32, name: &str) -> String {
        self.on_cooldown
            .replace(Self::SECONDS, &remaining_seconds.to_string())
            .replace(Self::NAME, name)
    }

    pub fn used_ability(&self, name: &str) -> String {
        self.used_ability.replace(Self::NAME, name)
    }
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            on_cooldown: "This ability is on cooldown! Wait %seconds% seconds to use %name%"
                .to_string(),
            used_ability: "Used %name%!".to_string(),
        }
    }
}
