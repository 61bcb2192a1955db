use serde::{Deserialize, Serialize};

pub const DEFAULT_USERNAME: &str = "demo";
pub const DEFAULT_FONT_SIZE: &str = "16px";
pub const DEFAULT_THEME: &str = "light";
pub const DEFAULT_BASE_FONT: &str = "Inter, Arial, sans-serif";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
}

/// Display settings owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceDto {
    pub font_size: String,
    pub theme: String,
    pub base_font: String,
}

impl Default for PreferenceDto {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE.to_string(),
            theme: DEFAULT_THEME.to_string(),
            base_font: DEFAULT_BASE_FONT.to_string(),
        }
    }
}

/// Partial preference update. Every field left out (or empty) falls back to
/// its hardcoded default, so an update never keeps a previously stored value
/// for a field it did not supply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PreferenceUpdateInputDto {
    #[serde(default)]
    pub font_size: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub base_font: Option<String>,
}

impl PreferenceUpdateInputDto {
    pub fn resolve(&self) -> PreferenceDto {
        PreferenceDto {
            font_size: resolve_field(self.font_size.as_deref(), DEFAULT_FONT_SIZE),
            theme: resolve_field(self.theme.as_deref(), DEFAULT_THEME),
            base_font: resolve_field(self.base_font.as_deref(), DEFAULT_BASE_FONT),
        }
    }
}

/// A supplied, non-empty value wins. Whitespace counts as a value.
pub fn resolve_field(value: Option<&str>, default: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

/// Only an absent username means `demo`; an empty one is looked up as is.
pub fn resolve_username(value: Option<&str>) -> String {
    value.unwrap_or(DEFAULT_USERNAME).to_string()
}

#[cfg(test)]
#[path = "../tests/core/models_tests.rs"]
mod tests;
