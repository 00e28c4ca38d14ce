use serde::Deserialize;

use crate::layout::bars::Tier;

/// Colour source for renderers. Colours are CSS colour strings.
pub trait Palette {
    fn primary(&self) -> &str;
    fn secondary(&self) -> &str;
    fn tier_color(&self, tier: Tier) -> &str;

    fn phase_color(&self, phase: &str) -> &str {
        match phase {
            "Running" => self.tier_color(Tier::Ok),
            "Pending" => self.tier_color(Tier::Warning),
            "Failed" => self.tier_color(Tier::Critical),
            _ => self.secondary(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Theme {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_secondary")]
    pub secondary: String,
    #[serde(default = "default_ok")]
    pub ok: String,
    #[serde(default = "default_warning")]
    pub warning: String,
    #[serde(default = "default_critical")]
    pub critical: String,
}

fn default_primary() -> String {
    "#aaaaff".to_string()
}

fn default_secondary() -> String {
    "#222233".to_string()
}

fn default_ok() -> String {
    "#00ff00".to_string()
}

fn default_warning() -> String {
    "#ffff00".to_string()
}

fn default_critical() -> String {
    "#ff0000".to_string()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            ok: default_ok(),
            warning: default_warning(),
            critical: default_critical(),
        }
    }
}

impl Palette for Theme {
    fn primary(&self) -> &str {
        &self.primary
    }

    fn secondary(&self) -> &str {
        &self.secondary
    }

    fn tier_color(&self, tier: Tier) -> &str {
        match tier {
            Tier::Ok => &self.ok,
            Tier::Warning => &self.warning,
            Tier::Critical => &self.critical,
        }
    }
}
