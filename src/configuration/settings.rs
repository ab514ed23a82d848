#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use tokio::fs;

/// Slider configuration for the sampling temperature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSettings {
    pub min_value: f32,
    pub max_value: f32,
    pub value: f32,
    pub step: f32,
}

impl Default for TemperatureSettings {
    fn default() -> TemperatureSettings {
        return TemperatureSettings {
            min_value: 0.0,
            max_value: 1.0,
            value: 0.7,
            step: 0.1,
        };
    }
}

impl TemperatureSettings {
    pub fn contains(&self, temperature: f32) -> bool {
        return temperature >= self.min_value && temperature <= self.max_value;
    }

    /// True for values the slider can produce: within bounds and on a step.
    pub fn accepts(&self, temperature: f32) -> bool {
        if !temperature.is_finite() || !self.contains(temperature) {
            return false;
        }

        let steps = (temperature - self.min_value) / self.step;
        return (steps - steps.round()).abs() < 1e-3;
    }
}

/// Static UI settings read once at startup from the settings JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_sidebar_show")]
    pub sidebar_show: bool,
    pub gpt_model_default: String,
    #[serde(default)]
    pub temperature: TemperatureSettings,
    #[serde(default)]
    pub bucket_name: String,
}

fn default_sidebar_show() -> bool {
    return true;
}

impl Default for Settings {
    fn default() -> Settings {
        return Settings {
            sidebar_show: true,
            gpt_model_default: "gpt-3.5-turbo".to_string(),
            temperature: TemperatureSettings::default(),
            bucket_name: "".to_string(),
        };
    }
}

impl Settings {
    pub fn parse(payload: &str) -> Result<Settings> {
        let settings: Settings =
            serde_json::from_str(payload).context("settings file is not valid JSON")?;
        settings.validate()?;

        return Ok(settings);
    }

    /// Reads the settings file, falling back to built-in defaults when it
    /// doesn't exist.
    pub async fn load(file_path: &path::Path) -> Result<Settings> {
        if !file_path.exists() {
            tracing::info!(
                path = ?file_path,
                "Settings file not found, using defaults"
            );
            return Ok(Settings::default());
        }

        let payload = fs::read_to_string(file_path).await?;
        let settings = Settings::parse(&payload)
            .with_context(|| return format!("Failed to load settings from {file_path:?}"))?;

        tracing::debug!(
            sidebar_show = settings.sidebar_show,
            gpt_model_default = settings.gpt_model_default,
            bucket_name = settings.bucket_name,
            "settings"
        );

        return Ok(settings);
    }

    pub fn validate(&self) -> Result<()> {
        let temp = &self.temperature;

        if self.gpt_model_default.trim().is_empty() {
            bail!("gpt_model_default must not be empty");
        }
        if !temp.step.is_finite() || temp.step <= 0.0 {
            bail!(format!("temperature.step must be positive, got {}", temp.step));
        }
        if !(0.0..=1.0).contains(&temp.min_value) || !(0.0..=1.0).contains(&temp.max_value) {
            bail!(format!(
                "temperature bounds must lie within 0.0 and 1.0, got {} to {}",
                temp.min_value, temp.max_value
            ));
        }
        if temp.min_value > temp.max_value {
            bail!(format!(
                "temperature.min_value {} is greater than temperature.max_value {}",
                temp.min_value, temp.max_value
            ));
        }
        if !temp.contains(temp.value) {
            bail!(format!(
                "temperature.value {} is outside of {} to {}",
                temp.value, temp.min_value, temp.max_value
            ));
        }

        return Ok(());
    }

    /// Model identifiers offered in the sidebar. The default model is always
    /// available, and listed first when it isn't part of the configured list.
    pub fn model_choices(&self, configured: &[String]) -> Vec<String> {
        let mut models = configured.to_vec();
        if !models.contains(&self.gpt_model_default) {
            models.insert(0, self.gpt_model_default.to_string());
        }

        return models;
    }
}
