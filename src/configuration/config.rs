#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

use crate::domain::models::StoreName;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    Address,
    BackendHealthCheckTimeout,
    BucketToken,
    BucketURL,
    ConfigFile,
    Models,
    #[strum(serialize = "openai-token")]
    OpenAiToken,
    #[strum(serialize = "openai-url")]
    OpenAiURL,
    SessionIdleTimeout,
    SettingsFile,
    TranscriptStore,
    TranscriptsDir,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    /// Configured model identifiers offered in the sidebar selector.
    pub fn models() -> Vec<String> {
        return Config::get(ConfigKey::Models)
            .split(',')
            .map(|model| return model.trim().to_string())
            .filter(|model| return !model.is_empty())
            .collect();
    }

    pub fn default(key: ConfigKey) -> String {
        let default_store = StoreName::Local.to_string();

        #[cfg(not(target_os = "macos"))]
        let config_path = dirs::config_dir()
            .unwrap_or_else(|| return path::PathBuf::from("."))
            .join("chatgui/config.toml");
        #[cfg(target_os = "macos")]
        let config_path = path::PathBuf::from(env::var("HOME").unwrap_or_default())
            .join(".config/chatgui/config.toml");

        let cwd = env::current_dir()
            .unwrap_or_else(|_| return path::PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        let res = match key {
            ConfigKey::Address => "127.0.0.1:8501",
            ConfigKey::BackendHealthCheckTimeout => "1000",
            ConfigKey::BucketToken => "",
            ConfigKey::BucketURL => "https://storage.googleapis.com",
            ConfigKey::Models => "gpt-3.5-turbo,gpt-4",
            ConfigKey::OpenAiToken => "",
            ConfigKey::OpenAiURL => "https://api.openai.com",
            ConfigKey::SessionIdleTimeout => "1800",
            ConfigKey::SettingsFile => "./config.json",
            ConfigKey::TranscriptStore => &default_store,
            ConfigKey::TranscriptsDir => &cwd,

            // Special
            ConfigKey::ConfigFile => config_path.to_str().unwrap_or_default(),
        };

        return res.to_string();
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                if let Some(val) = doc.get(&key.to_string()) {
                    // Use clap value parsers to do validation.
                    let mut possible_values = vec![];
                    if let Some(arg) = cmd
                        .get_arguments()
                        .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    {
                        possible_values = arg
                            .get_possible_values()
                            .iter()
                            .map(|e| return e.get_name().to_string())
                            .collect::<Vec<String>>();
                    }

                    if let Some(val_int) = val.as_integer() {
                        Config::set(key, &val_int.to_string());
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if !possible_values.is_empty()
                            && !possible_values.contains(&val_str.to_string())
                        {
                            bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                        }
                        Config::set(key, val_str);
                    } else if let Some(val_arr) = val.as_array() {
                        let joined = val_arr
                            .iter()
                            .filter_map(|e| return e.as_str())
                            .collect::<Vec<&str>>()
                            .join(",");
                        Config::set(key, &joined);
                    }
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            address = Config::get(ConfigKey::Address),
            models = Config::get(ConfigKey::Models),
            settings_file = Config::get(ConfigKey::SettingsFile),
            transcript_store = Config::get(ConfigKey::TranscriptStore),
            transcripts_dir = Config::get(ConfigKey::TranscriptsDir),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                if !arg.get_possible_values().is_empty() {
                    let possible_values = arg
                        .get_possible_values()
                        .iter()
                        .map(|e| return e.get_name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    description = format!("{description} [possible values: {}]", possible_values);
                }

                let mut val = Config::default(key);
                if key == ConfigKey::TranscriptsDir || val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i32>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
