use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use toml;

use crate::listings::firebase::DEFAULT_API_BASE;
use crate::session::Latency;
use crate::{die, warn};

const API_BASE_ENV_VAR: &str = "SHOWROOM_API_BASE";

#[derive(Deserialize, Serialize, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Keybindings {
    #[default]
    Emacs,
    Vi,
}

#[derive(Deserialize, Serialize, Default, Debug)]
pub(crate) struct Assistant {
    pub reply_delay_ms: Option<u64>,
    pub reply_jitter_ms: Option<u64>,
}

#[derive(Deserialize, Serialize, Default, Debug)]
pub(crate) struct Listings {
    pub api_base: Option<String>,
}

/// A salesperson the user can call from the `call` command
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Contact {
    pub name: String,
    pub phone: String,
}

/// The dealership's salespeople, used unless the config lists its own.
fn default_contacts() -> Vec<Contact> {
    [
        ("Faisal Akbar", "+6282135323619"),
        ("Flavianus Putratama", "+6281932622432"),
    ]
    .into_iter()
    .map(|(name, phone)| Contact {
        name: name.to_string(),
        phone: phone.to_string(),
    })
    .collect()
}

#[derive(Deserialize, Serialize, Debug)]
pub(crate) struct Config {
    #[serde(default)]
    pub keybindings: Keybindings,
    #[serde(default)]
    pub assistant: Assistant,
    #[serde(default)]
    pub listings: Listings,
    #[serde(default = "default_contacts")]
    pub contacts: Vec<Contact>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keybindings: Keybindings::default(),
            assistant: Assistant::default(),
            listings: Listings::default(),
            contacts: default_contacts(),
        }
    }
}

impl Config {
    pub(crate) fn latency(&self) -> Latency {
        let default = Latency::default();

        Latency {
            base: self
                .assistant
                .reply_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(default.base),
            jitter: self
                .assistant
                .reply_jitter_ms
                .map(Duration::from_millis)
                .unwrap_or(default.jitter),
        }
    }

    /// The listings API base. The environment takes precedence over the
    /// config file.
    pub(crate) fn api_base(&self) -> String {
        if let Some(api_base) = std::env::var_os(API_BASE_ENV_VAR) {
            match api_base.into_string() {
                Ok(api_base) => return api_base,
                Err(_) => die!("failed to parse {}", API_BASE_ENV_VAR),
            }
        }

        self.listings
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }
}

fn get_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME");

    if let Some(home) = home {
        let home = PathBuf::from(home);

        const USER_PATHS: [&str; 2] = [".config/showroom/config.toml", ".showroom.toml"];

        for &path in USER_PATHS.iter() {
            let fullpath = home.join(path);

            if fullpath.exists() {
                return Some(fullpath);
            }
        }
    }

    let system_config = PathBuf::from("/etc/showroom.toml");

    if system_config.exists() {
        Some(system_config)
    } else {
        None
    }
}

fn parse_config<S: serde::de::DeserializeOwned>(config: &str) -> Result<S, toml::de::Error> {
    toml::de::from_str(config)
}

fn parse_config_or_die<S: serde::de::DeserializeOwned>(config: &str) -> S {
    match parse_config(config) {
        Ok(s) => s,
        Err(err) => die!("failed to parse config: {}", err),
    }
}

/// Collects the dotted paths of keys present in `user_config` but absent from
/// `config`. Arrays are compared element-wise so keys inside `[[contacts]]`
/// are checked too.
fn extra_fields_helper(
    path: &mut Vec<String>,
    user_value: &toml::Value,
    config_value: &toml::Value,
    extra: &mut Vec<String>,
) {
    match (user_value, config_value) {
        (toml::Value::Table(user_table), toml::Value::Table(config_table)) => {
            for (user_key, user_value) in user_table {
                path.push(user_key.clone());

                match config_table.get(user_key) {
                    Some(config_value) => {
                        extra_fields_helper(path, user_value, config_value, extra)
                    }
                    None => extra.push(path.join(".")),
                }

                path.pop();
            }
        }
        (toml::Value::Array(user_array), toml::Value::Array(config_array)) => {
            for (user_value, config_value) in user_array.iter().zip(config_array) {
                extra_fields_helper(path, user_value, config_value, extra);
            }
        }
        _ => {}
    }
}

fn extra_fields(config: &Config, user_config: &toml::Table) -> Vec<String> {
    let config = match toml::Value::try_from(config) {
        Ok(config) => config,
        Err(err) => die!("failed to reserialize config: {}", err),
    };

    let mut path = Vec::new();
    let mut extra = Vec::new();

    extra_fields_helper(
        &mut path,
        &toml::Value::Table(user_config.clone()),
        &config,
        &mut extra,
    );

    extra
}

pub(crate) fn read_config(config: Option<PathBuf>) -> Config {
    let config_path = config.or_else(get_config_path);

    if let Some(path) = config_path {
        let raw_config = match std::fs::read_to_string(&path) {
            Ok(raw_config) => raw_config,
            Err(err) => die!("failed to read config \"{}\": {}", path.display(), err),
        };

        let config: Config = parse_config_or_die(&raw_config);
        let user_config: toml::Table = parse_config_or_die(&raw_config);

        for key in extra_fields(&config, &user_config) {
            warn!("config contains extraneous key \"{}\", ignoring", key);
        }

        config
    } else {
        Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
keybindings = "vi"

[assistant]
reply_delay_ms = 250
reply_jitter_ms = 100

[listings]
api_base = "http://localhost:9000"

[[contacts]]
name = "Sales"
phone = "+620000000001"

[[contacts]]
name = "Service"
phone = "+620000000002"
"#;

    #[test]
    fn test_parse_full_config() {
        let config: Config = parse_config(CONFIG).unwrap();

        assert_eq!(config.keybindings, Keybindings::Vi);
        assert_eq!(
            config.latency(),
            Latency {
                base: Duration::from_millis(250),
                jitter: Duration::from_millis(100),
            }
        );
        assert_eq!(
            config.listings.api_base.as_deref(),
            Some("http://localhost:9000")
        );
        assert_eq!(config.contacts.len(), 2);
        assert_eq!(config.contacts[1].name, "Service");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = parse_config("").unwrap();

        assert_eq!(config.keybindings, Keybindings::Emacs);
        assert_eq!(config.latency(), Latency::default());
        assert_eq!(config.contacts, default_contacts());
        assert_eq!(config.contacts[0].phone, "+6282135323619");
        assert!(config.listings.api_base.is_none());
    }

    #[test]
    fn test_extra_fields() {
        let raw = r#"
colour = "on"

[assistant]
reply_delay_ms = 10
typing_indicator = true

[[contacts]]
name = "Sales"
phone = "+620000000001"
email = "sales@example.com"
"#;

        let config: Config = parse_config(raw).unwrap();
        let user_config: toml::Table = parse_config(raw).unwrap();

        let mut extra = extra_fields(&config, &user_config);
        extra.sort();

        assert_eq!(
            extra,
            ["assistant.typing_indicator", "colour", "contacts.email"]
        );
    }

    #[test]
    fn test_known_fields_are_not_extra() {
        let config: Config = parse_config(CONFIG).unwrap();
        let user_config: toml::Table = parse_config(CONFIG).unwrap();

        assert!(extra_fields(&config, &user_config).is_empty());
    }

    #[test]
    fn test_contacts_replace_the_defaults() {
        let config: Config = parse_config(CONFIG).unwrap();

        let names: Vec<&str> = config.contacts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Sales", "Service"]);

        let config: Config = parse_config("contacts = []").unwrap();
        assert!(config.contacts.is_empty());

        assert_eq!(Config::default().contacts.len(), 2);
    }

    #[test]
    fn test_invalid_keybindings() {
        let result: Result<Config, _> = parse_config(r#"keybindings = "nano""#);

        assert!(result.is_err());
    }
}
