use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::money::parse_price;

pub const DEFAULT_CONFIG_FILE: &str = "sunrise.toml";
pub const NESTED_CONFIG_FILE: &str = "config/sunrise.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub shop: ShopConfig,
    pub menu: MenuConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ShopConfig {
    pub name: String,
}

#[derive(Clone, Debug, Default)]
pub struct MenuConfig {
    pub items: Vec<SeedItem>,
}

/// A menu entry loaded into every new session. Price stays as text so it goes
/// through the same validation as operator input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedItem {
    pub name: String,
    #[serde(deserialize_with = "price_text")]
    pub price: String,
}

/// Accepts `price = "4.50"` as well as a bare TOML number such as `price = 4.50`.
fn price_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PriceValue {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match PriceValue::deserialize(deserializer)? {
        PriceValue::Text(text) => text,
        PriceValue::Integer(value) => value.to_string(),
        PriceValue::Float(value) => value.to_string(),
    })
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub shop_name: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub menu_items: Option<Vec<SeedItem>>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shop: ShopConfig { name: "Sunrise Coffee Shop".to_string() },
            menu: MenuConfig::default(),
            logging: LoggingConfig { level: "warn".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(shop) = patch.shop {
            if let Some(name) = shop.name {
                self.shop.name = name;
            }
        }

        if let Some(menu) = patch.menu {
            if let Some(items) = menu.items {
                self.menu.items = items;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SUNRISE_SHOP_NAME") {
            self.shop.name = value;
        }

        let log_level =
            read_env("SUNRISE_LOGGING_LEVEL").or_else(|| read_env("SUNRISE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SUNRISE_LOGGING_FORMAT").or_else(|| read_env("SUNRISE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(shop_name) = overrides.shop_name {
            self.shop.name = shop_name;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(menu_items) = overrides.menu_items {
            self.menu.items = menu_items;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_shop(&self.shop)?;
        validate_menu(&self.menu)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// Explicit path if it exists, otherwise the first of the conventional locations.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_shop(shop: &ShopConfig) -> Result<(), ConfigError> {
    if shop.name.trim().is_empty() {
        return Err(ConfigError::Validation("shop.name must not be empty".to_string()));
    }
    Ok(())
}

fn validate_menu(menu: &MenuConfig) -> Result<(), ConfigError> {
    for (index, item) in menu.items.iter().enumerate() {
        if item.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "menu.items[{index}].name must not be empty"
            )));
        }
        parse_price(&item.price).map_err(|error| {
            ConfigError::Validation(format!(
                "menu.items[{index}].price for `{}` is invalid: {error}",
                item.name.trim()
            ))
        })?;
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    shop: Option<ShopPatch>,
    menu: Option<MenuPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ShopPatch {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MenuPatch {
    items: Option<Vec<SeedItem>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, SeedItem};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_load_without_file_or_env() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.shop.name == "Sunrise Coffee Shop", "default shop name")?;
        ensure(config.menu.items.is_empty(), "default menu should be empty")?;
        ensure(config.logging.level == "warn", "default log level should be warn")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation_and_seed_menu() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_SUNRISE_LATTE_PRICE", "4.50");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("sunrise.toml");
            fs::write(
                &path,
                r#"
[shop]
name = "Harbor Roasters"

[[menu.items]]
name = "Latte"
price = "${TEST_SUNRISE_LATTE_PRICE}"

[[menu.items]]
name = "Muffin"
price = "3.00"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.shop.name == "Harbor Roasters", "shop name should come from file")?;
            ensure(
                config.menu.items
                    == vec![
                        SeedItem { name: "Latte".to_string(), price: "4.50".to_string() },
                        SeedItem { name: "Muffin".to_string(), price: "3.00".to_string() },
                    ],
                "seed items should be loaded in file order with interpolated price",
            )
        })();

        clear_vars(&["TEST_SUNRISE_LATTE_PRICE"]);
        result
    }

    #[test]
    fn seed_prices_may_be_bare_toml_numbers() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("sunrise.toml");
        fs::write(
            &path,
            "[[menu.items]]\nname = \"Latte\"\nprice = 4.50\n\n\
             [[menu.items]]\nname = \"Drip\"\nprice = 2\n",
        )
        .map_err(|err| err.to_string())?;

        let config =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                .map_err(|err| format!("config load failed: {err}"))?;

        ensure(
            config.menu.items
                == vec![
                    SeedItem { name: "Latte".to_string(), price: "4.5".to_string() },
                    SeedItem { name: "Drip".to_string(), price: "2".to_string() },
                ],
            "numeric seed prices should load as price text",
        )
    }

    #[test]
    fn seed_prices_above_the_cap_are_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                menu_items: Some(vec![SeedItem {
                    name: "Gold Bar".to_string(),
                    price: "79228162514264337593543950335".to_string(),
                }]),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        ensure(
            matches!(
                result,
                Err(ConfigError::Validation(ref message)) if message.contains("exceeds the maximum")
            ),
            "oversized seed price should fail validation",
        )
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SUNRISE_LOG_LEVEL", "debug");
        env::set_var("SUNRISE_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.logging.level == "debug",
                "debug log level should be set from env var",
            )?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )
        })();

        clear_vars(&["SUNRISE_LOG_LEVEL", "SUNRISE_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("SUNRISE_SHOP_NAME", "From Env");
        env::set_var("SUNRISE_LOGGING_LEVEL", "error");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("sunrise.toml");
            fs::write(
                &path,
                r#"
[shop]
name = "From File"

[logging]
level = "warn"
format = "json"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.shop.name == "From Env", "env shop name should win over file")?;
            ensure(config.logging.level == "debug", "override log level should win over env")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "file log format should win over default",
            )
        })();

        clear_vars(&["SUNRISE_SHOP_NAME", "SUNRISE_LOGGING_LEVEL"]);
        result
    }

    #[test]
    fn invalid_seed_price_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                menu_items: Some(vec![SeedItem {
                    name: "Latte".to_string(),
                    price: "four fifty".to_string(),
                }]),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }) {
            Ok(_) => return Err("expected validation failure but config load succeeded".into()),
            Err(error) => error,
        };

        let has_message = matches!(
            error,
            ConfigError::Validation(ref message)
                if message.contains("menu.items[0].price") && message.contains("Latte")
        );
        ensure(has_message, "validation failure should point at the seed item")
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let missing = dir.path().join("absent.toml");
        let result = AppConfig::load(LoadOptions {
            config_path: Some(missing),
            require_file: true,
            ..LoadOptions::default()
        });

        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(_))),
            "missing required file should be reported",
        )
    }

    #[test]
    fn unterminated_interpolation_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("sunrise.toml");
        fs::write(&path, "[shop]\nname = \"${UNCLOSED\"\n").map_err(|err| err.to_string())?;

        let result =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() });

        ensure(
            matches!(result, Err(ConfigError::UnterminatedInterpolation)),
            "unterminated interpolation should be reported",
        )
    }
}
