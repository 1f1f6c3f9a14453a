use std::env;
use std::fs;
use std::path::Path;

use sunrise_core::config::{resolve_config_path, AppConfig};
use toml::Value;

pub fn run(config: &AppConfig, explicit_path: Option<&Path>) -> String {
    let config_file_path = resolve_config_path(explicit_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let doc = config_file_doc.as_ref();
    let path = config_file_path.as_deref();

    let mut lines =
        vec!["effective config (source precedence: override > env > file > default):".to_string()];

    lines.push(render_line(
        "shop.name",
        &config.shop.name,
        field_source("shop.name", &["SUNRISE_SHOP_NAME"], doc, path),
    ));
    lines.push(render_line(
        "menu.items",
        &format!("{} seed item(s)", config.menu.items.len()),
        field_source("menu.items", &[], doc, path),
    ));
    for item in &config.menu.items {
        lines.push(format!("    {} = {}", item.name.trim(), item.price.trim()));
    }
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        field_source(
            "logging.level",
            &["SUNRISE_LOGGING_LEVEL", "SUNRISE_LOG_LEVEL"],
            doc,
            path,
        ),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        field_source(
            "logging.format",
            &["SUNRISE_LOGGING_FORMAT", "SUNRISE_LOG_FORMAT"],
            doc,
            path,
        ),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
