use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use storefront_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

struct Field {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct EffectiveValue {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let values = fields(&config)
        .into_iter()
        .map(|field| EffectiveValue {
            key: field.key,
            source: field_source(
                field.key,
                field.env_keys,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
            value: field.value,
        })
        .collect::<Vec<_>>();

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(values.iter().map(render_line));

    CommandResult::success_with_data("config", lines.join("\n"), &values)
}

fn fields(config: &AppConfig) -> Vec<Field> {
    vec![
        Field {
            key: "database.url",
            value: config.database.url.clone(),
            env_keys: &["STOREFRONT_DATABASE_URL"],
        },
        Field {
            key: "database.max_connections",
            value: config.database.max_connections.to_string(),
            env_keys: &["STOREFRONT_DATABASE_MAX_CONNECTIONS"],
        },
        Field {
            key: "database.timeout_secs",
            value: config.database.timeout_secs.to_string(),
            env_keys: &["STOREFRONT_DATABASE_TIMEOUT_SECS"],
        },
        Field {
            key: "server.bind_address",
            value: config.server.bind_address.clone(),
            env_keys: &["STOREFRONT_SERVER_BIND_ADDRESS"],
        },
        Field {
            key: "server.port",
            value: config.server.port.to_string(),
            env_keys: &["STOREFRONT_SERVER_PORT"],
        },
        Field {
            key: "server.graceful_shutdown_secs",
            value: config.server.graceful_shutdown_secs.to_string(),
            env_keys: &["STOREFRONT_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        },
        Field {
            key: "pagination.default_page_size",
            value: config.pagination.default_page_size.to_string(),
            env_keys: &["STOREFRONT_PAGINATION_DEFAULT_PAGE_SIZE"],
        },
        Field {
            key: "pagination.max_page_size",
            value: config.pagination.max_page_size.to_string(),
            env_keys: &["STOREFRONT_PAGINATION_MAX_PAGE_SIZE"],
        },
        Field {
            key: "catalog.seed_demo_data",
            value: config.catalog.seed_demo_data.to_string(),
            env_keys: &["STOREFRONT_CATALOG_SEED_DEMO_DATA"],
        },
        Field {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["STOREFRONT_LOGGING_LEVEL", "STOREFRONT_LOG_LEVEL"],
        },
        Field {
            key: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["STOREFRONT_LOGGING_FORMAT", "STOREFRONT_LOG_FORMAT"],
        },
    ]
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
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
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

fn render_line(value: &EffectiveValue) -> String {
    format!("- {} = {} (source: {})", value.key, value.value, value.source)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc = "[pagination]\nmax_page_size = 50\n".parse::<Value>().expect("toml");

        assert!(contains_path(&doc, "pagination.max_page_size"));
        assert!(!contains_path(&doc, "pagination.default_page_size"));
        assert!(!contains_path(&doc, "server.port"));
    }

    #[test]
    fn file_source_names_the_config_path() {
        let doc = "[server]\nport = 9090\n".parse::<Value>().expect("toml");

        let source = field_source(
            "server.port",
            &["STOREFRONT_CONFIG_TEST_UNSET_VAR"],
            Some(&doc),
            Some(Path::new("config/storefront.toml")),
        );

        assert_eq!(source, "file (config/storefront.toml)");
    }

    #[test]
    fn unset_fields_report_default_source() {
        let source = field_source("catalog.seed_demo_data", &[], None, None);
        assert_eq!(source, "default");
    }
}
