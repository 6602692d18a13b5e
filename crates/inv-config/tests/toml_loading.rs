//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use inv_config::InventoryConfig;
use pretty_assertions::assert_eq;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/inventory/main.db"
busy_retries = 6
busy_backoff_ms = 20

[trail]
enabled = false
dir = "/var/log/inventory"

[general]
user = "petrov"
page_size = 25
default_format = "table"
"#,
        )?;

        let config: InventoryConfig =
            Figment::from(Serialized::defaults(InventoryConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract()?;

        assert_eq!(config.database.path, "/var/lib/inventory/main.db");
        assert_eq!(config.database.busy_retries, 6);
        assert_eq!(config.database.busy_backoff_ms, 20);
        assert!(!config.trail.enabled);
        assert_eq!(config.trail.dir, "/var/log/inventory");
        assert_eq!(config.general.user.as_deref(), Some("petrov"));
        assert_eq!(config.general.page_size, 25);
        assert_eq!(config.general.default_format, "table");
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
page_size = 50
"#,
        )?;

        let config: InventoryConfig =
            Figment::from(Serialized::defaults(InventoryConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract()?;

        assert_eq!(config.general.page_size, 50);
        assert_eq!(config.database.path, ".inventory/inventory.db");
        assert!(config.trail.enabled);
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "from-toml.db"
"#,
        )?;
        jail.set_env("INVENTORY_DATABASE__PATH", "from-env.db");

        let config: InventoryConfig =
            Figment::from(Serialized::defaults(InventoryConfig::default()))
                .merge(Toml::file("config.toml"))
                .merge(Env::prefixed("INVENTORY_").split("__"))
                .extract()?;

        assert_eq!(config.database.path, "from-env.db");
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".inventory")?;
        jail.create_file(
            ".inventory/config.toml",
            r#"
[general]
user = "sidorov"
"#,
        )?;

        let config = InventoryConfig::load().expect("config loads");
        assert_eq!(config.general.user.as_deref(), Some("sidorov"));
        Ok(())
    });
}
