use figment::Jail;
use inv_config::InventoryConfig;

#[test]
fn env_vars_override_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("INVENTORY_DATABASE__PATH", ":memory:");
        jail.set_env("INVENTORY_GENERAL__USER", "ivanova");
        jail.set_env("INVENTORY_TRAIL__ENABLED", "false");

        let config = InventoryConfig::load().expect("config loads");
        assert!(config.database.is_memory());
        assert_eq!(config.general.user.as_deref(), Some("ivanova"));
        assert!(!config.trail.enabled);
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_reported() {
    Jail::expect_with(|jail| {
        jail.set_env("INVENTORY_GENERAL__PAGE_SIZE", "0");
        assert!(InventoryConfig::load().is_err());
        Ok(())
    });
}
