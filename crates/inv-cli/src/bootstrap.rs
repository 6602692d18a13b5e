use std::path::Path;

use anyhow::Context;
use inv_config::InventoryConfig;

/// Load `.env` and layered configuration for the project at `root`.
///
/// The working directory is switched to `root` first so that the
/// project-level `.inventory/config.toml` and relative paths resolve there.
pub fn load_config(root: &Path) -> anyhow::Result<InventoryConfig> {
    std::env::set_current_dir(root)
        .with_context(|| format!("failed to enter project root {}", root.display()))?;

    let env_path = root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }

    InventoryConfig::load().context("failed to load inventory configuration")
}
