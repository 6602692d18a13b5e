use std::path::{Path, PathBuf};

use anyhow::Context;
use inv_config::{InventoryConfig, PROJECT_DIR};
use inv_core::entities::User;
use inv_core::enums::UserRole;
use inv_db::repos::user::NewUser;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::open_service;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitReport {
    project_root: PathBuf,
    config_created: bool,
    database: String,
    trail_dir: Option<String>,
    admin: Option<User>,
}

/// Handle `cinv init`.
pub async fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = match &flags.project {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let state_dir = root.join(PROJECT_DIR);
    std::fs::create_dir_all(&state_dir)
        .with_context(|| format!("failed to create {}", state_dir.display()))?;

    let root = root
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", root.display()))?;

    let config_created = write_default_config(&state_dir, args.admin.as_deref())?;
    let config = bootstrap::load_config(&root)?;
    let service = open_service(&root, &config).await?;

    let admin = match &args.admin {
        Some(username) => Some(
            service
                .bootstrap_admin(NewUser {
                    username: username.clone(),
                    first_name: args.first_name.clone().unwrap_or_default(),
                    last_name: args.last_name.clone().unwrap_or_default(),
                    role: UserRole::Admin,
                    ..NewUser::default()
                })
                .await?,
        ),
        None => None,
    };

    tracing::info!(root = %root.display(), "inventory project initialized");
    output(
        &InitReport {
            project_root: root,
            config_created,
            database: config.database.path,
            trail_dir: config.trail.enabled.then_some(config.trail.dir),
            admin,
        },
        flags.format,
    )
}

/// Write `config.toml` with defaults unless one exists. Returns whether a
/// file was written.
fn write_default_config(state_dir: &Path, admin: Option<&str>) -> anyhow::Result<bool> {
    let path = state_dir.join("config.toml");
    if path.exists() {
        return Ok(false);
    }
    let mut config = InventoryConfig::default();
    config.general.user = admin.map(String::from);
    let rendered = toml::to_string_pretty(&config).context("failed to render default config")?;
    std::fs::write(&path, rendered)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::write_default_config;

    #[test]
    fn default_config_names_the_admin_and_is_not_overwritten() {
        let temp = TempDir::new().expect("tempdir should create");
        assert!(write_default_config(temp.path(), Some("rector")).expect("first write"));

        let written = std::fs::read_to_string(temp.path().join("config.toml")).expect("read");
        let parsed: inv_config::InventoryConfig = toml::from_str(&written).expect("valid toml");
        assert_eq!(parsed.general.user.as_deref(), Some("rector"));
        assert_eq!(parsed.database.path, ".inventory/inventory.db");

        assert!(!write_default_config(temp.path(), None).expect("second write"));
    }
}
