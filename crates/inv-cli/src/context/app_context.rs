use std::path::Path;

use anyhow::Context;
use inv_config::InventoryConfig;
use inv_core::identity::Actor;
use inv_db::retry::RetryConfig;
use inv_db::service::InventoryService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: InventoryService,
    pub config: InventoryConfig,
    username: Option<String>,
}

impl AppContext {
    /// Open the project database and trail directory named by `config`.
    ///
    /// Relative paths in the config are resolved against `project_root`.
    pub async fn init(
        project_root: &Path,
        config: InventoryConfig,
        user_override: Option<&str>,
    ) -> anyhow::Result<Self> {
        let service = open_service(project_root, &config).await?;
        let username = user_override
            .map(String::from)
            .or_else(|| config.general.user.clone())
            .filter(|name| !name.trim().is_empty());

        Ok(Self {
            service,
            config,
            username,
        })
    }

    /// Resolve the acting user from `--user` or `general.user`.
    pub async fn actor(&self) -> anyhow::Result<Actor> {
        let username = self.username.as_deref().context(
            "no acting user: pass --user or set general.user (INVENTORY_GENERAL__USER)",
        )?;
        self.service
            .resolve_actor(username)
            .await
            .with_context(|| format!("cannot act as '{username}'"))
    }
}

/// Open the service for a project, creating the trail directory if enabled.
pub async fn open_service(
    project_root: &Path,
    config: &InventoryConfig,
) -> anyhow::Result<InventoryService> {
    let db_path = if config.database.is_memory() {
        config.database.path.clone()
    } else {
        project_root
            .join(&config.database.path)
            .to_string_lossy()
            .into_owned()
    };
    let trail_dir = config
        .trail
        .enabled
        .then(|| project_root.join(&config.trail.dir));
    let retry = RetryConfig::from_settings(
        config.database.busy_retries,
        config.database.busy_backoff_ms,
    );

    tracing::debug!(db = %db_path, trail = ?trail_dir, "opening inventory service");
    InventoryService::new_local(&db_path, trail_dir, retry)
        .await
        .context("failed to initialize inventory service")
}
