use clap::Subcommand;

/// Audit log commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ActionsCommands {
    /// Query the audit log (admins see every user).
    List {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        action_type: Option<String>,
        #[arg(long)]
        entity_type: Option<String>,
        #[arg(long)]
        entity_id: Option<String>,
    },
    /// Actions of the acting user.
    Mine,
}
