use inv_core::enums::{ActionType, EntityType};
use inv_db::repos::action::ActionFilter;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ActionsCommands;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv actions`.
pub async fn handle(
    action: &ActionsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor().await?;
    match action {
        ActionsCommands::List {
            user_id,
            action_type,
            entity_type,
            entity_id,
        } => {
            let filter = ActionFilter {
                user_id: user_id.clone(),
                action_type: parse_opt_enum::<ActionType>(action_type.as_deref(), "action type")?,
                entity_type: parse_opt_enum::<EntityType>(entity_type.as_deref(), "entity type")?,
                entity_id: entity_id.clone(),
                limit: flags.limit,
            };
            output(&ctx.service.query_actions(&actor, &filter).await?, flags.format)
        }
        ActionsCommands::Mine => output(&ctx.service.my_actions(&actor).await?, flags.format),
    }
}
