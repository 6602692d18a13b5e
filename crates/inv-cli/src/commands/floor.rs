use crate::cli::GlobalFlags;
use crate::cli::subcommands::FloorCommands;
use crate::commands::shared::ack::Ack;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv floor`.
pub async fn handle(
    action: &FloorCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        FloorCommands::Create {
            building,
            number,
            description,
        } => {
            let actor = ctx.actor().await?;
            let floor = ctx
                .service
                .create_floor(&actor, building, *number, description.as_deref())
                .await?;
            output(&floor, flags.format)
        }
        FloorCommands::Get { id } => output(&ctx.service.get_floor(id).await?, flags.format),
        FloorCommands::List { building } => {
            output(&ctx.service.list_floors(building).await?, flags.format)
        }
        FloorCommands::Delete { id } => {
            let actor = ctx.actor().await?;
            ctx.service.delete_floor(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
    }
}
