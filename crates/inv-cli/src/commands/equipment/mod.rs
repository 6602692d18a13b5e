mod create;
mod labels;
mod list;
mod update;

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EquipmentCommands;
use crate::commands::shared::ack::Ack;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct Location<'a> {
    id: &'a str,
    location: String,
}

/// Handle `cinv equipment`.
pub async fn handle(
    action: &EquipmentCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        EquipmentCommands::Create(args) => create::run(args, ctx, flags).await,
        EquipmentCommands::FromLink {
            url,
            name,
            type_id,
            inn,
            description,
        } => {
            create::run_from_link(
                url,
                name,
                type_id,
                *inn,
                description.as_deref(),
                ctx,
                flags,
            )
            .await
        }
        EquipmentCommands::Get { id } => {
            let actor = ctx.actor().await?;
            output(&ctx.service.get_equipment(&actor, id).await?, flags.format)
        }
        EquipmentCommands::List(args) => list::run(args, ctx, flags).await,
        EquipmentCommands::Update(args) => update::run(args, ctx, flags).await,
        EquipmentCommands::Delete { id } => {
            let actor = ctx.actor().await?;
            ctx.service.delete_equipment(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
        EquipmentCommands::Mine => {
            let actor = ctx.actor().await?;
            output(&ctx.service.my_equipment(&actor).await?, flags.format)
        }
        EquipmentCommands::Location { id } => {
            let actor = ctx.actor().await?;
            let equipment = ctx.service.get_equipment(&actor, id).await?;
            let location = ctx.service.equipment_location(&equipment).await?;
            output(&Location { id, location }, flags.format)
        }
        EquipmentCommands::Movements { id } => {
            let actor = ctx.actor().await?;
            output(&ctx.service.movement_history(&actor, id).await?, flags.format)
        }
        EquipmentCommands::Labels { ids, out } => labels::run(ids, out, ctx, flags).await,
    }
}
