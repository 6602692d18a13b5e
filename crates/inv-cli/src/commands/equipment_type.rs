use crate::cli::GlobalFlags;
use crate::cli::subcommands::EquipmentTypeCommands;
use crate::commands::shared::ack::Ack;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv equipment-type`.
pub async fn handle(
    action: &EquipmentTypeCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        EquipmentTypeCommands::Create { name } => {
            let actor = ctx.actor().await?;
            output(
                &ctx.service.create_equipment_type(&actor, name).await?,
                flags.format,
            )
        }
        EquipmentTypeCommands::Get { id } => {
            output(&ctx.service.get_equipment_type(id).await?, flags.format)
        }
        EquipmentTypeCommands::List => {
            output(&ctx.service.list_equipment_types().await?, flags.format)
        }
        EquipmentTypeCommands::Delete { id } => {
            let actor = ctx.actor().await?;
            ctx.service.delete_equipment_type(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
    }
}
