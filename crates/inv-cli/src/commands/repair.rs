use inv_core::enums::RepairStatus;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RepairCommands;
use crate::commands::shared::parse::{parse_enum, parse_opt_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv repair`.
pub async fn handle(
    action: &RepairCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor().await?;
    match action {
        RepairCommands::Start {
            equipment_id,
            notes,
        } => {
            let repair = ctx
                .service
                .send_to_repair(&actor, equipment_id, notes.as_deref())
                .await?;
            output(&repair, flags.format)
        }
        RepairCommands::Update { id, status, notes } => {
            let status = parse_enum::<RepairStatus>(status, "status")?;
            let repair = ctx
                .service
                .update_repair_status(&actor, id, status, notes.as_deref())
                .await?;
            output(&repair, flags.format)
        }
        RepairCommands::Get { id } => output(&ctx.service.get_repair(&actor, id).await?, flags.format),
        RepairCommands::Of { equipment_id } => {
            // Visibility check before exposing the record.
            ctx.service.get_equipment(&actor, equipment_id).await?;
            output(
                &ctx.service.repair_for_equipment(equipment_id).await?,
                flags.format,
            )
        }
        RepairCommands::List { status } => {
            let status = parse_opt_enum::<RepairStatus>(status.as_deref(), "status")?;
            output(&ctx.service.list_repairs(&actor, status).await?, flags.format)
        }
    }
}
