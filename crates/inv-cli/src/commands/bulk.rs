use inv_core::enums::EquipmentStatus;
use inv_db::repos::bulk::{BulkCreate, MAX_BULK_CREATE};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BulkCommands;
use crate::commands::shared::ack::Affected;
use crate::commands::shared::input::{parse_inn_assignments, parse_opt_characteristics};
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Handle `cinv bulk`.
pub async fn handle(
    action: &BulkCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor().await?;
    match action {
        BulkCommands::Create {
            type_id,
            prefix,
            count,
            room,
            description,
            status,
            contract,
            spec,
            characteristics,
        } => {
            if *count == 0 || *count > MAX_BULK_CREATE {
                anyhow::bail!("--count must be between 1 and {MAX_BULK_CREATE}");
            }
            let mut batch = BulkCreate::new(type_id, prefix, *count);
            batch.room_id.clone_from(room);
            batch.description.clone_from(description);
            batch.contract_id.clone_from(contract);
            batch.spec_id.clone_from(spec);
            batch.characteristics = parse_opt_characteristics(characteristics.as_deref())?;
            if let Some(status) = parse_opt_enum::<EquipmentStatus>(status.as_deref(), "status")? {
                batch.status = status;
            }

            let progress = Progress::spinner(&format!("Creating {count} items"));
            match ctx.service.bulk_create(&actor, batch).await {
                Ok(items) => {
                    progress.finish_ok(&format!("Created {} items", items.len()));
                    output(&items, flags.format)
                }
                Err(error) => {
                    progress.finish_err("Bulk create failed");
                    Err(error.into())
                }
            }
        }
        BulkCommands::Inn { assignments } => {
            let assignments = parse_inn_assignments(assignments)?;
            output(
                &ctx.service.bulk_update_inn(&actor, &assignments).await?,
                flags.format,
            )
        }
        BulkCommands::Delete { ids } => {
            let count = ctx.service.bulk_delete(&actor, ids).await?;
            output(
                &Affected {
                    action: "deleted",
                    count,
                },
                flags.format,
            )
        }
    }
}
