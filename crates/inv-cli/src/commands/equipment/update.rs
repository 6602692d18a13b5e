use inv_core::enums::EquipmentStatus;
use inv_db::updates::equipment::EquipmentUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EquipmentUpdateArgs;
use crate::commands::shared::input::parse_characteristics;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    args: &EquipmentUpdateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut builder = EquipmentUpdateBuilder::new();
    let mut changed = false;

    if let Some(name) = &args.name {
        builder = builder.name(name);
        changed = true;
    }
    if let Some(description) = &args.description {
        builder = builder.description(Some(description.clone()));
        changed = true;
    }
    if let Some(room) = &args.room {
        builder = builder.room_id(Some(room.clone()));
        changed = true;
    }
    if let Some(inn) = args.inn {
        builder = builder.inn(inn);
        changed = true;
    }
    if let Some(contract) = &args.contract {
        builder = builder.contract_id(Some(contract.clone()));
        changed = true;
    }
    if let Some(active) = args.active {
        builder = builder.is_active(active);
        changed = true;
    }
    if let Some(raw) = &args.characteristics {
        builder = builder.characteristics(parse_characteristics(raw)?);
        changed = true;
    }
    if let Some(status) = &args.status {
        builder = builder.status(parse_enum::<EquipmentStatus>(status, "status")?);
        changed = true;
    }
    if !changed {
        anyhow::bail!("Nothing to update: pass at least one field flag");
    }

    let actor = ctx.actor().await?;
    let equipment = ctx
        .service
        .update_equipment(&actor, &args.id, builder.build())
        .await?;
    output(&equipment, flags.format)
}
