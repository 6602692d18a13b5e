use inv_core::enums::EquipmentStatus;
use inv_db::repos::equipment::NewEquipment;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EquipmentCreateArgs;
use crate::commands::shared::input::parse_opt_characteristics;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    args: &EquipmentCreateArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut new = NewEquipment::new(&args.type_id, &args.name);
    new.room_id.clone_from(&args.room);
    new.description.clone_from(&args.description);
    new.contract_id.clone_from(&args.contract);
    new.spec_id.clone_from(&args.spec);
    new.inn = args.inn.unwrap_or(0);
    new.is_active = !args.inactive;
    new.characteristics = parse_opt_characteristics(args.characteristics.as_deref())?;
    if let Some(status) = parse_opt_enum::<EquipmentStatus>(args.status.as_deref(), "status")? {
        new.status = status;
    }

    let actor = ctx.actor().await?;
    let equipment = ctx.service.create_equipment(&actor, new).await?;
    output(&equipment, flags.format)
}

pub async fn run_from_link(
    url: &str,
    name: &str,
    type_id: &str,
    inn: Option<i64>,
    description: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut new = NewEquipment::new(type_id, name);
    new.inn = inn.unwrap_or(0);
    new.description = description.map(String::from);

    let actor = ctx.actor().await?;
    let equipment = ctx
        .service
        .create_equipment_from_link(&actor, url, new)
        .await?;
    output(&equipment, flags.format)
}
