use inv_core::enums::CharacteristicKind;
use inv_db::updates::specification::SpecificationUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SpecCommands;
use crate::commands::shared::ack::Ack;
use crate::commands::shared::input::parse_characteristics;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv spec`.
pub async fn handle(
    action: &SpecCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor().await?;
    match action {
        SpecCommands::Create {
            name,
            characteristics,
        } => {
            let characteristics = parse_characteristics(characteristics)?;
            let spec = ctx
                .service
                .create_specification(&actor, name, characteristics)
                .await?;
            output(&spec, flags.format)
        }
        SpecCommands::Get { id } => output(
            &ctx.service.get_specification(&actor, id).await?,
            flags.format,
        ),
        SpecCommands::List { kind } => {
            let kind = parse_opt_enum::<CharacteristicKind>(kind.as_deref(), "kind")?;
            output(
                &ctx.service.list_specifications(&actor, kind).await?,
                flags.format,
            )
        }
        SpecCommands::Update {
            id,
            name,
            characteristics,
        } => {
            if name.is_none() && characteristics.is_none() {
                anyhow::bail!("At least one of --name or --characteristics must be provided");
            }
            let mut builder = SpecificationUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(raw) = characteristics {
                builder = builder.characteristics(parse_characteristics(raw)?);
            }
            let spec = ctx
                .service
                .update_specification(&actor, id, builder.build())
                .await?;
            output(&spec, flags.format)
        }
        SpecCommands::Delete { id } => {
            ctx.service.delete_specification(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
        SpecCommands::Count => output(
            &ctx.service.specification_count(&actor).await?,
            flags.format,
        ),
    }
}
