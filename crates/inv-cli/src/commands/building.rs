use inv_db::updates::organization::BuildingUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::BuildingCommands;
use crate::commands::shared::ack::Ack;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv building`.
pub async fn handle(
    action: &BuildingCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        BuildingCommands::Create {
            name,
            university,
            address,
        } => {
            let actor = ctx.actor().await?;
            let building = ctx
                .service
                .create_building(&actor, university, name, address.as_deref())
                .await?;
            output(&building, flags.format)
        }
        BuildingCommands::Get { id } => output(&ctx.service.get_building(id).await?, flags.format),
        BuildingCommands::List { university } => output(
            &ctx.service.list_buildings(university.as_deref()).await?,
            flags.format,
        ),
        BuildingCommands::Update { id, name, address } => {
            if name.is_none() && address.is_none() {
                anyhow::bail!("At least one of --name or --address must be provided");
            }
            let mut builder = BuildingUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(address) = address {
                builder = builder.address(Some(address.clone()));
            }
            let actor = ctx.actor().await?;
            let building = ctx
                .service
                .update_building(&actor, id, builder.build())
                .await?;
            output(&building, flags.format)
        }
        BuildingCommands::Delete { id } => {
            let actor = ctx.actor().await?;
            ctx.service.delete_building(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
    }
}
