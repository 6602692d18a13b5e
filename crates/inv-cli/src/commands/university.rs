use inv_db::updates::organization::UniversityUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UniversityCommands;
use crate::commands::shared::ack::Ack;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv university`.
pub async fn handle(
    action: &UniversityCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UniversityCommands::Create { name, address } => {
            let actor = ctx.actor().await?;
            let university = ctx
                .service
                .create_university(&actor, name, address.as_deref())
                .await?;
            output(&university, flags.format)
        }
        UniversityCommands::Get { id } => {
            output(&ctx.service.get_university(id).await?, flags.format)
        }
        UniversityCommands::List => output(&ctx.service.list_universities().await?, flags.format),
        UniversityCommands::Update { id, name, address } => {
            if name.is_none() && address.is_none() {
                anyhow::bail!("At least one of --name or --address must be provided");
            }
            let mut builder = UniversityUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(name);
            }
            if let Some(address) = address {
                builder = builder.address(Some(address.clone()));
            }
            let actor = ctx.actor().await?;
            let university = ctx
                .service
                .update_university(&actor, id, builder.build())
                .await?;
            output(&university, flags.format)
        }
        UniversityCommands::Delete { id } => {
            let actor = ctx.actor().await?;
            ctx.service.delete_university(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
    }
}
