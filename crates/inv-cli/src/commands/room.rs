use inv_db::repos::room::{NewRoom, RoomFilter};
use inv_db::updates::room::RoomUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RoomCommands;
use crate::commands::shared::ack::Ack;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv room`.
pub async fn handle(
    action: &RoomCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        RoomCommands::Create {
            number,
            building,
            floor,
            name,
            special,
        } => {
            let actor = ctx.actor().await?;
            let room = ctx
                .service
                .create_room(
                    &actor,
                    NewRoom {
                        building_id: building.clone(),
                        floor_id: floor.clone(),
                        number: number.clone(),
                        name: name.clone(),
                        is_special: *special,
                    },
                )
                .await?;
            output(&room, flags.format)
        }
        RoomCommands::Get { id } => output(&ctx.service.get_room(id).await?, flags.format),
        RoomCommands::List { building, floor } => {
            let filter = RoomFilter {
                building_id: building.clone(),
                floor_id: floor.clone(),
            };
            output(&ctx.service.list_rooms(&filter).await?, flags.format)
        }
        RoomCommands::Update { id, name, special } => {
            if name.is_none() && special.is_none() {
                anyhow::bail!("At least one of --name or --special must be provided");
            }
            let mut builder = RoomUpdateBuilder::new();
            if let Some(name) = name {
                builder = builder.name(Some(name.clone()));
            }
            if let Some(special) = special {
                builder = builder.is_special(*special);
            }
            let actor = ctx.actor().await?;
            output(
                &ctx.service.update_room(&actor, id, builder.build()).await?,
                flags.format,
            )
        }
        RoomCommands::Delete { id } => {
            let actor = ctx.actor().await?;
            ctx.service.delete_room(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
        RoomCommands::Split { id, numbers } => {
            let actor = ctx.actor().await?;
            output(&ctx.service.split_room(&actor, id, numbers).await?, flags.format)
        }
        RoomCommands::Merge {
            ids,
            number,
            building,
            floor,
        } => {
            let actor = ctx.actor().await?;
            let merged = ctx
                .service
                .merge_rooms(&actor, ids, number, floor, building)
                .await?;
            output(&merged, flags.format)
        }
        RoomCommands::Move {
            id,
            building,
            floor,
        } => {
            let actor = ctx.actor().await?;
            let moved = ctx.service.move_room(&actor, id, floor, building).await?;
            output(&moved, flags.format)
        }
        RoomCommands::History { id } => output(&ctx.service.room_history(id).await?, flags.format),
        RoomCommands::Link { url } => {
            output(&ctx.service.resolve_room_link(url).await?, flags.format)
        }
        RoomCommands::Equipment { id } => {
            let actor = ctx.actor().await?;
            output(&ctx.service.equipment_by_room(&actor, id).await?, flags.format)
        }
    }
}
