use crate::cli::GlobalFlags;
use crate::cli::subcommands::FacultyCommands;
use crate::commands::shared::ack::Ack;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv faculty`.
pub async fn handle(
    action: &FacultyCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        FacultyCommands::Create {
            name,
            building,
            floor,
        } => {
            let actor = ctx.actor().await?;
            let faculty = ctx
                .service
                .create_faculty(&actor, building, floor.as_deref(), name)
                .await?;
            output(&faculty, flags.format)
        }
        FacultyCommands::Get { id } => output(&ctx.service.get_faculty(id).await?, flags.format),
        FacultyCommands::List { building } => {
            output(&ctx.service.list_faculties(building).await?, flags.format)
        }
        FacultyCommands::Delete { id } => {
            let actor = ctx.actor().await?;
            ctx.service.delete_faculty(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
        FacultyCommands::Split { id, names } => {
            let actor = ctx.actor().await?;
            output(&ctx.service.split_faculty(&actor, id, names).await?, flags.format)
        }
        FacultyCommands::Merge {
            ids,
            name,
            building,
            floor,
        } => {
            let actor = ctx.actor().await?;
            let merged = ctx
                .service
                .merge_faculties(&actor, ids, name, building, floor.as_deref())
                .await?;
            output(&merged, flags.format)
        }
        FacultyCommands::Move {
            id,
            building,
            floor,
        } => {
            let actor = ctx.actor().await?;
            let moved = ctx
                .service
                .move_faculty(&actor, id, building, floor.as_deref())
                .await?;
            output(&moved, flags.format)
        }
        FacultyCommands::History { id } => {
            output(&ctx.service.faculty_history(id).await?, flags.format)
        }
    }
}
