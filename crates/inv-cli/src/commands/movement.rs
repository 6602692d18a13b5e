use crate::cli::GlobalFlags;
use crate::cli::root_commands::MoveArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv move`.
pub async fn handle(args: &MoveArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor().await?;
    let movements = ctx
        .service
        .move_equipment(&actor, &args.ids, &args.from, &args.to, args.note.as_deref())
        .await?;
    tracing::info!(count = movements.len(), to = %args.to, "equipment moved");
    output(&movements, flags.format)
}
