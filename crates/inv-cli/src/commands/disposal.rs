use crate::cli::GlobalFlags;
use crate::cli::subcommands::DisposalCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv disposal`.
pub async fn handle(
    action: &DisposalCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor().await?;
    match action {
        DisposalCommands::Create {
            equipment_id,
            reason,
            notes,
        } => {
            let disposal = ctx
                .service
                .dispose_equipment(&actor, equipment_id, reason, notes.as_deref())
                .await?;
            output(&disposal, flags.format)
        }
        DisposalCommands::Update {
            id,
            reason,
            notes,
            clear_notes,
        } => {
            let notes = if *clear_notes {
                Some(None)
            } else {
                notes.as_deref().map(Some)
            };
            if reason.is_none() && notes.is_none() {
                anyhow::bail!("At least one of --reason, --notes, or --clear-notes must be provided");
            }
            let disposal = ctx
                .service
                .update_disposal(&actor, id, reason.as_deref(), notes)
                .await?;
            output(&disposal, flags.format)
        }
        DisposalCommands::Get { id } => {
            output(&ctx.service.get_disposal(&actor, id).await?, flags.format)
        }
        DisposalCommands::Of { equipment_id } => {
            ctx.service.get_equipment(&actor, equipment_id).await?;
            output(
                &ctx.service.disposal_for_equipment(equipment_id).await?,
                flags.format,
            )
        }
        DisposalCommands::List => output(&ctx.service.list_disposals(&actor).await?, flags.format),
    }
}
