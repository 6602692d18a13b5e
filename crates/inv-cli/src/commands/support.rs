use crate::cli::GlobalFlags;
use crate::cli::subcommands::SupportCommands;
use crate::commands::shared::ack::{Ack, Affected};
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv support`.
pub async fn handle(
    action: &SupportCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor().await?;
    match action {
        SupportCommands::Send { subject, message } => output(
            &ctx.service
                .send_support_message(&actor, subject, message)
                .await?,
            flags.format,
        ),
        SupportCommands::List { new: true } => output(
            &ctx.service.list_new_support_messages(&actor).await?,
            flags.format,
        ),
        SupportCommands::List { new: false } => output(
            &ctx.service.list_support_messages(&actor).await?,
            flags.format,
        ),
        SupportCommands::MarkNotified { ids } => {
            let count = ctx.service.mark_support_notified(&actor, ids).await?;
            output(
                &Affected {
                    action: "notified",
                    count,
                },
                flags.format,
            )
        }
        SupportCommands::Resolve { id } => output(
            &ctx.service.resolve_support_message(&actor, id).await?,
            flags.format,
        ),
        SupportCommands::Delete { id } => {
            ctx.service.delete_support_message(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
    }
}
