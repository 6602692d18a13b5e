use inv_db::updates::contract::ContractUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ContractCommands;
use crate::commands::shared::ack::Ack;
use crate::commands::shared::input::parse_date;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv contract`.
pub async fn handle(
    action: &ContractCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let actor = ctx.actor().await?;
    match action {
        ContractCommands::Create {
            number,
            file,
            valid_until,
        } => {
            let valid_until = valid_until
                .as_deref()
                .map(|raw| parse_date(raw, "valid_until"))
                .transpose()?;
            let contract = ctx
                .service
                .create_contract(&actor, number, file.as_deref(), valid_until)
                .await?;
            output(&contract, flags.format)
        }
        ContractCommands::Get { id } => {
            output(&ctx.service.get_contract(&actor, id).await?, flags.format)
        }
        ContractCommands::List { search } => output(
            &ctx.service.list_contracts(&actor, search.as_deref()).await?,
            flags.format,
        ),
        ContractCommands::Update {
            id,
            number,
            file,
            valid_until,
        } => {
            if number.is_none() && file.is_none() && valid_until.is_none() {
                anyhow::bail!("At least one of --number, --file, or --valid-until must be provided");
            }
            let mut builder = ContractUpdateBuilder::new();
            if let Some(number) = number {
                builder = builder.number(number);
            }
            if let Some(file) = file {
                builder = builder.file(Some(file.clone()));
            }
            if let Some(raw) = valid_until {
                builder = builder.valid_until(Some(parse_date(raw, "valid_until")?));
            }
            let contract = ctx
                .service
                .update_contract(&actor, id, builder.build())
                .await?;
            output(&contract, flags.format)
        }
        ContractCommands::Delete { id } => {
            ctx.service.delete_contract(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
    }
}
