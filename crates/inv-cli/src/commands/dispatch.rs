use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::University { action } => commands::university::handle(&action, ctx, flags).await,
        Commands::Building { action } => commands::building::handle(&action, ctx, flags).await,
        Commands::Floor { action } => commands::floor::handle(&action, ctx, flags).await,
        Commands::Faculty { action } => commands::faculty::handle(&action, ctx, flags).await,
        Commands::Room { action } => commands::room::handle(&action, ctx, flags).await,
        Commands::EquipmentType { action } => {
            commands::equipment_type::handle(&action, ctx, flags).await
        }
        Commands::Contract { action } => commands::contract::handle(&action, ctx, flags).await,
        Commands::Equipment { action } => commands::equipment::handle(&action, ctx, flags).await,
        Commands::Spec { action } => commands::spec::handle(&action, ctx, flags).await,
        Commands::Repair { action } => commands::repair::handle(&action, ctx, flags).await,
        Commands::Disposal { action } => commands::disposal::handle(&action, ctx, flags).await,
        Commands::Move(args) => commands::movement::handle(&args, ctx, flags).await,
        Commands::Bulk { action } => commands::bulk::handle(&action, ctx, flags).await,
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Support { action } => commands::support::handle(&action, ctx, flags).await,
        Commands::Actions { action } => commands::actions::handle(&action, ctx, flags).await,
        Commands::Scan(args) => commands::scan::handle(&args, ctx, flags).await,
        Commands::Stats => commands::stats::handle(ctx, flags).await,
        Commands::Init(_) => unreachable!("init is pre-dispatched in main"),
    }
}
