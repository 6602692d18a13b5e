use inv_core::enums::QrObjectType;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ScanArgs;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv scan`.
pub async fn handle(args: &ScanArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let object_type = parse_enum::<QrObjectType>(&args.object_type, "object type")?;
    let actor = ctx.actor().await?;
    let result = ctx.service.scan_qr(&actor, object_type, &args.data).await?;
    output(&result, flags.format)
}
