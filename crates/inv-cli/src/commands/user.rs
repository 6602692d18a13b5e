use inv_core::enums::UserRole;
use inv_db::repos::user::NewUser;
use inv_db::updates::user::UserUpdateBuilder;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::commands::shared::ack::Ack;
use crate::commands::shared::parse::{parse_enum, parse_opt_enum};
use crate::context::AppContext;
use crate::output::output;

/// Handle `cinv user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if let UserCommands::Bootstrap {
        username,
        first_name,
        last_name,
        email,
    } = action
    {
        let admin = ctx
            .service
            .bootstrap_admin(NewUser {
                username: username.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
                role: UserRole::Admin,
                ..NewUser::default()
            })
            .await?;
        return output(&admin, flags.format);
    }

    let actor = ctx.actor().await?;
    match action {
        UserCommands::Bootstrap { .. } => unreachable!("bootstrap runs without an acting user"),
        UserCommands::Create {
            username,
            first_name,
            last_name,
            role,
            phone,
            email,
        } => {
            let new = NewUser {
                username: username.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                phone: phone.clone(),
                email: email.clone(),
                role: parse_opt_enum::<UserRole>(role.as_deref(), "role")?.unwrap_or_default(),
            };
            output(&ctx.service.create_user(&actor, new).await?, flags.format)
        }
        UserCommands::Get { id } => output(&ctx.service.get_user(&actor, id).await?, flags.format),
        UserCommands::Whoami => output(
            &ctx.service.get_user(&actor, &actor.user_id).await?,
            flags.format,
        ),
        UserCommands::List => output(&ctx.service.list_users(&actor).await?, flags.format),
        UserCommands::Update {
            id,
            first_name,
            last_name,
            phone,
            email,
            role,
        } => {
            let mut builder = UserUpdateBuilder::new();
            let mut changed = false;
            if let Some(value) = first_name {
                builder = builder.first_name(value);
                changed = true;
            }
            if let Some(value) = last_name {
                builder = builder.last_name(value);
                changed = true;
            }
            if let Some(value) = phone {
                builder = builder.phone(Some(value.clone()));
                changed = true;
            }
            if let Some(value) = email {
                builder = builder.email(Some(value.clone()));
                changed = true;
            }
            if let Some(value) = role {
                builder = builder.role(parse_enum::<UserRole>(value, "role")?);
                changed = true;
            }
            if !changed {
                anyhow::bail!("Nothing to update: pass at least one field flag");
            }
            output(
                &ctx.service.update_user(&actor, id, builder.build()).await?,
                flags.format,
            )
        }
        UserCommands::Delete { id } => {
            ctx.service.delete_user(&actor, id).await?;
            output(&Ack::deleted(id), flags.format)
        }
        UserCommands::ToggleActive { id } => output(
            &ctx.service.toggle_user_active(&actor, id).await?,
            flags.format,
        ),
    }
}
