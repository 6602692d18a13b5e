use anyhow::Context;
use chrono::{DateTime, Utc};
use inv_core::enums::EquipmentStatus;
use inv_db::repos::equipment::{CharacteristicFilter, EquipmentFilter};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{CharacteristicArgs, EquipmentListArgs};
use crate::commands::shared::input::parse_date;
use crate::commands::shared::limit::page_request;
use crate::commands::shared::parse::parse_opt_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    args: &EquipmentListArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filter = build_filter(args)?;
    let page = page_request(flags, ctx.config.general.page_size);

    let actor = ctx.actor().await?;
    let items = ctx.service.list_equipment(&actor, &filter, page).await?;
    output(&items, flags.format)
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty()).cloned()
}

/// Day bounds are whole UTC days: `from` starts at midnight, `to` ends at
/// the last instant of the day.
fn day_bound(raw: Option<&str>, field: &str, end_of_day: bool) -> anyhow::Result<Option<DateTime<Utc>>> {
    raw.map(|raw| {
        let day = parse_date(raw, field)?;
        let at = if end_of_day {
            day.and_hms_nano_opt(23, 59, 59, 999_999_999)
        } else {
            day.and_hms_opt(0, 0, 0)
        };
        at.map(|t| t.and_utc())
            .with_context(|| format!("invalid {field} '{raw}'"))
    })
    .transpose()
}

fn characteristic_filter(args: &CharacteristicArgs) -> CharacteristicFilter {
    CharacteristicFilter {
        cpu: non_blank(args.cpu.as_ref()),
        ram: non_blank(args.ram.as_ref()),
        has_keyboard: args.has_keyboard,
        has_mouse: args.has_mouse,
        monitor_size: non_blank(args.monitor_size.as_ref()),
        printer_model: non_blank(args.printer_model.as_ref()),
        printer_color: args.printer_color,
        printer_duplex: args.printer_duplex,
        router_model: non_blank(args.router_model.as_ref()),
        router_ports: args.router_ports,
        router_wifi: non_blank(args.router_wifi.as_ref()),
        tv_model: non_blank(args.tv_model.as_ref()),
        tv_screen_size: non_blank(args.tv_screen_size.as_ref()),
    }
}

fn build_filter(args: &EquipmentListArgs) -> anyhow::Result<EquipmentFilter> {
    Ok(EquipmentFilter {
        building_id: args.building.clone(),
        floor_id: args.floor.clone(),
        room_id: args.room.clone(),
        type_id: args.type_id.clone(),
        status: parse_opt_enum::<EquipmentStatus>(args.status.as_deref(), "status")?,
        search: non_blank(args.search.as_ref()),
        created_from: day_bound(args.created_from.as_deref(), "created_from", false)?,
        created_to: day_bound(args.created_to.as_deref(), "created_to", true)?,
        is_active: args.active,
        author_id: args.author.clone(),
        characteristics: characteristic_filter(&args.characteristics),
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use crate::cli::subcommands::EquipmentCommands;
    use crate::cli::{Cli, Commands};

    use super::*;

    fn list_args(argv: &[&str]) -> EquipmentListArgs {
        let cli = Cli::try_parse_from(["cinv", "equipment", "list"].into_iter().chain(argv.iter().copied()))
            .expect("cli should parse");
        let Commands::Equipment {
            action: EquipmentCommands::List(args),
        } = cli.command
        else {
            panic!("expected equipment list");
        };
        args
    }

    #[test]
    fn flags_map_onto_filter() {
        let args = list_args(&[
            "--created-from", "2026-09-01", "--created-to", "2026-09-30", "--active", "false",
            "--author", "usr-1", "--cpu", "i5", "--printer-duplex", "true", "--router-ports", "8",
            "--tv-model", " ",
        ]);
        let filter = build_filter(&args).expect("filter should build");

        assert_eq!(
            filter.created_from.map(|d| d.to_rfc3339()).as_deref(),
            Some("2026-09-01T00:00:00+00:00")
        );
        assert_eq!(
            filter.created_to.map(|d| d.to_rfc3339()).as_deref(),
            Some("2026-09-30T23:59:59.999999999+00:00")
        );
        assert_eq!(filter.is_active, Some(false));
        assert_eq!(filter.author_id.as_deref(), Some("usr-1"));
        assert_eq!(filter.characteristics.cpu.as_deref(), Some("i5"));
        assert_eq!(filter.characteristics.printer_duplex, Some(true));
        assert_eq!(filter.characteristics.router_ports, Some(8));
        assert_eq!(filter.characteristics.tv_model, None);
    }

    #[test]
    fn bad_date_rejected() {
        let args = list_args(&["--created-from", "01.09.2026"]);
        assert!(build_filter(&args).is_err());
    }
}
