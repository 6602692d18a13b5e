use std::path::Path;

use anyhow::Context;
use inv_core::label::{label_svg, sheet_svgs};
use inv_core::responses::EquipmentLabel;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Files written by `cinv equipment labels`.
#[derive(Debug, Serialize)]
pub struct LabelReport {
    pub dir: String,
    pub labels: Vec<String>,
    pub sheets: Vec<String>,
}

pub async fn run(ids: &[String], out: &Path, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor = ctx.actor().await?;
    let labels = ctx.service.equipment_labels(&actor, ids).await?;
    let report = write_labels(&labels, out)?;
    tracing::info!(dir = %report.dir, labels = report.labels.len(), "wrote QR labels");
    output(&report, flags.format)
}

/// Write one `{uid}.svg` per label plus A4 `sheet-{n}.svg` pages into `dir`.
pub fn write_labels(labels: &[EquipmentLabel], dir: &Path) -> anyhow::Result<LabelReport> {
    std::fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;

    let mut written = Vec::with_capacity(labels.len());
    for label in labels {
        let name = format!("{}.svg", label.uid);
        let svg = label_svg(&label.payload, label.inn)?;
        std::fs::write(dir.join(&name), svg).with_context(|| format!("cannot write {name}"))?;
        written.push(name);
    }

    let mut sheets = Vec::new();
    for (n, page) in sheet_svgs(labels)?.into_iter().enumerate() {
        let name = format!("sheet-{}.svg", n + 1);
        std::fs::write(dir.join(&name), page).with_context(|| format!("cannot write {name}"))?;
        sheets.push(name);
    }

    Ok(LabelReport {
        dir: dir.display().to_string(),
        labels: written,
        sheets,
    })
}
