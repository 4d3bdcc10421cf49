use chrono::SecondsFormat;
use clap::Args;
use kyc_casework::config::{AppConfig, CatalogConfig};
use kyc_casework::error::AppError;
use kyc_casework::workflows::checklist::{
    CaseChecklistView, CaseSnapshot, ChecklistEngine, ChecklistRow,
};
use kyc_casework::workflows::stage::{map_stage, StageProgressView};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ChecklistArgs {
    /// Case snapshot JSON file (case_id, attributes, documents, raw_stage)
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Requirement catalog YAML; defaults to CATALOG_PATH or the built-in catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Override the snapshot's raw backend stage
    #[arg(long)]
    pub(crate) stage: Option<String>,
    /// Emit the checklist view as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct StageArgs {
    /// Stage string exactly as reported by the case-management backend
    pub(crate) raw_stage: String,
    /// Emit the progress view as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_checklist(args: ChecklistArgs) -> Result<(), AppError> {
    let ChecklistArgs {
        snapshot,
        catalog,
        stage,
        json,
    } = args;

    let raw = std::fs::read_to_string(&snapshot)?;
    let mut case: CaseSnapshot = serde_json::from_str(&raw)?;
    if stage.is_some() {
        case.raw_stage = stage;
    }

    let catalog_config = match catalog {
        Some(path) => CatalogConfig { path: Some(path) },
        None => AppConfig::load()?.catalog,
    };
    let catalog = catalog_config.load_catalog()?;
    let engine = ChecklistEngine::new(catalog);
    let view = CaseChecklistView::new(&case, engine.for_case(&case));

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render_checklist(&view));
    }
    Ok(())
}

pub(crate) fn run_stage(args: StageArgs) -> Result<(), AppError> {
    let view = map_stage(&args.raw_stage).progress_view();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render_stage(&view));
    }
    Ok(())
}

pub(crate) fn render_checklist(view: &CaseChecklistView) -> String {
    let summary = &view.summary;
    let mut lines = vec![
        format!("Document checklist for case {} ({})", view.case_id, view.entity_type),
        format!(
            "Required: {}/{} satisfied ({:.0}%) | {} missing, {} pending review, {} rejected",
            summary.required_satisfied,
            summary.required_total,
            summary.completion_pct,
            summary.missing,
            summary.pending_review,
            summary.rejected
        ),
    ];

    if summary.ready_for_approval {
        lines.push("All required documents approved; case can move to approval.".to_string());
    }

    lines.push(String::new());
    lines.push("Required documents".to_string());
    let required: Vec<&ChecklistRow> = view.rows.iter().filter(|row| row.required).collect();
    if required.is_empty() {
        lines.push("- none".to_string());
    }
    lines.extend(required.into_iter().map(render_row));

    let extra: Vec<&ChecklistRow> = view.rows.iter().filter(|row| !row.required).collect();
    if !extra.is_empty() {
        lines.push(String::new());
        lines.push("Additional uploads".to_string());
        lines.extend(extra.into_iter().map(render_row));
    }

    if !view.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for warning in &view.warnings {
            lines.push(format!("- {warning}"));
        }
    }

    if let Some(stage) = &view.stage {
        lines.push(String::new());
        lines.push(render_stage(stage));
    }

    lines.join("\n")
}

fn render_row(row: &ChecklistRow) -> String {
    let mut line = format!("- [{}] {} ({})", row.state().label(), row.label, row.kind);
    if let Some(uploaded) = row.latest_uploaded_at {
        line.push_str(&format!(
            ", {} version(s), latest {}",
            row.version_count,
            uploaded.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
    line
}

pub(crate) fn render_stage(view: &StageProgressView) -> String {
    let heading = match view.label {
        Some(label) => format!("Stage: {label} ({})", view.id),
        None => format!("Stage: {} (not part of the onboarding workflow)", view.id),
    };

    let strip: Vec<String> = view
        .steps
        .iter()
        .map(|step| format!("{} [{}]", step.label, step.state.label()))
        .collect();

    format!("{heading}\n{}", strip.join(" -> "))
}
