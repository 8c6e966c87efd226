use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{info, warn};

use crate::cli::FillArgs;
use crate::commands::extract::extract_to_files;
use crate::form::{AgentHandle, Request, Response, spawn_agent};
use crate::model::{ControlValue, FillOutcome, FillRunManifest, ProfileRecord};
use crate::util::{now_utc_string, safe_stem, utc_compact_string, write_json_pretty};

pub fn run(args: FillArgs) -> Result<()> {
    let started = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("fill_{}_{}", safe_stem(&args.form), utc_compact_string(started));

    let (record, record_source) = load_record(&args)?;
    let markup = fs::read_to_string(&args.form)
        .with_context(|| format!("failed to read form page {}", args.form.display()))?;

    let agent = spawn_agent(markup, args.tuning.to_config());
    let result = drive_agent(&agent, record);
    agent
        .shutdown()
        .context("form agent did not shut down cleanly")?;
    let (outcome, controls) = result?;

    let manifest = FillRunManifest {
        manifest_version: 1,
        run_id: run_id.clone(),
        status: if outcome.is_clean() {
            "completed".to_string()
        } else {
            "partial".to_string()
        },
        started_at,
        finished_at: now_utc_string(),
        form_path: args.form.display().to_string(),
        record_source,
        summary: outcome.summary(),
        outcome,
        controls,
    };

    let outcome_path = args
        .outcome_path
        .unwrap_or_else(|| args.output_root.join("runs").join(format!("{run_id}.json")));
    write_json_pretty(&outcome_path, &manifest)?;
    info!(path = %outcome_path.display(), "wrote fill report");

    if manifest.outcome.is_clean() {
        info!(filled = manifest.outcome.filled.len(), "{}", manifest.summary);
    } else {
        warn!(
            filled = manifest.outcome.filled.len(),
            errors = manifest.outcome.errors.len(),
            skipped = manifest.outcome.skipped.len(),
            "filled with {} errors",
            manifest.outcome.errors.len()
        );
    }

    Ok(())
}

fn load_record(args: &FillArgs) -> Result<(ProfileRecord, String)> {
    if let Some(path) = &args.record {
        return Ok((read_record(path)?, path.display().to_string()));
    }

    let Some(pdf) = &args.pdf else {
        bail!("either --record or --pdf is required");
    };
    let record_path = args
        .output_root
        .join("records")
        .join(format!("{}.json", safe_stem(pdf)));
    let (record, _) = extract_to_files(pdf, args.backend, &record_path)?;
    Ok((record, pdf.display().to_string()))
}

fn read_record(path: &Path) -> Result<ProfileRecord> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn drive_agent(
    agent: &AgentHandle,
    record: ProfileRecord,
) -> Result<(FillOutcome, Vec<ControlValue>)> {
    match agent.call(&Request::Ping).context("form agent did not answer ping")? {
        Response::Pong { ready: true, phase } => {
            info!(phase = ?phase, "form agent ready");
        }
        Response::Pong { ready: false, .. } => bail!("form agent has no document attached"),
        other => bail!("unexpected reply to ping: {other:?}"),
    }

    let outcome = match agent
        .call(&Request::FillForm { data: record })
        .context("fill request failed")?
    {
        Response::Filled { result } => result,
        Response::Failed { error } => bail!("form fill failed: {error}"),
        other => bail!("unexpected reply to fill: {other:?}"),
    };

    let controls = match agent
        .call(&Request::Snapshot)
        .context("snapshot request failed")?
    {
        Response::Snapshot { controls } => controls,
        Response::Failed { error } => bail!("snapshot failed: {error}"),
        other => bail!("unexpected reply to snapshot: {other:?}"),
    };

    Ok((outcome, controls))
}
