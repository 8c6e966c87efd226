use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::ProbeArgs;
use crate::form::{
    FieldKind, FillConfig, FormAgent, HtmlDocument, LocatorTier, locate, ordered_mappings,
};
use crate::model::FieldKey;

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub form_path: String,
    pub ready: bool,
    pub control_count: usize,
    pub resolved: usize,
    pub fields: Vec<ProbeEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeEntry {
    pub field: FieldKey,
    pub kind: &'static str,
    pub tier: Option<LocatorTier>,
    pub element_id: Option<String>,
}

pub fn run(args: ProbeArgs) -> Result<()> {
    let document = HtmlDocument::load(&args.form)
        .with_context(|| format!("failed to load form page {}", args.form.display()))?;

    let mut agent = FormAgent::new(FillConfig::default());
    agent.attach(document);

    let report = build_report(&agent, &args.form.display().to_string());
    if !report.ready {
        warn!(form = %report.form_path, "form agent is not ready");
    }
    info!(
        resolved = report.resolved,
        fields = report.fields.len(),
        controls = report.control_count,
        "probe completed"
    );

    if args.json {
        write_json_report(&report)
    } else {
        write_text_report(&report)
    }
}

pub fn build_report(agent: &FormAgent, form_path: &str) -> ProbeReport {
    let Some(document) = agent.document() else {
        return ProbeReport {
            form_path: form_path.to_string(),
            ready: false,
            control_count: 0,
            resolved: 0,
            fields: Vec::new(),
        };
    };

    let fields = ordered_mappings()
        .into_iter()
        .map(|mapping| {
            let located = locate(document, mapping.locator);
            ProbeEntry {
                field: mapping.key,
                kind: match mapping.kind {
                    FieldKind::Text => "text",
                    FieldKind::Choice => "choice",
                },
                tier: located.map(|found| found.tier),
                element_id: located.and_then(|found| document.attr(found.element, "id")),
            }
        })
        .collect::<Vec<ProbeEntry>>();

    ProbeReport {
        form_path: form_path.to_string(),
        ready: agent.ping(),
        control_count: document.control_count(),
        resolved: fields.iter().filter(|entry| entry.tier.is_some()).count(),
        fields,
    }
}

fn write_json_report(report: &ProbeReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, report)
        .context("failed to serialize probe json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_text_report(report: &ProbeReport) -> Result<()> {
    let mut output = io::BufWriter::new(io::stdout().lock());

    writeln!(output, "Form: {}", report.form_path)?;
    writeln!(
        output,
        "Ready: {} controls={} resolved={}/{}",
        report.ready,
        report.control_count,
        report.resolved,
        report.fields.len()
    )?;

    for entry in &report.fields {
        let tier = entry.tier.map(LocatorTier::as_str).unwrap_or("unresolved");
        writeln!(
            output,
            "{}\t{}\t{}\t{}",
            entry.field,
            entry.kind,
            tier,
            entry.element_id.as_deref().unwrap_or("-")
        )?;
    }

    output.flush()?;
    Ok(())
}
