use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::cli::{ExtractArgs, TextBackend};
use crate::extraction::extract;
use crate::model::{ExtractionManifest, FieldKey, ProfileRecord};
use crate::util::{
    now_utc_string, read_bytes, safe_stem, sha256_hex, utc_compact_string, write_json_pretty,
};

pub fn run(args: ExtractArgs) -> Result<()> {
    let stamp = utc_compact_string(Utc::now());
    let stem = safe_stem(&args.pdf);

    let record_path = args
        .record_path
        .unwrap_or_else(|| args.output_root.join("records").join(format!("{stem}.json")));
    let manifest_path = args.manifest_path.unwrap_or_else(|| {
        args.output_root
            .join("manifests")
            .join(format!("extract_{stem}_{stamp}.json"))
    });

    let (record, manifest) = extract_to_files(&args.pdf, args.backend, &record_path)?;
    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote extraction manifest");
    info!(
        fields = record.len(),
        name = record.get(FieldKey::Name).unwrap_or_default(),
        "extract completed"
    );
    Ok(())
}

/// Extracts `pdf`, writes the record JSON to `record_path` and returns the
/// record with its manifest.
pub fn extract_to_files(
    pdf: &Path,
    backend: TextBackend,
    record_path: &Path,
) -> Result<(ProfileRecord, ExtractionManifest)> {
    info!(pdf = %pdf.display(), backend = backend.as_str(), "extracting profile");

    let bytes = read_bytes(pdf)?;
    let profile = extract(&bytes, backend)
        .with_context(|| format!("failed to extract profile from {}", pdf.display()))?;

    write_json_pretty(record_path, &profile.record)?;
    info!(path = %record_path.display(), "wrote profile record");

    let manifest = ExtractionManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_path: pdf.display().to_string(),
        source_sha256: sha256_hex(&bytes),
        source_bytes: bytes.len(),
        backend: backend.as_str().to_string(),
        page_count: profile.page_count,
        field_count: profile.record.len(),
        record_path: record_path.display().to_string(),
        warnings: profile.warnings,
    };

    Ok((profile.record, manifest))
}
