use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::extraction::SynthesisConfig;
use crate::form::{FillConfig, ReadinessPolicy, RetryPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "autofill",
    version,
    about = "Extract registration profiles from PDFs and fill them into web forms"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Fill(FillArgs),
    Probe(ProbeArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum TextBackend {
    Lopdf,
    Pdftotext,
}

impl TextBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lopdf => "lopdf",
            Self::Pdftotext => "pdftotext",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long)]
    pub pdf: PathBuf,

    #[arg(long, default_value = ".cache/autofill")]
    pub output_root: PathBuf,

    #[arg(long)]
    pub record_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = TextBackend::Lopdf)]
    pub backend: TextBackend,
}

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    /// HTML page holding the registration form.
    #[arg(long)]
    pub form: PathBuf,

    /// Previously extracted record (JSON). Mutually exclusive with --pdf.
    #[arg(long, conflicts_with = "pdf", required_unless_present = "pdf")]
    pub record: Option<PathBuf>,

    #[arg(long)]
    pub pdf: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = TextBackend::Lopdf)]
    pub backend: TextBackend,

    #[arg(long, default_value = ".cache/autofill")]
    pub output_root: PathBuf,

    #[arg(long)]
    pub outcome_path: Option<PathBuf>,

    #[command(flatten)]
    pub tuning: FillTuningArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    #[arg(long)]
    pub form: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct FillTuningArgs {
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,

    #[arg(long, default_value_t = 200)]
    pub retry_backoff_ms: u64,

    #[arg(long, default_value_t = 100)]
    pub ready_poll_ms: u64,

    #[arg(long, default_value_t = 5000)]
    pub ready_timeout_ms: u64,

    #[arg(long, default_value = "nitresearchcenter.com")]
    pub email_domain: String,
}

impl FillTuningArgs {
    pub fn to_config(&self) -> FillConfig {
        FillConfig {
            retry: RetryPolicy {
                max_attempts: self.max_attempts.max(1),
                backoff: Duration::from_millis(self.retry_backoff_ms),
            },
            readiness: ReadinessPolicy {
                poll_interval: Duration::from_millis(self.ready_poll_ms),
                timeout: Duration::from_millis(self.ready_timeout_ms),
            },
            synthesis: SynthesisConfig {
                email_domain: self.email_domain.clone(),
                ..SynthesisConfig::default()
            },
        }
    }
}
