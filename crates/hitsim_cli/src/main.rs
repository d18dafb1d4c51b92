use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use hitsim_core::{simulate_raw, CounterId, RawInput};
use hitsim_scenario::{apply_overrides, load_scenario, parse_override, Case, Scenario};
use tracing_subscriber::EnvFilter;

mod render;

use render::{CaseReport, CaseResult, Status};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "hitsim", about = "Hit consumption simulator")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a single case from flags, or from a scenario file with flags on top.
    Run {
        /// Scenario file to take the case from.
        #[arg(long)]
        scenario: Option<PathBuf>,
        /// Case name within the scenario. Optional when it holds exactly one case.
        #[arg(long, requires = "scenario")]
        case: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
        #[arg(long, default_value = "table", value_parser = ["table", "json"])]
        format: String,
    },
    /// Simulate every case of a scenario file.
    Batch {
        #[arg(long)]
        scenario: PathBuf,
        #[command(flatten)]
        fields: FieldArgs,
        #[arg(long, default_value = "table", value_parser = ["table", "json"])]
        format: String,
        /// Exit non-zero when any case halts or is rejected.
        #[arg(long)]
        fail_on_halt: bool,
    },
}

/// Field values layered over the scenario (or over an empty input).
#[derive(Args)]
struct FieldArgs {
    #[arg(long, allow_hyphen_values = true)]
    attack: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    critical: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    element: Option<String>,
    /// Comma-separated hit positions, e.g. "1,4,6".
    #[arg(long, allow_hyphen_values = true)]
    hits: Option<String>,
    /// Comma-separated labels paired with hits in input order.
    #[arg(long)]
    labels: Option<String>,
    /// attack, critical or element. Defaults to attack without a scenario.
    #[arg(long)]
    target: Option<String>,
    /// Minimum every counter must keep. Enables check-before-subtract.
    #[arg(long, allow_hyphen_values = true)]
    reserve_floor: Option<String>,
    /// Fail when label and hit counts differ instead of padding labels.
    #[arg(long)]
    strict_labels: bool,
    /// Extra KEY=VALUE overrides, applied after the flags above.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

impl FieldArgs {
    fn overrides(&self) -> Result<Vec<(String, String)>> {
        let flags = [
            ("attack", &self.attack),
            ("critical", &self.critical),
            ("element", &self.element),
            ("hits", &self.hits),
            ("labels", &self.labels),
            ("target", &self.target),
            ("reserve_floor", &self.reserve_floor),
        ];
        let mut overrides: Vec<(String, String)> = flags
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
            .collect();
        if self.strict_labels {
            overrides.push(("label_policy".to_string(), "strict".to_string()));
        }
        for arg in &self.set {
            overrides.push(parse_override(arg)?);
        }
        Ok(overrides)
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn target_name(raw: &RawInput) -> &'static str {
    raw.target
        .parse::<CounterId>()
        .map_or("Target", CounterId::display_name)
}

fn emit(
    out: &mut impl Write,
    case: Option<&str>,
    raw: &RawInput,
    result: &CaseResult,
    format: &str,
) -> Result<()> {
    if format == "json" {
        serde_json::to_writer_pretty(&mut *out, &CaseReport::new(case, result))
            .context("writing JSON report")?;
        writeln!(out)?;
    } else {
        render::write_table(out, result, target_name(raw)).context("writing table")?;
    }
    Ok(())
}

fn pick_case<'a>(scenario: &'a Scenario, name: Option<&str>) -> Result<&'a Case> {
    match name {
        Some(name) => scenario.case(name),
        None if scenario.cases.len() == 1 => Ok(&scenario.cases[0]),
        None => bail!(
            "scenario '{}' has {} cases; pick one with --case ({})",
            scenario.name,
            scenario.cases.len(),
            scenario.case_names().join(", ")
        ),
    }
}

fn run(
    scenario: Option<&Path>,
    case: Option<&str>,
    fields: &FieldArgs,
    format: &str,
) -> Result<ExitCode> {
    let (case_name, mut raw) = match scenario {
        Some(path) => {
            let scenario = load_scenario(path)?;
            let case = pick_case(&scenario, case)?;
            (Some(case.name.clone()), scenario.raw_input(case))
        }
        None => (
            None,
            RawInput {
                target: CounterId::Attack.as_str().to_string(),
                ..RawInput::default()
            },
        ),
    };
    apply_overrides(&mut raw, &fields.overrides()?)?;

    let result = simulate_raw(&raw);
    tracing::info!(status = Status::of(&result).as_str(), "run finished");

    let mut out = std::io::stdout().lock();
    emit(&mut out, case_name.as_deref(), &raw, &result, format)?;

    Ok(match Status::of(&result) {
        Status::Completed => ExitCode::SUCCESS,
        Status::Halted | Status::Rejected => ExitCode::FAILURE,
    })
}

fn batch(
    scenario_path: &Path,
    fields: &FieldArgs,
    format: &str,
    fail_on_halt: bool,
) -> Result<ExitCode> {
    let scenario = load_scenario(scenario_path)?;
    let overrides = fields.overrides()?;

    let mut results = Vec::with_capacity(scenario.cases.len());
    for case in &scenario.cases {
        let mut raw = scenario.raw_input(case);
        apply_overrides(&mut raw, &overrides)
            .with_context(|| format!("case '{}'", case.name))?;
        let result = simulate_raw(&raw);
        tracing::info!(
            case = %case.name,
            status = Status::of(&result).as_str(),
            "case finished"
        );
        results.push((case.name.as_str(), result));
    }

    let mut out = std::io::stdout().lock();
    if format == "json" {
        let reports: Vec<CaseReport<'_>> = results
            .iter()
            .map(|(name, result)| CaseReport::new(Some(*name), result))
            .collect();
        serde_json::to_writer_pretty(&mut out, &reports).context("writing JSON report")?;
        writeln!(out)?;
    } else {
        writeln!(out, "scenario: {}", scenario.name)?;
        writeln!(out, "{}", "-".repeat(80))?;
        for (name, result) in &results {
            render::write_summary_line(&mut out, name, result)?;
        }
    }

    let all_completed = results
        .iter()
        .all(|(_, result)| Status::of(result) == Status::Completed);
    Ok(if fail_on_halt && !all_completed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Run {
            scenario,
            case,
            fields,
            format,
        } => run(scenario.as_deref(), case.as_deref(), &fields, &format),
        Commands::Batch {
            scenario,
            fields,
            format,
            fail_on_halt,
        } => batch(&scenario, &fields, &format, fail_on_halt),
    }
}
