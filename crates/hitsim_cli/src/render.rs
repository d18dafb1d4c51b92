//! Result reporting: text table and JSON views of a run.

use std::io::{self, Write};

use hitsim_core::{Adjustment, Inventory, RunOutcome, SimulationError, StepResult};
use serde::Serialize;

pub type CaseResult = Result<RunOutcome, SimulationError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Completed,
    Halted,
    Rejected,
}

impl Status {
    pub fn of(result: &CaseResult) -> Self {
        match result {
            Ok(outcome) if outcome.is_completed() => Status::Completed,
            Ok(_) => Status::Halted,
            Err(_) => Status::Rejected,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Completed => "completed",
            Status::Halted => "halted",
            Status::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorReport<'a> {
    #[serde(flatten)]
    pub error: &'a SimulationError,
    pub message: String,
}

impl<'a> ErrorReport<'a> {
    fn new(error: &'a SimulationError) -> Self {
        Self {
            error,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CaseReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<&'a str>,
    pub status: Status,
    pub steps: &'a [StepResult],
    pub inventory: Option<&'a Inventory>,
    pub error: Option<ErrorReport<'a>>,
}

impl<'a> CaseReport<'a> {
    pub fn new(case: Option<&'a str>, result: &'a CaseResult) -> Self {
        let status = Status::of(result);
        match result {
            Ok(outcome) => Self {
                case,
                status,
                steps: &outcome.steps,
                inventory: Some(&outcome.inventory),
                error: outcome.halt.as_ref().map(ErrorReport::new),
            },
            Err(err) => Self {
                case,
                status,
                steps: &[],
                inventory: None,
                error: Some(ErrorReport::new(err)),
            },
        }
    }
}

const HEADER: [&str; 4] = ["attack", "critical", "element", "action"];

fn write_row(out: &mut impl Write, inventory: &Inventory, action: &str) -> io::Result<()> {
    writeln!(
        out,
        "{:>8}  {:>8}  {:>8}  {action}",
        inventory.attack, inventory.critical, inventory.element
    )
}

fn adjustment_action(adjustment: &Adjustment) -> String {
    match adjustment {
        Adjustment::None => "(no adjustment)".to_string(),
        Adjustment::Skip { counter, amount } => {
            format!("{} -{amount} (adjustment)", counter.display_name())
        }
    }
}

/// Writes two rows per step, the adjustment then the hit, followed by the
/// halting inventory and error when the run stopped early.
pub fn write_table(
    out: &mut impl Write,
    result: &CaseResult,
    target_name: &str,
) -> io::Result<()> {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => return writeln!(out, "error: {err}"),
    };

    writeln!(
        out,
        "{:>8}  {:>8}  {:>8}  {}",
        HEADER[0], HEADER[1], HEADER[2], HEADER[3]
    )?;
    for step in &outcome.steps {
        write_row(out, &step.after_adjustment, &adjustment_action(&step.adjustment))?;
        let label = if step.hit_label.is_empty() {
            String::new()
        } else {
            format!(" [{}]", step.hit_label)
        };
        write_row(
            out,
            &step.inventory,
            &format!("{target_name} -3 (hit {}{label})", step.hit_ordinal),
        )?;
    }
    if let Some(err) = &outcome.halt {
        write_row(out, &outcome.inventory, "(halted)")?;
        writeln!(out, "error: {err}")?;
    }
    Ok(())
}

/// One line per case for batch runs.
pub fn write_summary_line(out: &mut impl Write, case: &str, result: &CaseResult) -> io::Result<()> {
    let status = Status::of(result).as_str();
    match result {
        Ok(outcome) => {
            let inv = &outcome.inventory;
            write!(
                out,
                "{case:<20} {status:<10} steps={:<4} final={}/{}/{}",
                outcome.steps.len(),
                inv.attack,
                inv.critical,
                inv.element
            )?;
            match &outcome.halt {
                Some(err) => writeln!(out, "  error: {err}"),
                None => writeln!(out),
            }
        }
        Err(err) => writeln!(out, "{case:<20} {status:<10} error: {err}"),
    }
}
