//! Scenario files and flag overrides shared by the CLI.
//!
//! Turns host-side inputs into `hitsim_core::RawInput` values. Validation of
//! the field contents stays in the core normalizer.

mod overrides;
mod scenario;

pub use overrides::{apply_overrides, parse_override, VALID_KEYS};
pub use scenario::{load_scenario, Case, CaseDefaults, FieldValue, ListValue, Scenario};
