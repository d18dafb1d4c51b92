use anyhow::{bail, Context, Result};
use hitsim_core::{LabelPolicy, RawInput};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub label_policy: LabelPolicy,
    #[serde(default)]
    pub defaults: CaseDefaults,
    pub cases: Vec<Case>,
}

/// Values applied to any case that leaves the field out.
#[derive(Debug, Default, Deserialize)]
pub struct CaseDefaults {
    pub target: Option<String>,
    pub reserve_floor: Option<FieldValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Case {
    pub name: String,
    #[serde(default)]
    pub attack: FieldValue,
    #[serde(default)]
    pub critical: FieldValue,
    #[serde(default)]
    pub element: FieldValue,
    #[serde(default)]
    pub hits: ListValue,
    #[serde(default)]
    pub labels: ListValue,
    pub target: Option<String>,
    pub reserve_floor: Option<FieldValue>,
}

/// A single field written either as a JSON number or as text. Text is passed
/// through untouched so the normalizer sees exactly what the author wrote.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    pub fn to_raw(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

/// A comma-separated list written as one string or as a JSON array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListValue {
    Text(String),
    List(Vec<FieldValue>),
}

impl Default for ListValue {
    fn default() -> Self {
        ListValue::Text(String::new())
    }
}

impl ListValue {
    pub fn to_raw(&self) -> String {
        match self {
            ListValue::Text(s) => s.clone(),
            ListValue::List(items) => items
                .iter()
                .map(FieldValue::to_raw)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

impl Scenario {
    pub fn case(&self, name: &str) -> Result<&Case> {
        match self.cases.iter().find(|case| case.name == name) {
            Some(case) => Ok(case),
            None => bail!(
                "scenario '{}' has no case '{name}'. Available cases: {}",
                self.name,
                self.case_names().join(", ")
            ),
        }
    }

    pub fn case_names(&self) -> Vec<&str> {
        self.cases.iter().map(|case| case.name.as_str()).collect()
    }

    /// Raw input for `case`, with scenario defaults filled in.
    pub fn raw_input(&self, case: &Case) -> RawInput {
        let target = case
            .target
            .as_ref()
            .or(self.defaults.target.as_ref())
            .cloned()
            .unwrap_or_default();
        let reserve_floor = case
            .reserve_floor
            .as_ref()
            .or(self.defaults.reserve_floor.as_ref())
            .map(FieldValue::to_raw);
        RawInput {
            attack: case.attack.to_raw(),
            critical: case.critical.to_raw(),
            element: case.element.to_raw(),
            hits: case.hits.to_raw(),
            labels: case.labels.to_raw(),
            target,
            reserve_floor,
            label_policy: self.label_policy,
        }
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario file: {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&json)
        .with_context(|| format!("parsing scenario file: {}", path.display()))?;
    if scenario.name.is_empty() {
        bail!("scenario 'name' must not be empty");
    }
    if scenario.cases.is_empty() {
        bail!("scenario 'cases' must contain at least one case");
    }
    let mut seen = HashSet::new();
    for case in &scenario.cases {
        if case.name.is_empty() {
            bail!("scenario '{}': case 'name' must not be empty", scenario.name);
        }
        if !seen.insert(case.name.as_str()) {
            bail!(
                "scenario '{}': duplicate case name '{}'",
                scenario.name,
                case.name
            );
        }
    }
    tracing::debug!(
        scenario = %scenario.name,
        cases = scenario.cases.len(),
        "scenario loaded"
    );
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_scenario(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_scenario_with_defaults() {
        let file = write_temp_scenario(
            r#"{
            "name": "tuning",
            "defaults": { "target": "element", "reserve_floor": 2 },
            "cases": [
                { "name": "a", "attack": 10, "critical": "10", "element": 10, "hits": "1,3" }
            ]
        }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.name, "tuning");
        assert_eq!(scenario.label_policy, LabelPolicy::Tolerant);

        let raw = scenario.raw_input(scenario.case("a").unwrap());
        assert_eq!(raw.attack, "10");
        assert_eq!(raw.critical, "10");
        assert_eq!(raw.hits, "1,3");
        assert_eq!(raw.labels, "");
        assert_eq!(raw.target, "element");
        assert_eq!(raw.reserve_floor.as_deref(), Some("2"));
    }

    #[test]
    fn test_case_fields_override_defaults() {
        let file = write_temp_scenario(
            r#"{
            "name": "tuning",
            "label_policy": "strict",
            "defaults": { "target": "element" },
            "cases": [
                { "name": "a", "attack": 1, "critical": 1, "element": 1,
                  "hits": [1, 4], "labels": ["sword", "bow"], "target": "critical" }
            ]
        }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        let raw = scenario.raw_input(&scenario.cases[0]);
        assert_eq!(raw.target, "critical");
        assert_eq!(raw.hits, "1,4");
        assert_eq!(raw.labels, "sword,bow");
        assert_eq!(raw.reserve_floor, None);
        assert_eq!(raw.label_policy, LabelPolicy::Strict);
    }

    #[test]
    fn test_unknown_case_lists_available() {
        let file = write_temp_scenario(
            r#"{ "name": "s", "cases": [ { "name": "one" }, { "name": "two" } ] }"#,
        );
        let scenario = load_scenario(file.path()).unwrap();
        let err = scenario.case("three").unwrap_err().to_string();
        assert!(err.contains("three"));
        assert!(err.contains("one, two"));
    }

    #[test]
    fn test_load_scenario_empty_name_fails() {
        let file = write_temp_scenario(r#"{ "name": "", "cases": [ { "name": "a" } ] }"#);
        let result = load_scenario(file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("name"));
    }

    #[test]
    fn test_load_scenario_without_cases_fails() {
        let file = write_temp_scenario(r#"{ "name": "s", "cases": [] }"#);
        assert!(load_scenario(file.path()).is_err());
    }

    #[test]
    fn test_duplicate_case_names_fail() {
        let file = write_temp_scenario(
            r#"{ "name": "s", "cases": [ { "name": "a" }, { "name": "a" } ] }"#,
        );
        let err = load_scenario(file.path()).unwrap_err().to_string();
        assert!(err.contains("duplicate case name 'a'"));
    }

    #[test]
    fn test_malformed_json_reports_path() {
        let file = write_temp_scenario("{ not json");
        let err = format!("{:#}", load_scenario(file.path()).unwrap_err());
        assert!(err.contains("parsing scenario file"));
    }
}
