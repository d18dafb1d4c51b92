use anyhow::{anyhow, bail, Result};
use hitsim_core::{LabelPolicy, RawInput};

pub const VALID_KEYS: &[&str] = &[
    "attack",
    "critical",
    "element",
    "hits",
    "labels",
    "target",
    "reserve_floor",
    "label_policy",
];

/// Replaces fields of `raw` in order; later entries win.
///
/// Values are stored as raw text and validated by the normalizer, except
/// `label_policy` which must name a policy here.
pub fn apply_overrides(raw: &mut RawInput, overrides: &[(String, String)]) -> Result<()> {
    for (key, value) in overrides {
        match key.as_str() {
            "attack" => raw.attack.clone_from(value),
            "critical" => raw.critical.clone_from(value),
            "element" => raw.element.clone_from(value),
            "hits" => raw.hits.clone_from(value),
            "labels" => raw.labels.clone_from(value),
            "target" => raw.target.clone_from(value),
            "reserve_floor" => raw.reserve_floor = Some(value.clone()),
            "label_policy" => raw.label_policy = as_label_policy(key, value)?,
            _ => bail!(
                "unknown override key '{key}'. Valid keys: {}",
                VALID_KEYS.join(", ")
            ),
        }
        tracing::debug!(%key, %value, "override applied");
    }
    Ok(())
}

/// Splits a `key=value` argument. The value may itself contain `=` or commas.
pub fn parse_override(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("override '{arg}': expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("override '{arg}': key must not be empty");
    }
    Ok((key.to_string(), value.to_string()))
}

fn as_label_policy(key: &str, value: &str) -> Result<LabelPolicy> {
    match value.trim() {
        "tolerant" => Ok(LabelPolicy::Tolerant),
        "strict" => Ok(LabelPolicy::Strict),
        other => bail!("override '{key}': expected 'tolerant' or 'strict', got '{other}'"),
    }
}
