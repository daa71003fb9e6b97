use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use crate::labs::{LabRange, LabTest, Medication};
use crate::network::{CeilingRule, Factor, FactorKind, KineticModifiers, ScenarioPreset};

const EMPTY: &str = "-";

pub fn builtin_factors() -> Result<Vec<Factor>> {
    let content = include_str!("../../assets/tables/factors_v1.tsv");
    parse_factors(content, "built-in factors_v1")
}

pub fn builtin_ranges() -> Result<Vec<(LabTest, LabRange)>> {
    let content = include_str!("../../assets/tables/lab_ranges_v1.tsv");
    parse_ranges(content, "built-in lab_ranges_v1")
}

pub fn builtin_lab_factors() -> Result<BTreeMap<LabTest, Vec<String>>> {
    let content = include_str!("../../assets/tables/lab_factors_v1.tsv");
    parse_lab_factors(content, "built-in lab_factors_v1")
}

pub fn builtin_ceilings() -> Result<Vec<CeilingRule>> {
    let content = include_str!("../../assets/tables/medication_ceilings_v1.tsv");
    parse_ceilings(content, "built-in medication_ceilings_v1")
}

pub fn builtin_scenarios() -> Result<Vec<ScenarioPreset>> {
    let content = include_str!("../../assets/tables/scenarios_v1.tsv");
    parse_scenarios(content, "built-in scenarios_v1")
}

pub fn load_ranges_tsv(path: &Path) -> Result<Vec<(LabTest, LabRange)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read lab range TSV {}", path.display()))?;
    parse_ranges(&content, &path.display().to_string())
}

pub fn load_scenarios_tsv(path: &Path) -> Result<Vec<ScenarioPreset>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario TSV {}", path.display()))?;
    parse_scenarios(&content, &path.display().to_string())
}

/// User rows replace built-in rows with the same key in place; new keys append
/// in the order the user file lists them.
pub fn merge_by_key<T, K, F>(builtin: Vec<T>, user: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    if user.is_empty() {
        return builtin;
    }
    let mut user_order: Vec<K> = Vec::with_capacity(user.len());
    let mut user_map: HashMap<K, T> = HashMap::new();
    for row in user {
        let k = key(&row);
        if !user_map.contains_key(&k) {
            user_order.push(k.clone());
        }
        user_map.insert(k, row);
    }

    let mut merged = Vec::with_capacity(builtin.len() + user_map.len());
    for row in builtin {
        match user_map.remove(&key(&row)) {
            Some(user_row) => merged.push(user_row),
            None => merged.push(row),
        }
    }
    for k in user_order {
        if let Some(row) = user_map.remove(&k) {
            merged.push(row);
        }
    }
    merged
}

fn data_lines<'a>(content: &'a str) -> impl Iterator<Item = (usize, Vec<&'a str>)> + 'a {
    content.lines().enumerate().filter_map(|(idx, line)| {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
            return None;
        }
        Some((idx + 1, trimmed.split('\t').map(str::trim).collect()))
    })
}

fn expect_columns(parts: &[&str], n: usize, source: &str, line_no: usize) -> Result<()> {
    if parts.len() != n {
        bail!(
            "{}:{} malformed TSV (expected {} columns, got {})",
            source,
            line_no,
            n,
            parts.len()
        );
    }
    Ok(())
}

fn required<'a>(field: &'a str, name: &str, source: &str, line_no: usize) -> Result<&'a str> {
    if field.is_empty() || field == EMPTY {
        bail!("{}:{} empty {} field", source, line_no, name);
    }
    Ok(field)
}

fn optional(field: &str) -> Option<String> {
    if field.is_empty() || field == EMPTY {
        None
    } else {
        Some(field.to_string())
    }
}

fn list(field: &str) -> Vec<String> {
    if field.is_empty() || field == EMPTY {
        return Vec::new();
    }
    field
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn number(field: &str, name: &str, source: &str, line_no: usize) -> Result<f64> {
    let value: f64 = field
        .parse()
        .map_err(|_| anyhow!("{}:{} invalid {} '{}'", source, line_no, name, field))?;
    if !value.is_finite() {
        bail!("{}:{} non-finite {} '{}'", source, line_no, name, field);
    }
    Ok(value)
}

fn optional_number(field: &str, name: &str, source: &str, line_no: usize) -> Result<Option<f64>> {
    if field.is_empty() || field == EMPTY {
        return Ok(None);
    }
    number(field, name, source, line_no).map(Some)
}

fn lab_test(field: &str, source: &str, line_no: usize) -> Result<LabTest> {
    LabTest::from_key(field)
        .ok_or_else(|| anyhow!("{}:{} unknown lab '{}'", source, line_no, field))
}

fn parse_factors(content: &str, source: &str) -> Result<Vec<Factor>> {
    let mut out = Vec::new();
    for (line_no, parts) in data_lines(content) {
        expect_columns(&parts, 14, source, line_no)?;
        let id = required(parts[0], "id", source, line_no)?;
        let kind_str = required(parts[3], "kind", source, line_no)?;
        let kind = FactorKind::from_key(kind_str)
            .ok_or_else(|| anyhow!("{}:{} unknown factor kind '{}'", source, line_no, kind_str))?;
        let vit_k_dependent = match parts[5] {
            "yes" => true,
            "no" => false,
            other => bail!("{}:{} vitk must be yes/no, got '{}'", source, line_no, other),
        };
        out.push(Factor {
            id: id.to_string(),
            name: required(parts[1], "name", source, line_no)?.to_string(),
            short_name: required(parts[2], "short_name", source, line_no)?.to_string(),
            kind,
            base_activity: number(parts[4], "base_activity", source, line_no)?,
            vit_k_dependent,
            zymogen_id: optional(parts[6]),
            parents: list(parts[7]),
            children: list(parts[8]),
            feedback_targets: list(parts[9]),
            inhibits: list(parts[10]),
            complex_partner: optional(parts[11]),
            complex_name: optional(parts[12]),
            plasma_nm: optional_number(parts[13], "plasma_nm", source, line_no)?,
        });
    }
    Ok(out)
}

fn parse_ranges(content: &str, source: &str) -> Result<Vec<(LabTest, LabRange)>> {
    let mut out = Vec::new();
    for (line_no, parts) in data_lines(content) {
        expect_columns(&parts, 6, source, line_no)?;
        let test = lab_test(parts[0], source, line_no)?;
        let min = number(parts[1], "min", source, line_no)?;
        let max = number(parts[2], "max", source, line_no)?;
        if min > max {
            bail!("{}:{} min {} exceeds max {}", source, line_no, min, max);
        }
        let critical_low = optional_number(parts[4], "critical_low", source, line_no)?;
        let critical_high = optional_number(parts[5], "critical_high", source, line_no)?;
        if critical_low.is_some_and(|low| low > min) {
            bail!("{}:{} critical_low above normal min", source, line_no);
        }
        if critical_high.is_some_and(|high| high < max) {
            bail!("{}:{} critical_high below normal max", source, line_no);
        }
        out.push((
            test,
            LabRange {
                min,
                max,
                unit: required(parts[3], "unit", source, line_no)?.to_string(),
                critical_low,
                critical_high,
            },
        ));
    }
    Ok(out)
}

fn parse_lab_factors(content: &str, source: &str) -> Result<BTreeMap<LabTest, Vec<String>>> {
    let mut out: BTreeMap<LabTest, Vec<String>> = BTreeMap::new();
    for (line_no, parts) in data_lines(content) {
        expect_columns(&parts, 2, source, line_no)?;
        let test = lab_test(parts[0], source, line_no)?;
        let factor = required(parts[1], "factor_id", source, line_no)?;
        let members = out.entry(test).or_default();
        if members.iter().any(|m| m == factor) {
            bail!("{}:{} duplicate member '{}' for {}", source, line_no, factor, test.key());
        }
        members.push(factor.to_string());
    }
    Ok(out)
}

fn parse_ceilings(content: &str, source: &str) -> Result<Vec<CeilingRule>> {
    let mut out = Vec::new();
    for (line_no, parts) in data_lines(content) {
        expect_columns(&parts, 3, source, line_no)?;
        let medication = Medication::from_key(parts[0])
            .ok_or_else(|| anyhow!("{}:{} unknown medication '{}'", source, line_no, parts[0]))?;
        let ceiling = number(parts[2], "ceiling", source, line_no)?;
        if !(0.0..=1.0).contains(&ceiling) {
            bail!("{}:{} ceiling {} outside [0, 1]", source, line_no, ceiling);
        }
        out.push(CeilingRule {
            medication,
            factor_id: required(parts[1], "factor_id", source, line_no)?.to_string(),
            ceiling,
        });
    }
    Ok(out)
}

fn parse_scenarios(content: &str, source: &str) -> Result<Vec<ScenarioPreset>> {
    let mut presets: HashMap<String, ScenarioPreset> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for (line_no, parts) in data_lines(content) {
        expect_columns(&parts, 5, source, line_no)?;
        let id = required(parts[0], "scenario", source, line_no)?;
        let label = required(parts[1], "label", source, line_no)?;

        if !presets.contains_key(id) {
            order.push(id.to_string());
            presets.insert(
                id.to_string(),
                ScenarioPreset {
                    id: id.to_string(),
                    label: label.to_string(),
                    factor_levels: Vec::new(),
                    kinetics: KineticModifiers::default(),
                },
            );
        }
        let preset = presets
            .get_mut(id)
            .ok_or_else(|| anyhow!("{}:{} scenario '{}' lost", source, line_no, id))?;
        if preset.label != label {
            bail!("{}:{} label mismatch for scenario '{}'", source, line_no, id);
        }

        match parts[2] {
            "base" => {}
            "factor" => {
                let target = required(parts[3], "target", source, line_no)?;
                let level = number(parts[4], "value", source, line_no)?;
                if level < 0.0 {
                    bail!("{}:{} negative factor level for '{}'", source, line_no, target);
                }
                preset.factor_levels.push((target.to_string(), level));
            }
            "kinetic" => {
                let target = required(parts[3], "target", source, line_no)?;
                let value = number(parts[4], "value", source, line_no)?;
                if value < 0.0 {
                    bail!("{}:{} negative kinetic modifier '{}'", source, line_no, target);
                }
                if !preset.kinetics.set(target, value) {
                    bail!("{}:{} unknown kinetic modifier '{}'", source, line_no, target);
                }
            }
            other => bail!(
                "{}:{} scenario row kind must be base/factor/kinetic, got '{}'",
                source,
                line_no,
                other
            ),
        }
    }

    let mut out = Vec::with_capacity(order.len());
    for id in order {
        if let Some(preset) = presets.remove(&id) {
            out.push(preset);
        }
    }
    Ok(out)
}
