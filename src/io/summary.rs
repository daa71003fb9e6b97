use anyhow::{Context, Result};

use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let panel = ctx.panel()?;
    let interp = ctx
        .interpretation
        .as_ref()
        .context("interpretation missing")?;

    let meds: Vec<&str> = panel
        .medications
        .active()
        .into_iter()
        .map(|m| m.key())
        .collect();

    let mut out = String::new();
    out.push_str(&format!("kira-hemostasis v{}\n", version));
    out.push_str(&format!(
        "Panel: {} (medications: {})\n",
        panel.label,
        if meds.is_empty() { "none".to_string() } else { meds.join(", ") }
    ));
    if let Some(scenario) = &ctx.scenario {
        out.push_str(&format!("Scenario: {}\n", scenario));
    }
    out.push_str(&format!("Pattern: {}\n", interp.pattern));
    out.push_str(&format!("Pathway: {}\n", interp.affected_pathway.as_str()));

    if let Some(isth) = &interp.isth_score {
        out.push_str(&format!("ISTH: {}/8 ({})\n", isth.total, isth.interpretation));
    }
    if let Some(hit) = &interp.hit4t_score {
        out.push_str(&format!("4T: {}/8 ({})\n", hit.total, hit.probability.as_str()));
    }

    if interp.diagnoses.is_empty() {
        out.push_str("Diagnoses: none\n");
    } else {
        out.push_str("Diagnoses:\n");
        for d in &interp.diagnoses {
            out.push_str(&format!("- {} [{}]\n", d.name, d.probability.as_str()));
        }
    }
    if !interp.recommendations.is_empty() {
        out.push_str("Recommendations:\n");
        for r in &interp.recommendations {
            out.push_str(&format!("- {}\n", r));
        }
    }
    if !interp.warnings.is_empty() {
        out.push_str("Clinical warnings:\n");
        for w in &interp.warnings {
            out.push_str(&format!("- {}\n", w));
        }
    }
    if let Some(tc) = &ctx.timecourse_result {
        out.push_str(&format!("Trajectory: {}\n", tc.trajectory));
    }

    Ok(out)
}
