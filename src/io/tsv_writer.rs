use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::network::FactorState;

pub const FACTOR_HEADER: &str =
    "factor_id\tshort_name\tbase_activity\tactivity\tactivated_form\tzymogen_id";

pub fn write_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let config = ctx.config()?;
    let states = config.factors.snapshot(ctx.activity()?);
    write_factor_tsv(path, &states)
}

pub fn write_factor_tsv(path: &Path, states: &[FactorState]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_factor_rows(&mut w, states)?;
    w.flush()?;
    Ok(())
}

pub fn write_factor_rows<W: Write>(w: &mut W, states: &[FactorState]) -> Result<()> {
    writeln!(w, "{}", FACTOR_HEADER)?;
    for s in states {
        writeln!(
            w,
            "{}\t{}\t{:.4}\t{:.4}\t{}\t{}",
            s.id,
            s.short_name,
            s.base_activity,
            s.activity,
            s.is_activated_form,
            s.zymogen_id.as_deref().unwrap_or("-")
        )?;
    }
    Ok(())
}
