//! Learning resource recommendations for the stored plan.

use std::io::Write;

use anyhow::{Context, Result};
use sp_core::{Plan, Recommendation, recommend_resources};

use super::util::rng_from_seed;
use crate::context::SessionContext;

/// One recommendation per planned subject, in plan order.
pub fn recommend_for_plan(plan: &Plan, seed: Option<u64>) -> Vec<Recommendation> {
    let subjects: Vec<&str> = plan.entries.iter().map(|e| e.subject.as_str()).collect();
    let mut rng = rng_from_seed(seed);
    recommend_resources(&subjects, &mut rng)
}

pub fn write_recommendations<W: Write>(
    writer: &mut W,
    recommendations: &[Recommendation],
) -> Result<()> {
    for rec in recommendations {
        writeln!(writer, "{}: {}", rec.subject, rec.url)?;
    }
    Ok(())
}

pub fn run<W: Write>(writer: &mut W, ctx: &SessionContext, seed: Option<u64>) -> Result<()> {
    let Some(plan) = ctx
        .db
        .load_plan(ctx.user.id)
        .context("failed to load plan")?
    else {
        writeln!(writer, "No plan yet.")?;
        writeln!(writer)?;
        writeln!(writer, "Hint: Run 'sp plan generate' to get recommendations.")?;
        return Ok(());
    };

    write_recommendations(writer, &recommend_for_plan(&plan, seed))
}
