//! `aclgen flags` — print the derived compiler flags.

use aclgen_core::{derive_explained, DerivedFlag};
use anyhow::{bail, Result};

use crate::inputs::ResolvedInputs;

/// Derive and print flags.
pub fn run(resolved: &ResolvedInputs, format: Option<&str>, explain: bool) -> Result<()> {
    let derived = derive_explained(&resolved.build_inputs());
    log::info!("derived {} flags", derived.len());
    println!("{}", render(&derived, format, explain)?);
    Ok(())
}

/// Render flags in the requested format (text, lines, json).
pub fn render(derived: &[DerivedFlag], format: Option<&str>, explain: bool) -> Result<String> {
    match format.unwrap_or("text") {
        "text" if explain => Ok(explain_table(derived)),
        "text" => Ok(flag_strings(derived).join(" ")),
        "lines" if explain => Ok(explain_table(derived)),
        "lines" => Ok(flag_strings(derived).join("\n")),
        "json" if explain => Ok(serde_json::to_string_pretty(derived)?),
        "json" => Ok(serde_json::to_string_pretty(&flag_strings(derived))?),
        other => bail!("unknown format: '{other}' (expected text, lines or json)"),
    }
}

fn flag_strings(derived: &[DerivedFlag]) -> Vec<&str> {
    derived.iter().map(|d| d.flag.as_str()).collect()
}

fn explain_table(derived: &[DerivedFlag]) -> String {
    let width = derived.iter().map(|d| d.flag.len()).max().unwrap_or(0);
    derived
        .iter()
        .map(|d| format!("{:<width$}  # {}", d.flag, d.reason.describe()))
        .collect::<Vec<_>>()
        .join("\n")
}
