//! `aclgen check` — show the resolved inputs and anything that will be ignored.

use aclgen_core::{Arch, DataLayout, DataType, KernelFeature, Selection};
use anyhow::Result;

use crate::inputs::ResolvedInputs;

/// Print the resolved inputs and warnings.
pub fn run(resolved: &ResolvedInputs) -> Result<()> {
    let issues = issues(resolved);
    log::debug!("check found {} issues", issues.len());
    print!("{}", render(resolved, &issues));
    Ok(())
}

/// Inputs that will silently narrow or skip flags.
pub fn issues(resolved: &ResolvedInputs) -> Vec<String> {
    let inputs = resolved.build_inputs();
    let mut issues = Vec::new();

    match (&resolved.version.value, inputs.version) {
        (None, _) => issues.push("no platform version given; version-gated flags disabled".into()),
        (Some(raw), None) => issues.push(format!(
            "unknown platform version '{raw}'; version-gated flags disabled"
        )),
        (Some(_), Some(_)) => {}
    }

    for arch in inputs.arches.iter().filter(|a| !a.is_known()) {
        issues.push(format!("unrecognized architecture '{arch}'"));
    }
    for token in inputs.features.data_types.ignored() {
        issues.push(format!("ignoring unrecognized data type '{token}'"));
    }
    for token in inputs.features.data_layouts.ignored() {
        issues.push(format!("ignoring unrecognized data layout '{token}'"));
    }
    if inputs.features.data_types.enabled().next().is_none() {
        issues.push("no data type kernels selected".into());
    }
    if inputs.features.data_layouts.enabled().next().is_none() {
        issues.push("no data layout kernels selected".into());
    }
    issues
}

fn enabled_tokens<F: KernelFeature>(selection: &Selection<F>) -> String {
    let tokens: Vec<&str> = selection.enabled().map(|f| f.token()).collect();
    if tokens.is_empty() {
        "(none)".to_string()
    } else {
        tokens.join(", ")
    }
}

/// Render the report.
pub fn render(resolved: &ResolvedInputs, issues: &[String]) -> String {
    let inputs = resolved.build_inputs();
    let mut out = String::new();

    out.push_str("=== aclgen check ===\n");
    match &resolved.config_path {
        Some(path) => out.push_str(&format!("Config: {}\n", path.display())),
        None => out.push_str("Config: (none)\n"),
    }
    out.push('\n');

    let version = match (&resolved.version.value, inputs.version) {
        (Some(raw), Some(release)) => format!("{raw} -> {release}"),
        (Some(raw), None) => format!("{raw} -> unknown"),
        (None, _) => "(unset)".to_string(),
    };
    out.push_str(&format!(
        "  Platform version: {version} [{}]\n",
        resolved.version.source
    ));

    let arches: Vec<&str> = inputs.arches.iter().map(Arch::as_str).collect();
    out.push_str(&format!(
        "  Architectures:    {} [{}]\n",
        if arches.is_empty() {
            "(none)".to_string()
        } else {
            arches.join(", ")
        },
        resolved.arches.source
    ));
    out.push_str(&format!(
        "  Data types:       {} [{}]\n",
        enabled_tokens::<DataType>(&inputs.features.data_types),
        resolved.data_types.source
    ));
    out.push_str(&format!(
        "  Data layouts:     {} [{}]\n",
        enabled_tokens::<DataLayout>(&inputs.features.data_layouts),
        resolved.data_layouts.source
    ));
    out.push_str(&format!(
        "  Assembler cutoff: {} [{}]\n",
        inputs.policy.integrated_as_cutoff, resolved.policy.source
    ));

    out.push('\n');
    if issues.is_empty() {
        out.push_str("No issues.\n");
    } else {
        for issue in issues {
            out.push_str(&format!("warning: {issue}\n"));
        }
    }
    out
}
