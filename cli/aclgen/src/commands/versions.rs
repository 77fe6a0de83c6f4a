//! `aclgen versions` — print the platform version table.

use aclgen_core::{version, FlagPolicy, Release};
use anyhow::Result;

/// Print the version table under `policy`.
pub fn run(policy: FlagPolicy) -> Result<()> {
    print!("{}", render(policy));
    Ok(())
}

/// Render one row per release.
pub fn render(policy: FlagPolicy) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:<8} {:<12} {:<18} {}\n",
        "RELEASE", "ORDINAL", "IDS", "-fno-addrsig", "-no-integrated-as"
    ));
    for release in Release::ALL {
        let ids: Vec<&str> = version::entries()
            .iter()
            .filter(|(_, r)| *r == release)
            .map(|(id, _)| *id)
            .collect();
        out.push_str(&format!(
            "{:<8} {:<8} {:<12} {:<18} {}\n",
            release.code(),
            release.ordinal(),
            ids.join(", "),
            yes_no(release.lacks_addrsig()),
            yes_no(policy.needs_external_assembler(release)),
        ));
    }
    out.push_str(&format!(
        "\nIntegrated-assembler cutoff: {}\n",
        policy.integrated_as_cutoff
    ));
    out
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_release() {
        let out = render(FlagPolicy::default());
        // header + releases + blank + cutoff
        assert_eq!(out.lines().count(), Release::ALL.len() + 3);
        assert!(out.contains("R, 11"));
        assert!(out.contains("cutoff: 13"));
    }

    #[test]
    fn rows_reflect_policy() {
        let out = render(FlagPolicy {
            integrated_as_cutoff: 9,
        });
        let o_row = out.lines().find(|l| l.starts_with("O ")).unwrap();
        let p_row = out.lines().find(|l| l.starts_with("P ")).unwrap();
        assert!(o_row.trim_end().ends_with("yes"));
        assert!(p_row.trim_end().ends_with("no"));
    }

    #[test]
    fn run_succeeds() {
        assert!(run(FlagPolicy::default()).is_ok());
    }
}
