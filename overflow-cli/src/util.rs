use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Comma-separated pulls-per-patch averages.
pub fn parse_rates(s: &str) -> Result<Vec<f64>> {
    split_csv(s)
        .iter()
        .map(|token| {
            let value: f64 = token
                .parse()
                .with_context(|| format!("invalid pull rate '{token}'"))?;
            if !value.is_finite() || value < 0.0 {
                bail!("pull rate must be a non-negative number (got {token})");
            }
            Ok(value)
        })
        .collect()
}

/// `Name=level` pairs; level `-1` marks a member as not owned.
pub fn parse_copies(s: &str) -> Result<BTreeMap<String, i32>> {
    let mut copies = BTreeMap::new();
    for token in split_csv(s) {
        let Some((name, level)) = token.split_once('=') else {
            bail!("expected Name=level, got '{token}'");
        };
        let level: i32 = level
            .trim()
            .parse()
            .with_context(|| format!("invalid level for {}", name.trim()))?;
        if !(-1..=6).contains(&level) {
            bail!("level for {} must be between -1 and 6 (got {level})", name.trim());
        }
        let name = name.trim();
        if copies.keys().any(|seen: &String| seen.eq_ignore_ascii_case(name)) {
            bail!("{name} is listed more than once");
        }
        copies.insert(name.to_string(), level);
    }
    Ok(copies)
}
