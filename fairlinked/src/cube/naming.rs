//! Identifier slugs and output file stems.

use rand::Rng;

/// Makes `value` safe for an IRI local name and a file name.
///
/// ASCII letters, digits, `-` and `_` are kept; runs of anything else become
/// a single `_`.
#[must_use]
pub fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_sep = false;
    for c in value.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    if out.is_empty() {
        out.push('_');
    }
    out
}

/// File naming convention of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// `{prefix}_{key}_{timestamp}`.
    Standard,
    /// `{letter}-{prefix}-{key}-{timestamp}`, hyphens only.
    Cradle,
}

impl Naming {
    /// File stem (no extension) for one artifact.
    pub fn stem<R: Rng>(self, prefix: &str, key: &str, timestamp: &str, rng: &mut R) -> String {
        match self {
            Naming::Standard => format!("{prefix}_{key}_{timestamp}"),
            Naming::Cradle => {
                let letter = char::from(rng.random_range(b'a'..=b'z'));
                format!("{letter}-{prefix}-{key}-{timestamp}").replace('_', "-")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_unsafe_runs() {
        assert_eq!(slug("EXP 001/a"), "EXP_001_a");
        assert_eq!(slug("  Temp (C) "), "Temp_C");
        assert_eq!(slug("///"), "_");
    }

    #[test]
    fn cradle_stems_are_letter_prefixed_and_hyphenated() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let stem = Naming::Cradle.stem("mds", "EXP_001", "20250128120000", &mut rng);
            let bytes = stem.as_bytes();
            assert!(bytes[0].is_ascii_lowercase(), "{stem}");
            assert_eq!(bytes[1], b'-');
            assert!(!stem.contains('_'));
            assert!(stem.ends_with("-mds-EXP-001-20250128120000"));
        }
    }

    #[test]
    fn standard_stem_uses_underscores() {
        let stem = Naming::Standard.stem("mds", "EXP001", "20250128120000", &mut rand::rng());
        assert_eq!(stem, "mds_EXP001_20250128120000");
    }
}
