//! Entity name normalization
//!
//! An entity's display name is normalized to a slug for use as the token
//! payload and lookup key: lowercased, with whitespace runs collapsed to a
//! single underscore. Denormalization reverses only the whitespace
//! substitution; the original casing is not recoverable.

/// Normalize a display name to its canonical slug
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Reverse the whitespace substitution of [`normalize`]
///
/// Case is not restored; callers must compare case-insensitively.
pub fn denormalize(slug: &str) -> String {
    slug.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("Ministry Of Health"), "ministry_of_health");
    }

    #[test]
    fn test_normalize_collapses_whitespace_runs() {
        assert_eq!(normalize("Ministry   Of Health"), "ministry_of_health");
        assert_eq!(normalize("  Ministry\tOf  Health  "), "ministry_of_health");
    }

    #[test]
    fn test_denormalize() {
        assert_eq!(denormalize("ministry_of_health"), "ministry of health");
    }

    #[test]
    fn test_idempotence() {
        for name in [
            "Ministry Of Health",
            "ministry   of health",
            "Already_Underscored Name",
            "single",
            "",
        ] {
            let slug = normalize(name);
            assert_eq!(normalize(&denormalize(&slug)), slug, "{name:?}");
        }
    }

    #[test]
    fn test_non_whitespace_characters_unchanged() {
        assert_eq!(normalize("Dép. Santé & Co"), "dép._santé_&_co");
    }
}
