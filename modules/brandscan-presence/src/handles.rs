use std::collections::HashSet;

/// Derive the canonical handle variants platforms are probed with.
/// Normalizes (lowercase, trim), splits on separators, and emits exact,
/// dotted, concatenated, and underscored forms — deduplicated in
/// generation order, exact form first.
pub fn generate_handles(handle: &str) -> Vec<String> {
    let exact = handle.trim().to_lowercase();

    let parts: Vec<&str> = exact
        .split(|c: char| matches!(c, '-' | '.' | '_') || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    let candidates = [
        exact.clone(),
        parts.join("."),
        parts.join(""),
        parts.join("_"),
    ];

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|h| !h.is_empty() && seen.insert(h.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphenated_handle_yields_four_variants() {
        let handles = generate_handles("Willow-Leather");
        assert_eq!(
            handles,
            vec![
                "willow-leather",
                "willow.leather",
                "willowleather",
                "willow_leather"
            ]
        );
    }

    #[test]
    fn exact_form_is_always_first() {
        let handles = generate_handles("  Acme.Shop ");
        assert_eq!(handles[0], "acme.shop");
    }

    #[test]
    fn single_word_collapses_to_one_variant() {
        // All four forms are identical for a separator-free handle.
        assert_eq!(generate_handles("acme"), vec!["acme"]);
    }

    #[test]
    fn no_duplicates_for_any_input() {
        for input in ["a-b", "a_b", "a.b", "a b", "plain", "Tri-Part-Name"] {
            let handles = generate_handles(input);
            let unique: HashSet<_> = handles.iter().collect();
            assert_eq!(unique.len(), handles.len(), "duplicates for {input}");
        }
    }

    #[test]
    fn whitespace_separates_words() {
        let handles = generate_handles("The Corner Cafe");
        assert!(handles.contains(&"thecornercafe".to_string()));
        assert!(handles.contains(&"the_corner_cafe".to_string()));
    }
}
