//! Slug derivation for company page URLs.
//!
//! A company's public page lives at `/entreprise/{slug}`, where the slug is
//! derived deterministically from the display name. The derivation is pure
//! and locale-independent: it folds a fixed accented-character set rather
//! than relying on Unicode normalization, so the same input always yields
//! the same slug on every host.

/// Accented characters folded to their unaccented ASCII equivalent, plus a
/// handful of separators folded to `-`. The two tables are index-aligned.
const FOLD_FROM: &str = "àáäâèéëêìíïîòóöôùúüûñç·/_,:;";
const FOLD_TO: &str = "aaaaeeeeiiiioooouuuunc------";

/// Derive a URL-safe slug from a display name.
///
/// Steps, in order: trim, lowercase, fold the fixed accent/separator table,
/// strip everything outside `[a-z0-9 -]`, then collapse runs of whitespace
/// and runs of `-` to a single `-`.
///
/// Re-applying `slugify` to an already-valid slug is a no-op.
///
/// # Examples
///
/// ```
/// use quartier_core::slugify;
///
/// assert_eq!(slugify("Café de l'Érable"), "cafe-de-lerable");
/// assert_eq!(slugify("cafe-de-lerable"), "cafe-de-lerable");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let lowered = name.trim().to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    for c in lowered.chars() {
        let folded = FOLD_FROM
            .chars()
            .position(|f| f == c)
            .and_then(|i| FOLD_TO.chars().nth(i))
            .unwrap_or(c);

        if folded == '-' || folded.is_whitespace() {
            // Mixed runs of whitespace and dashes collapse to one dash.
            if !slug.is_empty() || folded == '-' {
                pending_dash = true;
            }
            continue;
        }

        if folded.is_ascii_lowercase() || folded.is_ascii_digit() {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(folded);
        }
        // Anything else is outside [a-z0-9 -] and is stripped.
    }

    if pending_dash {
        slug.push('-');
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_alphabet() {
        let inputs = [
            "Café de l'Érable",
            "  Boutique  du  Nord  ",
            "A/B_C,D:E;F·G",
            "Ñandú & Çedille!!",
            "官话 latin 2000",
        ];
        for input in inputs {
            let slug = slugify(input);
            assert!(
                slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "slug {slug:?} for {input:?} contains invalid characters"
            );
        }
    }

    #[test]
    fn test_accent_folding() {
        assert_eq!(slugify("Café de l'Érable"), "cafe-de-lerable");
        assert_eq!(slugify("Crèmerie Îlot"), "cremerie-ilot");
        assert_eq!(slugify("Señor Piñata"), "senor-pinata");
        assert_eq!(slugify("Ça roule"), "ca-roule");
    }

    #[test]
    fn test_separator_folding() {
        assert_eq!(slugify("a/b_c,d:e;f·g"), "a-b-c-d-e-f-g");
    }

    #[test]
    fn test_whitespace_and_dash_collapse() {
        assert_eq!(slugify("  Boutique   du \t Nord  "), "boutique-du-nord");
        assert_eq!(slugify("a --  - b"), "a-b");
    }

    #[test]
    fn test_invalid_chars_stripped() {
        assert_eq!(slugify("L'Atelier (2e étage)"), "latelier-2e-etage");
        assert_eq!(slugify("100% Bio"), "100-bio");
    }

    #[test]
    fn test_valid_slug_is_fixed_point() {
        for slug in ["cafe-de-lerable", "boutique-du-nord", "a-b-c", "x2000"] {
            assert_eq!(slugify(slug), slug);
        }
    }

    #[test]
    fn test_empty_and_degenerate() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }
}
