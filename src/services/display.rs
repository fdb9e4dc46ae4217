//! Human-readable model labels.

/// Provider label for the known model families.
pub fn model_provider(name: &str) -> Option<&'static str> {
    let normalized = name.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    match strip_extension(&normalized) {
        "linear_regression" => Some("Manus"),
        "sarima" => Some("Claude"),
        _ => None,
    }
}

/// Format a raw model name plus optional metadata into a display label.
///
/// Strips a trailing `.pkl`, replaces underscores with spaces and
/// title-cases each word. A known provider is appended in parentheses, and
/// for the known families a canonical label wins over the title-cased
/// fallback. Metadata (display name, provider) takes precedence over
/// anything inferred from the name.
pub fn format_model_display_name(
    name: &str,
    display_name: Option<&str>,
    provider: Option<&str>,
) -> String {
    let provider = provider
        .filter(|p| !p.is_empty())
        .or_else(|| model_provider(name));

    let cleaned = strip_extension(name).replace('_', " ");
    let title_cased = title_case(cleaned.trim());

    let fallback = if name.is_empty() {
        String::new()
    } else {
        match provider {
            Some("Manus") => "Linear Regression".to_string(),
            Some("Claude") => "SARIMA".to_string(),
            _ => {
                if title_cased.is_empty() {
                    name.to_string()
                } else {
                    title_cased
                }
            }
        }
    };

    let base = display_name
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .or_else(|| (!fallback.is_empty()).then_some(fallback))
        .unwrap_or_else(|| "Unknown model".to_string());

    match provider {
        Some(provider) => format!("{base} ({provider})"),
        None => base,
    }
}

/// Strip a trailing `.pkl` (case-insensitive).
fn strip_extension(name: &str) -> &str {
    if name.len() >= 4 && name.is_char_boundary(name.len() - 4) {
        let (stem, suffix) = name.split_at(name.len() - 4);
        if suffix.eq_ignore_ascii_case(".pkl") {
            return stem;
        }
    }
    name
}

/// Uppercase the first letter of each word.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_word_start = true;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.push(ch);
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_families_get_canonical_labels() {
        assert_eq!(
            format_model_display_name("linear_regression.pkl", None, None),
            "Linear Regression (Manus)"
        );
        assert_eq!(
            format_model_display_name("sarima", None, None),
            "SARIMA (Claude)"
        );
    }

    #[test]
    fn test_unknown_name_is_title_cased() {
        assert_eq!(
            format_model_display_name("custom_model_v2", None, None),
            "Custom Model V2"
        );
    }

    #[test]
    fn test_empty_name_is_unknown_model() {
        assert_eq!(format_model_display_name("", None, None), "Unknown model");
    }

    #[test]
    fn test_metadata_display_name_wins() {
        assert_eq!(
            format_model_display_name("sarima", Some("Seasonal ARIMA"), None),
            "Seasonal ARIMA (Claude)"
        );
    }

    #[test]
    fn test_metadata_provider_wins_over_inference() {
        // With the provider overridden the canonical family label no longer
        // applies, so the title-cased name is used.
        assert_eq!(
            format_model_display_name("sarima", None, Some("Mistral")),
            "Sarima (Mistral)"
        );
    }

    #[test]
    fn test_provider_inference_strips_extension() {
        assert_eq!(model_provider("SARIMA.PKL"), Some("Claude"));
        assert_eq!(model_provider("prophet"), None);
        assert_eq!(model_provider(""), None);
    }
}
