//! Textual size boundary: the only place the `"Length: .. Width: .. Height: .."`
//! encoding is produced or consumed. Everything past this module works with the
//! structured [`SizeTriple`].

use crate::{model::DIMENSION_MAX, AppError, AppResult, SizeTriple};

const LABELS: [&str; 3] = ["Length", "Width", "Height"];

fn is_labelled(token: &str) -> bool {
    LABELS
        .iter()
        .any(|label| token.strip_prefix(label).and_then(|r| r.strip_prefix(':')).is_some())
}

/// Parse a free-text size string into a structured triple.
///
/// Accepts space-separated `Label: value` tokens where the value may share
/// the label's token (`Length:12`) or follow it (`Length: 12`). Unknown
/// tokens are ignored, missing labels stay absent. Never fails: malformed
/// input yields an all-empty triple.
pub fn parse(text: &str) -> SizeTriple {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut triple = SizeTriple::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        i += 1;
        let Some((label, rest)) = token.split_once(':') else {
            continue;
        };
        let field = match label {
            "Length" => &mut triple.length,
            "Width" => &mut triple.width,
            "Height" => &mut triple.height,
            _ => continue,
        };
        let value = if !rest.is_empty() {
            rest.to_string()
        } else if i < tokens.len() && !is_labelled(tokens[i]) {
            let next = tokens[i].to_string();
            i += 1;
            next
        } else {
            continue;
        };
        if !value.is_empty() {
            *field = Some(value);
        }
    }
    triple
}

/// Format a triple back to its textual form, restricted to present fields,
/// order-stable (length, width, height). `parse(format(t)) == t`.
pub fn format(triple: &SizeTriple) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (label, value) in [
        ("Length", &triple.length),
        ("Width", &triple.width),
        ("Height", &triple.height),
    ] {
        if let Some(value) = value {
            if !value.is_empty() {
                parts.push(format!("{label}: {value}"));
            }
        }
    }
    parts.join(" ")
}

/// Validate one dimension value: a non-negative decimal no greater than
/// [`DIMENSION_MAX`]. Applied by callers before a triple is formatted or
/// persisted; absence is always valid and never reaches this function.
pub fn validate_dimension(field: &str, value: &str) -> AppResult<()> {
    let parsed: f64 = value.parse().map_err(|_| {
        AppError::new("VALIDATION/SIZE", "Dimension is not a number")
            .with_context("field", field.to_string())
            .with_context("value", value.to_string())
    })?;
    if !parsed.is_finite() || parsed < 0.0 || parsed > DIMENSION_MAX {
        return Err(
            AppError::new("VALIDATION/SIZE", "Dimension out of range [0, 99999.99]")
                .with_context("field", field.to_string())
                .with_context("value", value.to_string()),
        );
    }
    Ok(())
}

/// Validate every present field of a triple.
pub fn validate(triple: &SizeTriple) -> AppResult<()> {
    for (field, value) in [
        ("length", &triple.length),
        ("width", &triple.width),
        ("height", &triple.height),
    ] {
        if let Some(value) = value {
            validate_dimension(field, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spaced_labels() {
        let triple = parse("Length: 10 Width: 4.5 Height: 3");
        assert_eq!(triple.length.as_deref(), Some("10"));
        assert_eq!(triple.width.as_deref(), Some("4.5"));
        assert_eq!(triple.height.as_deref(), Some("3"));
    }

    #[test]
    fn parses_inline_labels() {
        let triple = parse("Length:10 Height:3");
        assert_eq!(triple.length.as_deref(), Some("10"));
        assert_eq!(triple.width, None);
        assert_eq!(triple.height.as_deref(), Some("3"));
    }

    #[test]
    fn ignores_unknown_tokens_and_never_fails() {
        let triple = parse("Depth: 9 approx Width: 2 ???");
        assert_eq!(triple.width.as_deref(), Some("2"));
        assert_eq!(triple.length, None);
        assert!(parse("").is_empty());
        assert!(parse("no sizes here").is_empty());
    }

    #[test]
    fn adjacent_labels_leave_field_absent() {
        // "Length:" directly followed by another label has no value.
        let triple = parse("Length: Width: 2");
        assert_eq!(triple.length, None);
        assert_eq!(triple.width.as_deref(), Some("2"));
    }

    #[test]
    fn format_restricts_to_present_fields() {
        let triple = SizeTriple {
            length: Some("10".into()),
            width: None,
            height: Some("3".into()),
        };
        assert_eq!(format(&triple), "Length: 10 Height: 3");
        assert_eq!(format(&SizeTriple::default()), "");
    }

    #[test]
    fn round_trips_partial_triples() {
        for triple in [
            SizeTriple::default(),
            SizeTriple {
                width: Some("4.5".into()),
                ..Default::default()
            },
            SizeTriple {
                length: Some("10".into()),
                width: Some("4.5".into()),
                height: Some("3".into()),
            },
        ] {
            assert_eq!(parse(&format(&triple)), triple);
        }
    }

    #[test]
    fn dimension_bounds() {
        assert!(validate_dimension("length", "99999.99").is_ok());
        assert!(validate_dimension("length", "0").is_ok());
        let err = validate_dimension("length", "100000").unwrap_err();
        assert_eq!(err.code(), "VALIDATION/SIZE");
        assert!(validate_dimension("width", "-1").is_err());
        assert!(validate_dimension("width", "ten").is_err());
    }
}
