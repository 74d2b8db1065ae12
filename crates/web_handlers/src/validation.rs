use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]*>").expect("valid HTML tag pattern");
}

/// Rejects strings containing HTML tags before they reach the database.
pub fn validate_no_html(value: &str) -> Result<(), ValidationError> {
    if HTML_TAG.is_match(value) {
        return Err(ValidationError::new("contains_html"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes() {
        assert!(validate_no_html("Roaring Canyon, near Aspen").is_ok());
        assert!(validate_no_html("price < 20 a night").is_ok());
    }

    #[test]
    fn markup_is_rejected() {
        assert!(validate_no_html("<script>alert(1)</script>").is_err());
        assert!(validate_no_html("nice <b>bold</b> spot").is_err());
        assert!(validate_no_html("<img src=x onerror=alert(1)>").is_err());
    }
}
