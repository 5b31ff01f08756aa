//! Regional formatting for dates and phone numbers.
//!
//! Dates come from the editor as `YYYY`, `YYYY-MM` or `YYYY-MM-DD`. Anything
//! else is passed through untouched (the caller still escapes it).

use chrono::NaiveDate;

use crate::models::document::Locale;

/// Label for the open end of a current role.
pub const PRESENT: &str = "Present";

/// Formats an editor date for `locale`. Unparseable input is returned as-is.
pub fn format_date(raw: &str, locale: Locale) -> String {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return match locale {
            Locale::EnIe | Locale::EnGb => date.format("%d/%m/%Y").to_string(),
            Locale::EnUs => date.format("%m/%d/%Y").to_string(),
        };
    }
    // chrono needs a day to build a NaiveDate; pin it to the 1st.
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return date.format("%m/%Y").to_string();
    }
    raw.to_string()
}

/// `start – end` for a dated entry. A missing end on a current entry reads "Present";
/// a missing end otherwise leaves just the start.
pub fn format_range(start: Option<&str>, end: Option<&str>, current: bool, locale: Locale) -> String {
    let start = start.map(str::trim).filter(|s| !s.is_empty());
    let end = if current {
        Some(PRESENT.to_string())
    } else {
        end.map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|e| format_date(e, locale))
    };

    match (start, end) {
        (Some(s), Some(e)) => format!("{} – {}", format_date(s, locale), e),
        (Some(s), None) => format_date(s, locale),
        (None, Some(e)) => e,
        (None, None) => String::new(),
    }
}

/// Normalizes a phone number to `+353 XX XXX XXXX` for the Irish locale when it
/// is a recognizable 9-digit Irish number. Everything else passes through.
pub fn format_phone(raw: &str, locale: Locale) -> String {
    if locale != Locale::EnIe {
        return raw.to_string();
    }
    match irish_national_digits(raw) {
        Some(d) => format!("+353 {} {} {}", &d[0..2], &d[2..5], &d[5..9]),
        None => raw.to_string(),
    }
}

/// The 9 national digits (without trunk `0`) of an Irish number, if `raw` is one.
fn irish_national_digits(raw: &str) -> Option<String> {
    let compact: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
        .collect();

    let national = if let Some(rest) = compact.strip_prefix("+353") {
        rest.strip_prefix('0').unwrap_or(rest)
    } else if let Some(rest) = compact.strip_prefix("00353") {
        rest.strip_prefix('0').unwrap_or(rest)
    } else if let Some(rest) = compact.strip_prefix('0') {
        rest
    } else {
        return None;
    };

    if national.len() == 9 && national.chars().all(|c| c.is_ascii_digit()) {
        Some(national.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irish_full_date_is_day_first() {
        assert_eq!(format_date("2021-03-15", Locale::EnIe), "15/03/2021");
        assert_eq!(format_date("2021-03-15", Locale::EnGb), "15/03/2021");
    }

    #[test]
    fn test_us_full_date_is_month_first() {
        assert_eq!(format_date("2021-03-15", Locale::EnUs), "03/15/2021");
    }

    #[test]
    fn test_month_precision() {
        assert_eq!(format_date("2019-09", Locale::EnIe), "09/2019");
        assert_eq!(format_date("2019-09", Locale::EnUs), "09/2019");
    }

    #[test]
    fn test_unparseable_date_passes_through() {
        assert_eq!(format_date("Summer 2018", Locale::EnIe), "Summer 2018");
        assert_eq!(format_date("2018", Locale::EnIe), "2018");
    }

    #[test]
    fn test_range_current_reads_present() {
        assert_eq!(
            format_range(Some("2020-01"), Some("2022-01"), true, Locale::EnIe),
            "01/2020 – Present"
        );
        assert_eq!(
            format_range(Some("2020-01"), Some("2022-06"), false, Locale::EnIe),
            "01/2020 – 06/2022"
        );
        assert_eq!(format_range(Some("2020-01"), None, false, Locale::EnIe), "01/2020");
        assert_eq!(format_range(None, None, false, Locale::EnIe), "");
    }

    #[test]
    fn test_irish_mobile_variants_normalize() {
        for raw in [
            "087 123 4567",
            "0871234567",
            "+353 87 123 4567",
            "+353871234567",
            "+353 (0)87 123 4567",
            "00353 87 123 4567",
            "087-123-4567",
        ] {
            assert_eq!(format_phone(raw, Locale::EnIe), "+353 87 123 4567", "input {raw}");
        }
    }

    #[test]
    fn test_unrecognized_phone_passes_through() {
        assert_eq!(format_phone("01 234 5678", Locale::EnIe), "01 234 5678");
        assert_eq!(format_phone("+44 20 7946 0958", Locale::EnIe), "+44 20 7946 0958");
        assert_eq!(format_phone("call me", Locale::EnIe), "call me");
    }

    #[test]
    fn test_phone_untouched_outside_irish_locale() {
        assert_eq!(format_phone("087 123 4567", Locale::EnUs), "087 123 4567");
    }
}
