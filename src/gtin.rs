//! GTIN normalization
//!
//! Two normalizers exist and they intentionally disagree:
//!
//! - [`normalize`] runs on scanned codes at query time and only widens
//!   EAN-13 codes to GTIN-14 by prefixing a single zero.
//! - [`normalize_padded`] runs on spreadsheet cells at ingestion time and
//!   left-pads anything shorter than 14 characters.
//!
//! A 12-digit UPC-A scan therefore never matches its padded register key.
//! See the `twelve_digit_scan_does_not_match_padded_key` test.

/// Width of a GTIN-14 identifier
pub const GTIN_WIDTH: usize = 14;

/// Query-time normalization of a raw scanned code.
pub fn normalize(raw: &str) -> String {
    let gtin = raw.trim();
    if gtin.chars().count() == GTIN_WIDTH - 1 {
        format!("0{gtin}")
    } else {
        gtin.to_string()
    }
}

/// Ingestion-time normalization of a spreadsheet cell.
///
/// Codes longer than [`GTIN_WIDTH`] cannot be padded and are returned trimmed.
pub fn normalize_padded(raw: &str) -> String {
    let gtin = raw.trim();
    format!("{gtin:0>width$}", width = GTIN_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefixes_thirteen_digit_codes() {
        assert_eq!(normalize("7300400192434"), "07300400192434");
        assert_eq!(normalize("  7300400192434\n"), "07300400192434");
    }

    #[test]
    fn test_normalize_passes_other_lengths_through() {
        for raw in ["", "1", "730040019243", "07300400192434", "123456789012345"] {
            assert_eq!(normalize(raw), raw, "input {raw:?} should be unchanged");
        }
        assert_eq!(normalize(" 12345 "), "12345");
    }

    #[test]
    fn test_normalize_padded_always_fourteen_wide() {
        for raw in ["1", "12345678", "730040019243", "7300400192434", "07300400192434"] {
            let padded = normalize_padded(raw);
            assert_eq!(padded.len(), GTIN_WIDTH, "input {raw:?} -> {padded:?}");
            assert!(padded.ends_with(raw));
            assert!(padded[..GTIN_WIDTH - raw.len()].chars().all(|c| c == '0'));
        }
        assert_eq!(normalize_padded(" 730040019243 "), "00730040019243");
        assert_eq!(normalize_padded(""), "00000000000000");
    }

    #[test]
    fn test_normalize_padded_leaves_overlong_codes() {
        assert_eq!(normalize_padded("123456789012345"), "123456789012345");
    }

    #[test]
    fn twelve_digit_scan_does_not_match_padded_key() {
        let scanned = "730040019243";
        assert_eq!(normalize_padded(scanned), "00730040019243");
        assert_ne!(normalize(scanned), normalize_padded(scanned));
    }
}
