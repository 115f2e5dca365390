use crate::domain::model::DeviceRecord;
use crate::utils::error::{FnOrderError, Result};
use encoding_rs::WINDOWS_1251;
use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;

lazy_static! {
    static ref RE_INN: Regex = Regex::new(r"^\s*INN\s+(\d+)\s*$").unwrap();
    static ref RE_ORG: Regex = Regex::new(r"^\s*ORG\s+(.+?)\s*$").unwrap();
    static ref RE_ADR: Regex = Regex::new(r"^\s*ADR\s+(.+?)\s*$").unwrap();
    static ref RE_ZN: Regex = Regex::new(r"^\s*ZN\s+(\S+)\s*$").unwrap();
    static ref RE_SROK: Regex = Regex::new(r"^\s*SROK\s+(\S+)\s*$").unwrap();
}

/// Encoding that ended up decoding a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Windows1251,
    Utf8Lossy,
}

/// Byte left unassigned by the Windows-1251 code page. The WHATWG mapping
/// used by `encoding_rs` still decodes it to U+0098, so it is rejected here.
const CP1251_UNDEFINED: u8 = 0x98;

/// Decodes bytes as UTF-8, then Windows-1251, then UTF-8 with replacement
/// characters. Never fails.
pub fn decode(bytes: &[u8]) -> (Cow<'_, str>, TextEncoding) {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return (Cow::Borrowed(text), TextEncoding::Utf8);
    }

    if !bytes.contains(&CP1251_UNDEFINED) {
        if let Some(text) = WINDOWS_1251.decode_without_bom_handling_and_without_replacement(bytes)
        {
            return (text, TextEncoding::Windows1251);
        }
    }

    (String::from_utf8_lossy(bytes), TextEncoding::Utf8Lossy)
}

/// Applies the line patterns to `text`. A later line of the same kind
/// replaces an earlier one.
pub fn parse_text(path: &Path, text: &str) -> DeviceRecord {
    let mut record = DeviceRecord::empty(path);

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = RE_INN.captures(line) {
            record.inn = caps[1].to_string();
        } else if let Some(caps) = RE_ORG.captures(line) {
            record.org = caps[1].replace('"', "").to_uppercase();
        } else if let Some(caps) = RE_ADR.captures(line) {
            record.adr = caps[1].to_string();
        } else if let Some(caps) = RE_ZN.captures(line) {
            record.zn = caps[1].to_string();
        } else if let Some(caps) = RE_SROK.captures(line) {
            record.srok = caps[1].to_string();
        }
    }

    record
}

/// Reads one export file and extracts its record.
pub fn parse_file(path: &Path) -> Result<DeviceRecord> {
    let bytes = std::fs::read(path).map_err(|source| FnOrderError::ExtractionError {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, encoding) = decode(&bytes);
    if encoding != TextEncoding::Utf8 {
        tracing::debug!("Decoded {} as {:?}", path.display(), encoding);
    }

    Ok(parse_text(path, &text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{NO_ADR, NO_INN, NO_ORG, NO_PREFIX, NO_SROK, NO_ZN};
    use tempfile::TempDir;

    const FULL: &str = "INN 5902000000\nORG \"Ромашка\"\nADR Пермь, Ленина 60\nZN 7281440500123456\nSROK 25.11.2025\n";

    #[test]
    fn test_parse_all_fields() {
        let record = parse_text(Path::new("/data/pm1_kassir1_25.11.2025_1.txt"), FULL);

        assert_eq!(record.inn, "5902000000");
        assert_eq!(record.org, "РОМАШКА");
        assert_eq!(record.adr, "Пермь, Ленина 60");
        assert_eq!(record.zn, "7281440500123456");
        assert_eq!(record.srok, "25.11.2025");
        assert_eq!(record.prefix, "PM");
        assert_eq!(record.path, Path::new("/data/pm1_kassir1_25.11.2025_1.txt"));
    }

    #[test]
    fn test_no_matching_lines_keeps_sentinels() {
        let record = parse_text(
            Path::new("kh1_x_11.2025_001.txt"),
            "hello\n\n   \ninn 123\nORG\nZN\n",
        );

        assert_eq!(record.inn, NO_INN);
        assert_eq!(record.org, NO_ORG);
        assert_eq!(record.zn, NO_ZN);
        assert_eq!(record.adr, NO_ADR);
        assert_eq!(record.srok, NO_SROK);
        assert_eq!(record.prefix, "KH");
    }

    #[test]
    fn test_last_occurrence_wins() {
        let record = parse_text(
            Path::new("KH1.txt"),
            "ADR first\nINN 1\nADR second\nINN 2\n",
        );
        assert_eq!(record.adr, "second");
        assert_eq!(record.inn, "2");
    }

    #[test]
    fn test_lines_are_trimmed_and_case_sensitive() {
        let record = parse_text(
            Path::new("KH1.txt"),
            "   INN   123  \r\n\tZN  ABC-1 \r\nZn 999\nINN 12a\n",
        );
        assert_eq!(record.inn, "123");
        assert_eq!(record.zn, "ABC-1");
    }

    #[test]
    fn test_serial_with_spaces_is_ignored() {
        let record = parse_text(Path::new("KH1.txt"), "ZN 123 456\n");
        assert_eq!(record.zn, NO_ZN);
    }

    #[test]
    fn test_prefix_from_short_and_empty_names() {
        assert_eq!(parse_text(Path::new("a"), "").prefix, "A");
        assert_eq!(parse_text(Path::new(""), "").prefix, NO_PREFIX);
    }

    #[test]
    fn test_decode_utf8() {
        let (text, encoding) = decode("ADR Пермь".as_bytes());
        assert_eq!(text, "ADR Пермь");
        assert_eq!(encoding, TextEncoding::Utf8);
    }

    #[test]
    fn test_decode_windows_1251() {
        let (bytes, _, _) = WINDOWS_1251.encode("ORG \"Ромашка\"");
        let (text, encoding) = decode(&bytes);
        assert_eq!(text, "ORG \"Ромашка\"");
        assert_eq!(encoding, TextEncoding::Windows1251);
    }

    #[test]
    fn test_decode_undefined_cp1251_byte_falls_back_to_lossy() {
        let (text, encoding) = decode(&[0x98, 0xC0, 0xC1]);
        assert_eq!(encoding, TextEncoding::Utf8Lossy);
        assert!(text.contains('\u{FFFD}'));
        assert!(!text.contains('\u{98}'));
    }

    #[test]
    fn test_parse_file_windows_1251() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("KH1_kassir3_08.11.2025_0642.txt");
        let (bytes, _, _) = WINDOWS_1251.encode(FULL);
        std::fs::write(&path, &bytes).unwrap();

        let record = parse_file(&path).unwrap();
        assert_eq!(record.org, "РОМАШКА");
        assert_eq!(record.adr, "Пермь, Ленина 60");
        assert_eq!(record.prefix, "KH");
    }

    #[test]
    fn test_parse_missing_file_is_error() {
        let err = parse_file(Path::new("/nonexistent/KH1_x_08.11.2025_1.txt")).unwrap_err();
        assert!(matches!(err, FnOrderError::ExtractionError { .. }));
    }
}
