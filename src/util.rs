//! Input decoding helpers.

use std::borrow::Cow;

/// Decode source bytes to a string.
///
/// Kodeks exports are UTF-8, but older tooling wrote Windows-1252 files with
/// or without an XML declaration saying so. Decoding order:
/// 1. UTF-8 (a BOM is stripped by encoding_rs)
/// 2. The hint encoding, usually from `<?xml encoding="..."?>`
/// 3. Windows-1252
///
/// Returns `Cow::Borrowed` when the input is already valid UTF-8 without a BOM.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        log::debug!("input is not UTF-8, decoding as {}", encoding.name());
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    log::debug!("input is not UTF-8, falling back to windows-1252");
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the encoding label from an XML declaration.
///
/// Only the first 100 bytes are inspected.
pub fn extract_xml_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(100);
    let prefix = &bytes[..check_len];

    let xml_start = prefix.windows(5).position(|w| w == b"<?xml")?;
    let after_xml = &prefix[xml_start..];

    let enc_pos = after_xml
        .windows(9)
        .position(|w| w.eq_ignore_ascii_case(b"encoding="))?;
    let after_enc = &after_xml[enc_pos + 9..];

    let (&quote, rest) = after_enc.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }

    let value_end = rest.iter().position(|&b| b == quote)?;
    std::str::from_utf8(&rest[..value_end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8_is_borrowed() {
        let text = decode_text("<P>Статья 1</P>".as_bytes(), None);
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(text, "<P>Статья 1</P>");
    }

    #[test]
    fn test_decode_strips_bom() {
        let text = decode_text(b"\xEF\xBB\xBF<P/>", None);
        assert_eq!(text, "<P/>");
    }

    #[test]
    fn test_decode_uses_hint() {
        // "Да" in windows-1251
        let bytes = b"<P>\xC4\xE0</P>";
        assert_eq!(decode_text(bytes, Some("windows-1251")), "<P>Да</P>");
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        let bytes = b"caf\xE9";
        assert_eq!(decode_text(bytes, None), "café");
        assert_eq!(decode_text(bytes, Some("no-such-encoding")), "café");
    }

    #[test]
    fn test_extract_xml_encoding() {
        assert_eq!(
            extract_xml_encoding(br#"<?xml version="1.0" encoding="windows-1251"?><TEXT/>"#),
            Some("windows-1251")
        );
        assert_eq!(
            extract_xml_encoding(b"<?xml version='1.0' ENCODING='utf-8'?>"),
            Some("utf-8")
        );
        assert_eq!(extract_xml_encoding(b"<?xml version=\"1.0\"?>"), None);
        assert_eq!(extract_xml_encoding(b"<TEXT/>"), None);
        assert_eq!(extract_xml_encoding(b"<?xml encoding="), None);
    }
}
