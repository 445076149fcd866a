//! Text-level cleanup of the serialized document.

use std::borrow::Cow;

/// Remove every `<wrapper ...>`, `</wrapper>` and `<wrapper .../>` tag from
/// `text`, whatever attributes the open tag carries.
///
/// Text and attribute values are escaped by the serializer, so a literal `<`
/// always starts a real tag and `>` always ends one. Removal never creates a
/// new match; running this twice is the same as running it once.
pub fn strip_wrapper<'a>(text: &'a str, wrapper: &str) -> Cow<'a, str> {
    let mut out = String::new();
    let mut copied = 0;
    let mut search = 0;
    let mut removed = false;

    while let Some(offset) = text[search..].find('<') {
        let start = search + offset;
        match wrapper_tag_len(&text[start..], wrapper) {
            Some(len) => {
                out.push_str(&text[copied..start]);
                copied = start + len;
                search = copied;
                removed = true;
            }
            None => search = start + 1,
        }
    }

    if !removed {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[copied..]);
    Cow::Owned(out)
}

/// Length of the wrapper tag at the start of `s`, if there is one.
fn wrapper_tag_len(s: &str, wrapper: &str) -> Option<usize> {
    let after_lt = s.strip_prefix('<')?;
    let name = after_lt.strip_prefix('/').unwrap_or(after_lt);
    let rest = name.strip_prefix(wrapper)?;

    match rest.chars().next()? {
        '>' | '/' => {}
        c if c.is_ascii_whitespace() => {}
        _ => return None,
    }

    s.find('>').map(|end| end + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strip_wrapper() {
        let text = "<document><p>x</p><style>a{}</style></document>";
        assert_eq!(
            strip_wrapper(text, "document"),
            "<p>x</p><style>a{}</style>"
        );
    }

    #[test]
    fn test_strip_empty_wrapper() {
        assert_eq!(strip_wrapper("<document/>", "document"), "");
    }

    #[test]
    fn test_strip_leaves_similar_tags() {
        let text = "<documents><document-x/></documents>";
        assert!(matches!(strip_wrapper(text, "document"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_wrapper_with_attributes() {
        let text = r#"<TEXT><document id="d1">x</document><document a="1"/></TEXT>"#;
        assert_eq!(strip_wrapper(text, "document"), "<TEXT>x</TEXT>");
    }

    #[test]
    fn test_strip_every_occurrence() {
        let text = "<w>a</w><w>b</w>";
        assert_eq!(strip_wrapper(text, "w"), "ab");
    }

    proptest! {
        #[test]
        fn prop_strip_is_idempotent(
            parts in prop::collection::vec(
                prop::sample::select(vec![
                    "<document>", "</document>", "<document/>", "<p>", "</p>",
                    r#"<document id="d1">"#, "<documents>",
                    "text", "&lt;document&gt;", " ",
                ]),
                0..24,
            )
        ) {
            let text = parts.concat();
            let once = strip_wrapper(&text, "document").into_owned();
            let twice = strip_wrapper(&once, "document").into_owned();
            for tag in ["<document>", "<document ", "<document/", "</document>"] {
                prop_assert!(!once.contains(tag), "{} left in {:?}", tag, once);
            }
            prop_assert_eq!(once, twice);
        }
    }
}
