//! Event source for Kodeks markup.
//!
//! [`feed`] reads a whole document with quick-xml and pushes
//! element-start, element-end, text and error events into an [`EventSink`]
//! in document order before returning.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::dom::Attributes;
use crate::error::{ParseError, ParseErrorKind};

/// Receiver for parse events.
pub trait EventSink {
    /// Called before each event with the reader's byte offset.
    fn advance(&mut self, _position: u64) {}

    fn start_element(&mut self, name: &str, attrs: Attributes);

    fn end_element(&mut self, name: &str);

    fn text(&mut self, chunk: &str);

    fn error(&mut self, error: ParseError);
}

/// Counts of events delivered by [`feed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub elements: usize,
    pub text_chunks: usize,
    pub errors: usize,
}

/// Parse `input` and deliver every event to `sink`.
///
/// Empty elements (`<X/>`) are delivered as a start followed by an end.
/// CDATA sections and resolved entity references arrive as text. Comments,
/// processing instructions and doctypes are skipped.
///
/// The reader cannot resynchronise after a syntax error, so the first reader
/// error is delivered and the input is abandoned. Entity and attribute errors
/// are reported without stopping.
pub fn feed<S: EventSink + ?Sized>(input: &str, sink: &mut S) -> FeedStats {
    let mut reader = Reader::from_str(input);
    let config = reader.config_mut();
    config.expand_empty_elements = true;
    config.check_end_names = true;

    let mut stats = FeedStats::default();

    loop {
        let position = reader.buffer_position();
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                sink.advance(reader.error_position());
                sink.error(ParseError::new(
                    reader.error_position(),
                    ParseErrorKind::Malformed(e.to_string()),
                ));
                stats.errors += 1;
                break;
            }
        };
        sink.advance(position);

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let attrs = match read_attributes(&e) {
                    Ok(attrs) => attrs,
                    Err(msg) => {
                        sink.error(ParseError::new(
                            position,
                            ParseErrorKind::InvalidAttribute(msg),
                        ));
                        stats.errors += 1;
                        Attributes::new()
                    }
                };
                sink.start_element(&name, attrs);
                stats.elements += 1;
            }
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                sink.end_element(&name);
            }
            Event::Text(e) => {
                sink.text(&String::from_utf8_lossy(e.as_ref()));
                stats.text_chunks += 1;
            }
            Event::CData(e) => {
                sink.text(&String::from_utf8_lossy(&e));
                stats.text_chunks += 1;
            }
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                match resolve_entity(&entity) {
                    Some(resolved) => {
                        sink.text(&resolved);
                        stats.text_chunks += 1;
                    }
                    None => {
                        sink.error(ParseError::new(
                            position,
                            ParseErrorKind::UnknownEntity(entity.into_owned()),
                        ));
                        stats.errors += 1;
                    }
                }
            }
            Event::Eof => break,
            // Empty elements are expanded by the reader config; comments,
            // declarations and processing instructions carry no content.
            _ => {}
        }
    }

    log::debug!(
        "fed {} elements, {} text chunks, {} errors",
        stats.elements,
        stats.text_chunks,
        stats.errors
    );
    stats
}

/// Collect and unescape the attributes of a start tag.
fn read_attributes(e: &BytesStart<'_>) -> Result<Attributes, String> {
    let mut attrs = Attributes::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = quick_xml::escape::unescape(&raw).map_err(|e| format!("{key}: {e}"))?;
        attrs.set(key, value.into_owned());
    }
    Ok(attrs)
}

/// Resolve a predefined entity or a numeric character reference.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };

    char::from_u32(code).map(|c| c.to_string())
}
