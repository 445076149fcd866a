//! Accumulation of inline image data.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Collects the text chunks of the open image element.
///
/// Images do not nest, so one buffer serves the whole conversion. The source
/// already carries base64 text; nothing is encoded or decoded here.
#[derive(Debug, Default)]
pub struct PictureAccumulator {
    buf: String,
}

impl PictureAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop anything left over and start a new image.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    pub fn accumulate(&mut self, chunk: &str) {
        self.buf.push_str(chunk);
    }

    /// Take the collected text and leave the buffer empty.
    pub fn finalize(&mut self) -> String {
        std::mem::take(&mut self.buf)
    }
}

/// Build a `data:` URI from an accumulated base64 payload.
///
/// Line breaks and other ASCII whitespace from wrapped payloads are removed.
/// A payload that does not decode is still embedded, with a warning.
pub fn data_uri(media_type: &str, payload: &str) -> String {
    let payload: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if let Err(e) = STANDARD.decode(&payload) {
        log::warn!("image payload is not valid base64 ({e}), embedding as is");
    }

    format!("data:{media_type};base64,{payload}")
}
