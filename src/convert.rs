//! The conversion pipeline.
//!
//! Source text goes through the event source and tree builder, the stylesheet
//! is appended, the tree is rendered and the wrapper root is stripped.
//!
//! # Example
//!
//! ```
//! use kodeks_convert::Converter;
//!
//! let html = Converter::new().convert_str(r#"<TEXT><P ALIGN="center">Hi</P></TEXT>"#)?;
//! assert!(html.starts_with(r#"<TEXT><p class="p-center" data-pid="0">Hi</p></TEXT><style>"#));
//! # Ok::<(), kodeks_convert::Error>(())
//! ```

use std::fs;
use std::path::Path;

use crate::builder::TreeBuilder;
use crate::error::Result;
use crate::postprocess::strip_wrapper;
use crate::serialize::render;
use crate::source::feed;
use crate::stylesheet::inject_stylesheet;
use crate::util::{decode_text, extract_xml_encoding};

/// Configuration for a conversion.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Name of the transient root element. It holds the converted content and
    /// the stylesheet while the tree is built and is removed from the output.
    pub root_name: String,
    /// Media type written into image `data:` URIs.
    pub image_media_type: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            root_name: "document".to_string(),
            image_media_type: "image/png".to_string(),
        }
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertReport {
    /// Number of source paragraphs, i.e. the next `data-pid` value.
    pub paragraphs: u64,
    /// Number of nodes in the output tree, stylesheet and root included.
    pub nodes: usize,
    /// Size of the rendered output in bytes.
    pub bytes: usize,
}

/// Converts Kodeks markup into HTML.
///
/// Every call starts from fresh state, so one converter can be reused and
/// paragraph numbering always starts at 0.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    /// Create a converter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the converter with custom settings.
    pub fn with_config(mut self, config: ConvertConfig) -> Self {
        self.config = config;
        self
    }

    /// Convert source text.
    ///
    /// Fails with the first parse error if the source is malformed.
    pub fn convert_str(&self, input: &str) -> Result<String> {
        self.run(input).map(|(output, _)| output)
    }

    /// Convert raw source bytes, detecting their encoding.
    pub fn convert_bytes(&self, input: &[u8]) -> Result<String> {
        let text = decode_text(input, extract_xml_encoding(input));
        self.convert_str(&text)
    }

    /// Convert the file at `input` and write the result to `output`.
    ///
    /// Nothing is written unless the conversion succeeds.
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<ConvertReport> {
        let input = input.as_ref();
        let output = output.as_ref();

        let bytes = fs::read(input)?;
        log::debug!("read {} bytes from {}", bytes.len(), input.display());

        let text = decode_text(&bytes, extract_xml_encoding(&bytes));
        let (html, report) = self.run(&text)?;

        fs::write(output, html.as_bytes())?;
        log::debug!("wrote {} bytes to {}", report.bytes, output.display());
        Ok(report)
    }

    fn run(&self, input: &str) -> Result<(String, ConvertReport)> {
        let mut builder = TreeBuilder::new(&self.config.root_name, &self.config.image_media_type);
        feed(input, &mut builder);
        let paragraphs = builder.paragraph_count();

        let mut dom = builder.finish()?;
        inject_stylesheet(&mut dom);

        let rendered = render(&dom)?;
        let output = strip_wrapper(&rendered, &self.config.root_name).into_owned();

        let report = ConvertReport {
            paragraphs,
            nodes: dom.len(),
            bytes: output.len(),
        };
        log::debug!(
            "converted {} paragraphs into {} nodes",
            report.paragraphs,
            report.nodes
        );
        Ok((output, report))
    }
}

/// Convert source text with the default configuration.
pub fn convert_str(input: &str) -> Result<String> {
    Converter::new().convert_str(input)
}

/// Convert a file with the default configuration.
pub fn convert_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<ConvertReport> {
    Converter::new().convert_file(input, output)
}
