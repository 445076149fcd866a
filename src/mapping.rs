//! Maps Kodeks source tags to output elements.
//!
//! [`map_element`] is total: every source tag produces at least one output
//! element. Tags without a rule keep their name and attributes.

use crate::dom::Attributes;

/// Output element that receives inline image data.
pub const IMAGE_TAG: &str = "img";

/// Output element wrapping [`IMAGE_TAG`].
pub const PICTURE_TAG: &str = "picture";

/// Scheme prefix for cross-document links.
const LINK_PREFIX: &str = "kodeks://link/d";

/// Output element to open, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    pub name: String,
    pub attrs: Attributes,
}

impl ElementSpec {
    pub fn new(name: impl Into<String>, attrs: Attributes) -> Self {
        Self {
            name: name.into(),
            attrs,
        }
    }

    fn with_class(name: &str, class: &str) -> Self {
        Self::new(name, Attributes::new().with("class", class))
    }
}

/// Result of mapping one source element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    /// Elements to open in sequence, each nested in the previous one.
    pub elements: Vec<ElementSpec>,
    /// Text appended to the innermost element right after it is opened.
    pub text: Option<String>,
    /// The innermost element receives inline image data instead of text.
    pub embeds_image: bool,
}

impl Mapping {
    fn single(element: ElementSpec) -> Self {
        Self {
            elements: vec![element],
            text: None,
            embeds_image: false,
        }
    }
}

/// Zero-based counter for `data-pid` on paragraphs.
///
/// One counter belongs to one conversion, so separate conversions never
/// share numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphCounter {
    next: u64,
}

impl ParagraphCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current value and advance.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn count(&self) -> u64 {
        self.next
    }
}

/// Map a source element to the output elements that replace it.
pub fn map_element(name: &str, attrs: Attributes, paragraphs: &mut ParagraphCounter) -> Mapping {
    match name {
        "EXTERNAL" => {
            let href = format!(
                "{LINK_PREFIX}?nd={}&mark={}",
                attrs.get("ND").unwrap_or_default(),
                attrs.get("CONTEXT").unwrap_or_default()
            );
            Mapping::single(ElementSpec::new("a", Attributes::new().with("href", href)))
        }

        "CHAPMARK" => {
            let mut class = format!("T{} ", attrs.get("LEVEL").unwrap_or_default());
            if attrs.get("HIDDEN").is_some_and(is_hidden) {
                class.push_str("p-hidden");
            }

            let mut out = Attributes::new();
            if let Some(marker) = attrs.get("MARKER") {
                out.set("id", marker);
            }
            out.set("class", class);

            Mapping {
                elements: vec![ElementSpec::new("p", out)],
                text: attrs.get("STRING").map(str::to_string),
                embeds_image: false,
            }
        }

        "P" => {
            let class = [
                attrs.get("CLASS").map(str::to_string),
                attrs.get("ALIGN").map(|align| format!("p-{align}")),
            ]
            .into_iter()
            .flatten()
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

            let mut out = Attributes::new();
            if !class.is_empty() {
                out.set("class", class);
            }
            out.set("data-pid", paragraphs.next_id().to_string());
            Mapping::single(ElementSpec::new("p", out))
        }

        // Character styles
        "U" => Mapping::single(ElementSpec::with_class("span", "s-underline")),
        "STRIKE" => Mapping::single(ElementSpec::with_class("span", "s-strike")),
        "FONT" => Mapping::single(ElementSpec::with_class("span", "s-color")),
        "I" => Mapping::single(ElementSpec::with_class("span", "s-italic")),
        "B" => Mapping::single(ElementSpec::with_class("span", "s-bold")),

        // Embedded image: data arrives as text and becomes `src` on close
        "PICTURE" => Mapping {
            elements: vec![
                ElementSpec::new(PICTURE_TAG, Attributes::new()),
                ElementSpec::new(IMAGE_TAG, Attributes::new()),
            ],
            text: None,
            embeds_image: true,
        },

        _ => Mapping::single(ElementSpec::new(name, attrs)),
    }
}

/// `HIDDEN` is compared numerically, so `"1"`, `" 1"` and `"01"` all hide.
fn is_hidden(value: &str) -> bool {
    value.trim().parse::<i64>() == Ok(1)
}
