//! Incremental construction of the output tree from parse events.
//!
//! [`TreeBuilder`] receives events through [`EventSink`], maps every source
//! element with [`map_element`] and keeps a cursor on the innermost open
//! output node. A stack of open source elements records which output node
//! each one opened, so a source element that expands to several nested
//! output elements (`PICTURE`) is closed by a single end event.

mod picture;

pub use picture::{PictureAccumulator, data_uri};

use crate::dom::{Attributes, NodeId, OutputDom};
use crate::error::{ParseError, ParseErrorKind};
use crate::mapping::{ParagraphCounter, map_element};
use crate::source::EventSink;

/// A source element whose end event has not arrived yet.
#[derive(Debug)]
struct OpenElement {
    name: String,
    /// Outermost output node created for this element, or `None` when the
    /// element sits inside an open image and produced no output.
    outer: Option<NodeId>,
}

/// Builds an [`OutputDom`] from a stream of parse events.
#[derive(Debug)]
pub struct TreeBuilder {
    dom: OutputDom,
    cursor: NodeId,
    open: Vec<OpenElement>,
    paragraphs: ParagraphCounter,
    picture: PictureAccumulator,
    /// Image node opened by a `PICTURE` element, while it is open.
    image: Option<NodeId>,
    errors: Vec<ParseError>,
    position: u64,
    image_media_type: String,
}

impl TreeBuilder {
    /// Create a builder whose root element is named `root_name`.
    pub fn new(root_name: &str, image_media_type: &str) -> Self {
        Self {
            dom: OutputDom::new(root_name),
            cursor: NodeId::ROOT,
            open: Vec::new(),
            paragraphs: ParagraphCounter::new(),
            picture: PictureAccumulator::new(),
            image: None,
            errors: Vec::new(),
            position: 0,
            image_media_type: image_media_type.to_string(),
        }
    }

    /// The innermost open output node.
    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Number of `P` elements seen so far.
    pub fn paragraph_count(&self) -> u64 {
        self.paragraphs.count()
    }

    /// Errors collected so far, in the order they were reported.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn dom(&self) -> &OutputDom {
        &self.dom
    }

    /// Finish building.
    ///
    /// Elements still open are reported as unclosed. If any error was
    /// collected, the first one is returned and the tree is dropped.
    pub fn finish(mut self) -> Result<OutputDom, ParseError> {
        while let Some(open) = self.open.pop() {
            self.errors.push(ParseError::new(
                self.position,
                ParseErrorKind::Unclosed(open.name),
            ));
        }

        match self.errors.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(self.dom),
        }
    }

    /// Close output nodes from the cursor up to and including `outer`.
    fn close_to(&mut self, outer: NodeId) {
        if let Some(image) = self.image
            && (image == outer || self.dom.parent(image) == Some(outer))
        {
            let src = data_uri(&self.image_media_type, &self.picture.finalize());
            if let Some(attrs) = self.dom.attrs_mut(image) {
                attrs.set("src", src);
            }
            self.image = None;
        }
        self.cursor = self.dom.parent(outer).unwrap_or(NodeId::ROOT);
    }
}

impl EventSink for TreeBuilder {
    fn advance(&mut self, position: u64) {
        self.position = position;
    }

    fn start_element(&mut self, name: &str, attrs: Attributes) {
        let mapping = map_element(name, attrs, &mut self.paragraphs);

        if self.image.is_some() {
            log::warn!("element <{name}> inside an image, keeping only its text");
            self.open.push(OpenElement {
                name: name.to_string(),
                outer: None,
            });
            return;
        }

        let mut outer = None;
        for element in mapping.elements {
            let id = self
                .dom
                .append_element(self.cursor, &element.name, element.attrs);
            if outer.is_none() {
                outer = Some(id);
            }
            self.cursor = id;
        }

        if mapping.embeds_image {
            self.picture.reset();
            self.image = Some(self.cursor);
        }

        if let Some(text) = mapping.text {
            self.dom.append_text(self.cursor, &text);
        }

        self.open.push(OpenElement {
            name: name.to_string(),
            outer,
        });
    }

    fn end_element(&mut self, name: &str) {
        let Some(open) = self.open.pop() else {
            self.errors.push(ParseError::new(
                self.position,
                ParseErrorKind::UnexpectedEnd(name.to_string()),
            ));
            return;
        };

        if open.name != name {
            self.errors.push(ParseError::new(
                self.position,
                ParseErrorKind::MismatchedEnd {
                    expected: open.name.clone(),
                    found: name.to_string(),
                },
            ));
        }

        // Still close the innermost element so the cursor stays well defined.
        if let Some(outer) = open.outer {
            self.close_to(outer);
        }
    }

    fn text(&mut self, chunk: &str) {
        if self.image.is_some() {
            self.picture.accumulate(chunk);
        } else {
            self.dom.append_text(self.cursor, chunk);
        }
    }

    fn error(&mut self, error: ParseError) {
        self.errors.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{IMAGE_TAG, PICTURE_TAG};
    use crate::source::feed;

    fn builder() -> TreeBuilder {
        TreeBuilder::new("document", "image/png")
    }

    fn build(input: &str) -> Result<OutputDom, ParseError> {
        let mut builder = builder();
        feed(input, &mut builder);
        builder.finish()
    }

    #[test]
    fn test_cursor_follows_open_elements() {
        let mut b = builder();
        assert_eq!(b.cursor(), NodeId::ROOT);

        b.start_element("P", Attributes::new());
        let p = b.cursor();
        b.start_element("B", Attributes::new());
        assert_eq!(b.dom().element_name(b.cursor()), Some("span"));
        assert_eq!(b.open.len(), 2);

        b.end_element("B");
        assert_eq!(b.cursor(), p);
        b.end_element("P");
        assert_eq!(b.cursor(), NodeId::ROOT);
        assert_eq!(b.open.len(), 0);
    }

    #[test]
    fn test_text_lands_in_cursor() {
        let dom = build("<P>one <B>two</B> three</P>").unwrap();
        let p = dom.find_all("p")[0];
        assert_eq!(dom.text_content(p), "one two three");
        assert_eq!(dom.children(p).count(), 3);
    }

    #[test]
    fn test_chapmark_text_is_appended() {
        let dom = build(r#"<CHAPMARK MARKER="c1" LEVEL="1" STRING="Title"/>"#).unwrap();
        let p = dom.find_all("p")[0];
        assert_eq!(dom.text_content(p), "Title");
        assert_eq!(dom.get_attr(p, "id"), Some("c1"));
    }

    #[test]
    fn test_picture_accumulates_into_src() {
        let dom = build("<P><PICTURE>QQ<![CDATA[==]]></PICTURE>after</P>").unwrap();

        let picture = dom.find_all(PICTURE_TAG)[0];
        let img = dom.find_all(IMAGE_TAG)[0];
        assert_eq!(dom.parent(img), Some(picture));
        assert_eq!(dom.get_attr(img, "src"), Some("data:image/png;base64,QQ=="));
        assert_eq!(dom.text_content(picture), "");
        assert_eq!(dom.children(img).count(), 0);

        let p = dom.find_all("p")[0];
        assert_eq!(dom.text_content(p), "after");
    }

    #[test]
    fn test_empty_picture_gets_empty_payload() {
        let dom = build("<PICTURE/>").unwrap();
        let img = dom.find_all(IMAGE_TAG)[0];
        assert_eq!(dom.get_attr(img, "src"), Some("data:image/png;base64,"));
    }

    #[test]
    fn test_pictures_do_not_share_data() {
        let dom = build("<T><PICTURE>QQ==</PICTURE><PICTURE>Qg==</PICTURE></T>").unwrap();
        let srcs: Vec<_> = dom
            .find_all(IMAGE_TAG)
            .into_iter()
            .map(|id| dom.get_attr(id, "src").unwrap().to_string())
            .collect();
        assert_eq!(
            srcs,
            ["data:image/png;base64,QQ==", "data:image/png;base64,Qg=="]
        );
    }

    #[test]
    fn test_picture_closes_both_elements() {
        let mut b = builder();
        b.start_element("PICTURE", Attributes::new());
        assert_eq!(b.image, Some(b.cursor()));
        b.end_element("PICTURE");
        assert_eq!(b.cursor(), NodeId::ROOT);
        assert_eq!(b.image, None);
    }

    #[test]
    fn test_source_img_is_not_an_image_slot() {
        let dom = build(r#"<T><img src="logo.png" alt="a">caption</img></T>"#).unwrap();
        let img = dom.find_all(IMAGE_TAG)[0];
        assert_eq!(dom.get_attr(img, "src"), Some("logo.png"));
        assert_eq!(dom.get_attr(img, "alt"), Some("a"));
        assert_eq!(dom.text_content(img), "caption");
    }

    #[test]
    fn test_picture_children_feed_payload() {
        let mut b = builder();
        feed("<P><PICTURE>QQ<B>==</B><P/></PICTURE>tail</P>", &mut b);
        // The absorbed paragraph still takes a number.
        assert_eq!(b.paragraph_count(), 2);
        let dom = b.finish().unwrap();

        let picture = dom.find_all(PICTURE_TAG)[0];
        let img = dom.find_all(IMAGE_TAG)[0];
        assert_eq!(dom.get_attr(img, "src"), Some("data:image/png;base64,QQ=="));
        assert_eq!(dom.children(img).count(), 0);
        assert_eq!(dom.children(picture).collect::<Vec<_>>(), vec![img]);
        assert!(dom.find_all("span").is_empty());

        let outer = dom.find_all("p")[0];
        assert_eq!(dom.text_content(outer), "tail");
        assert_eq!(dom.find_all("p").len(), 1);
    }

    #[test]
    fn test_paragraph_ids_increase() {
        let dom = build("<T><P/><P><P/></P><P/></T>").unwrap();
        let pids: Vec<_> = dom
            .find_all("p")
            .into_iter()
            .map(|id| dom.get_attr(id, "data-pid").unwrap().to_string())
            .collect();
        assert_eq!(pids, ["0", "1", "2", "3"]);
    }

    #[test]
    fn test_builders_do_not_share_counter() {
        let mut first = builder();
        feed("<P/><P/>", &mut first);
        assert_eq!(first.paragraph_count(), 2);

        let mut second = builder();
        feed("<P/>", &mut second);
        let dom = second.finish().unwrap();
        assert_eq!(dom.get_attr(dom.find_all("p")[0], "data-pid"), Some("0"));
    }

    #[test]
    fn test_end_without_open_element_is_error() {
        let mut b = builder();
        b.end_element("P");
        assert_eq!(b.cursor(), NodeId::ROOT);
        assert_eq!(
            b.finish().unwrap_err().kind,
            ParseErrorKind::UnexpectedEnd("P".to_string())
        );
    }

    #[test]
    fn test_mismatched_end_is_error() {
        let mut b = builder();
        b.start_element("P", Attributes::new());
        b.end_element("B");
        assert_eq!(b.cursor(), NodeId::ROOT);
        assert!(matches!(
            b.finish().unwrap_err().kind,
            ParseErrorKind::MismatchedEnd { .. }
        ));
    }

    #[test]
    fn test_unclosed_element_is_error() {
        let mut b = builder();
        b.start_element("TEXT", Attributes::new());
        b.advance(6);
        let err = b.finish().unwrap_err();
        assert_eq!(err, ParseError::new(6, ParseErrorKind::Unclosed("TEXT".to_string())));
    }

    #[test]
    fn test_first_error_wins() {
        let mut b = builder();
        b.error(ParseError::new(1, ParseErrorKind::UnknownEntity("a".to_string())));
        b.start_element("P", Attributes::new());
        b.error(ParseError::new(2, ParseErrorKind::UnknownEntity("b".to_string())));
        b.end_element("P");
        assert_eq!(b.errors().len(), 2);
        assert_eq!(
            b.finish().unwrap_err().kind,
            ParseErrorKind::UnknownEntity("a".to_string())
        );
    }
}
