//! Rendering of the output tree as markup text.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::dom::{NodeData, NodeId, OutputDom};
use crate::error::Result;

/// HTML void elements, written as `<name/>` when they have no children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Render the whole tree, root included, without an XML declaration.
///
/// Text and attribute values are escaped. Childless non-void elements are
/// written as an explicit start/end pair so the result stays valid HTML.
pub fn render(dom: &OutputDom) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_node(dom, NodeId::ROOT, &mut writer)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_node(dom: &OutputDom, id: NodeId, writer: &mut Writer<Vec<u8>>) -> Result<()> {
    let Some(node) = dom.get(id) else {
        return Ok(());
    };

    match &node.data {
        NodeData::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        NodeData::Element { name, attrs } => {
            let start = BytesStart::new(name.as_str()).with_attributes(
                attrs
                    .iter()
                    .map(|a| (a.name.as_str(), a.value.as_str())),
            );

            if node.first_child.is_none() && VOID_ELEMENTS.contains(&name.as_str()) {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }

            writer.write_event(Event::Start(start))?;
            for child in dom.children(id) {
                write_node(dom, child, writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
    }

    Ok(())
}
