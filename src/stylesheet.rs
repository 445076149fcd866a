//! The stylesheet appended to every converted document.
//!
//! Class names match the ones produced by [`crate::mapping`]. The text is
//! emitted byte for byte; downstream viewers depend on it.

use crate::dom::{Attributes, NodeId, OutputDom};

/// Name of the style element.
pub const STYLE_TAG: &str = "style";

/// CSS rules for the classes emitted by the tag mapper.
pub const STYLESHEET: &str = "\
.T1{font-size:1.6em;font-weight:bold;margin:1em 0 0.5em}\
.T2{font-size:1.4em;font-weight:bold;margin:1em 0 0.5em}\
.T3{font-size:1.2em;font-weight:bold;margin:0.8em 0 0.4em}\
.T4{font-size:1.1em;font-weight:bold;margin:0.6em 0 0.3em}\
.T5{font-size:1em;font-weight:bold;margin:0.5em 0 0.25em}\
.T6{font-size:1em;font-style:italic;margin:0.5em 0 0.25em}\
.p-hidden{display:none}\
.p-left{text-align:left}\
.p-right{text-align:right}\
.p-center{text-align:center}\
.p-justify{text-align:justify}\
.s-underline{text-decoration:underline}\
.s-strike{text-decoration:line-through}\
.s-color{color:#0000ff}\
.s-italic{font-style:italic}\
.s-bold{font-weight:bold}\
picture img{max-width:100%}";

/// Append the style element as the last child of the root.
pub fn inject_stylesheet(dom: &mut OutputDom) -> NodeId {
    let style = dom.append_element(NodeId::ROOT, STYLE_TAG, Attributes::new());
    dom.append_text(style, STYLESHEET);
    style
}
