//! Markup parser
//!
//! Line-oriented: indentation decides nesting, `name: value` splits on the
//! first colon, `: text` continues the value of the enclosing element and
//! `//` starts a comment line. Carriage returns are only treated as part of
//! the line ending when every line of the text ends in CRLF.

use crate::element::Element;
use crate::error::MarkupError;

struct Frame {
    indent: usize,
    element: Element,
    continued: bool,
}

pub(crate) fn parse(text: &str) -> Result<Element, MarkupError> {
    let mut root = Element::default();
    let mut stack: Vec<Frame> = Vec::new();
    let crlf = uses_crlf(text);

    for (index, raw) in text.split('\n').enumerate() {
        let line = index + 1;
        let raw = if crlf {
            raw.strip_suffix('\r').unwrap_or(raw)
        } else {
            raw
        };
        if raw.trim().is_empty() {
            continue;
        }

        let indent = raw.len() - raw.trim_start_matches(' ').len();
        let content = &raw[indent..];
        if content.starts_with('\t') {
            return Err(MarkupError::TabIndent { line });
        }
        if content.starts_with("//") {
            continue;
        }

        close_frames(&mut root, &mut stack, indent);

        if let Some(rest) = content.strip_prefix(':') {
            let frame = stack
                .last_mut()
                .ok_or(MarkupError::OrphanContinuation { line })?;
            frame
                .element
                .append_continuation(strip_separator(rest), !frame.continued);
            frame.continued = true;
            continue;
        }

        let (name, value) = match content.split_once(':') {
            Some((name, value)) => (name.trim_end(), strip_separator(value)),
            None => (content.trim_end(), ""),
        };
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(MarkupError::InvalidName {
                line,
                name: name.to_string(),
            });
        }

        stack.push(Frame {
            indent,
            element: Element::with_value(name, value),
            continued: false,
        });
    }

    close_frames(&mut root, &mut stack, 0);
    Ok(root)
}

/// Pop every open frame indented at or beyond `indent` into its parent
fn close_frames(root: &mut Element, stack: &mut Vec<Frame>, indent: usize) {
    while stack.last().is_some_and(|frame| frame.indent >= indent) {
        let Some(frame) = stack.pop() else { break };
        match stack.last_mut() {
            Some(parent) => parent.element.push(frame.element),
            None => root.push(frame.element),
        }
    }
}

fn uses_crlf(text: &str) -> bool {
    let breaks = text.matches('\n').count();
    breaks > 0 && text.matches("\r\n").count() == breaks
}

fn strip_separator(text: &str) -> &str {
    text.strip_prefix(' ').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Document, Writer};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const SAMPLE: &str = "\
node: system
  name: console
  attribute
    name: region
    value: NTSC-U
  node: port
    name: controller
  node: port
    name: expansion
";

    #[test]
    fn parses_nested_elements() {
        let document = Document::parse(SAMPLE).unwrap();
        let node = document.get("node").unwrap();

        assert_eq!(node.value(), "system");
        assert_eq!(node.text("name"), "console");

        let attribute = node.get("attribute").unwrap();
        assert_eq!(attribute.text("name"), "region");
        assert_eq!(attribute.text("value"), "NTSC-U");

        let ports: Vec<_> = node.find("node").map(|n| n.text("name")).collect();
        assert_eq!(ports, vec!["controller", "expansion"]);
    }

    #[test]
    fn empty_text_is_empty_document() {
        assert!(Document::parse("").unwrap().is_empty());
        assert!(Document::parse("\n   \n").unwrap().is_empty());
    }

    #[test]
    fn value_keeps_inner_colons_and_spaces() {
        let document = Document::parse("path: a:b:c \nlead:   x").unwrap();
        assert_eq!(document.get("path").unwrap().value(), "a:b:c ");
        assert_eq!(document.get("lead").unwrap().value(), "  x");
    }

    #[test]
    fn comments_and_crlf_are_ignored() {
        let document = Document::parse("// header\r\nnode: system\r\n  name: x\r\n").unwrap();
        let node = document.get("node").unwrap();
        assert_eq!(node.value(), "system");
        assert_eq!(node.text("name"), "x");
    }

    #[test]
    fn lone_carriage_returns_are_kept() {
        let document = Document::parse("attribute\n  value: v\r\n  name: n\r\n").unwrap();
        let attribute = document.get("attribute").unwrap();
        assert_eq!(attribute.text("value"), "v\r");
        assert_eq!(attribute.text("name"), "n\r");
    }

    #[test]
    fn continuation_lines_build_multiline_value() {
        let text = "value\n  : first\n  :\n  :   indented\n";
        let document = Document::parse(text).unwrap();
        assert_eq!(document.get("value").unwrap().value(), "first\n\n  indented");
    }

    #[test]
    fn sibling_after_deeper_child() {
        let document = Document::parse("a\n  b\n    c\n  d\ne\n").unwrap();
        let a = document.get("a").unwrap();
        assert_eq!(a.children().len(), 2);
        assert_eq!(a.get("b").unwrap().children().len(), 1);
        assert!(document.get("e").is_some());
    }

    #[test]
    fn rejects_tab_indent() {
        let result = Document::parse("node: a\n\tname: b");
        assert_eq!(result, Err(MarkupError::TabIndent { line: 2 }));
    }

    #[test]
    fn rejects_orphan_continuation() {
        let result = Document::parse(": floating");
        assert_eq!(result, Err(MarkupError::OrphanContinuation { line: 1 }));
    }

    #[test]
    fn rejects_invalid_name() {
        let result = Document::parse("node: a\n  bad name: x");
        assert!(matches!(result, Err(MarkupError::InvalidName { line: 2, .. })));
        assert!(matches!(Document::parse(": x\n"), Err(e) if e.line() == 1));
    }

    proptest! {
        #[test]
        fn prop_written_values_parse_back(value in "[ -~\r\n]{0,40}") {
            let mut writer = Writer::new();
            writer.open(0, "attribute");
            writer.line(1, "value", &value);
            let document = Document::parse(&writer.finish()).unwrap();
            let attribute = document.get("attribute").unwrap();
            prop_assert_eq!(attribute.text("value"), value.as_str());
        }
    }
}
