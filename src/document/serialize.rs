//! Markup serialization for SVG documents
//!
//! `<style>` and `<script>` text is written unescaped, the way libxml's HTML
//! output does. Inside SVG embedded in an HTML page that text is still parsed
//! as markup, so a literal `<` or `&` in CSS or script can break the
//! surrounding page.

use super::{Element, Node, SvgDocument};

/// Elements whose text content is written without escaping
const RAW_TEXT: &[&str] = &["style", "script"];

/// Configuration options for serialized output
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Whether to indent element-only content
    pub pretty_print: bool,

    /// Spaces per nesting level when pretty-printing
    pub indent_width: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty_print: false,
            indent_width: 2,
        }
    }
}

impl SerializeOptions {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to pretty-print output
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set the indentation width
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}

/// Write the document as embeddable markup: no XML declaration, no DOCTYPE
pub(super) fn write_document(doc: &SvgDocument, options: &SerializeOptions) -> String {
    let mut writer = MarkupWriter {
        options,
        out: String::new(),
    };
    writer.element(doc.root(), 0, !options.pretty_print);
    writer.out
}

struct MarkupWriter<'a> {
    options: &'a SerializeOptions,
    out: String,
}

impl MarkupWriter<'_> {
    fn element(&mut self, element: &Element, depth: usize, inline: bool) {
        self.out.push('<');
        self.out.push_str(&element.name);
        for (name, value) in &element.attributes {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            escape_attribute(&mut self.out, value);
            self.out.push('"');
        }

        if element.children.is_empty() {
            self.out.push_str("/>");
            return;
        }
        self.out.push('>');

        // Mixed content is written inline so no whitespace is introduced
        let element_only = element
            .children
            .iter()
            .all(|child| !matches!(child, Node::Text(_)));
        let raw = RAW_TEXT.contains(&element.local_name());

        if !inline && element_only {
            for child in &element.children {
                self.newline(depth + 1);
                self.node(child, depth + 1, false, raw);
            }
            self.newline(depth);
        } else {
            for child in &element.children {
                self.node(child, depth + 1, true, raw);
            }
        }

        self.out.push_str("</");
        self.out.push_str(&element.name);
        self.out.push('>');
    }

    fn node(&mut self, node: &Node, depth: usize, inline: bool, raw: bool) {
        match node {
            Node::Element(element) => self.element(element, depth, inline),
            Node::Text(text) if raw => self.out.push_str(text),
            Node::Text(text) => escape_text(&mut self.out, text),
            Node::Comment(text) => {
                self.out.push_str("<!--");
                self.out.push_str(text);
                self.out.push_str("-->");
            }
        }
    }

    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        for _ in 0..depth * self.options.indent_width {
            self.out.push(' ');
        }
    }
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Overrides;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <!-- icon -->
  <g id="layer">
    <path d="M0 0h24v24H0z" fill="none"/>
  </g>
  <text x="1" y="2">A &amp; B</text>
</svg>
"#;

    fn parse(svg: &str) -> SvgDocument {
        SvgDocument::parse(svg.as_bytes()).expect("Should parse")
    }

    fn normalized(svg: &str) -> SvgDocument {
        let mut doc = parse(svg);
        doc.normalize();
        doc
    }

    #[test]
    fn test_compact_output() {
        let out = normalized(SOURCE).serialize(&SerializeOptions::default());
        insta::assert_snapshot!(out, @r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><!-- icon --><g id="layer"><path d="M0 0h24v24H0z" fill="none"/></g><text x="1" y="2">A &amp; B</text></svg>"#);
    }

    #[test]
    fn test_pretty_output() {
        let options = SerializeOptions::new().with_pretty_print(true);
        let out = normalized(SOURCE).serialize(&options);
        let expected = [
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">"#,
            "  <!-- icon -->",
            r#"  <g id="layer">"#,
            r#"    <path d="M0 0h24v24H0z" fill="none"/>"#,
            "  </g>",
            r#"  <text x="1" y="2">A &amp; B</text>"#,
            "</svg>",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_pretty_output_respects_indent_width() {
        let options = SerializeOptions::new()
            .with_pretty_print(true)
            .with_indent_width(4);
        let out = normalized("<svg><g><path/></g></svg>").serialize(&options);
        assert_eq!(out, "<svg>\n    <g>\n        <path/>\n    </g>\n</svg>");
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let options = SerializeOptions::default();
        let first = normalized(SOURCE).serialize(&options);
        let second = normalized(&first).serialize(&options);
        assert_eq!(first, second);
        assert_eq!(parse(&first), parse(&second));
    }

    #[test]
    fn test_escapes_attribute_values() {
        let mut doc = parse("<svg/>");
        doc.root_mut()
            .set_attribute("data-label", r#"Tom & "Jerry" <3"#);
        let out = doc.serialize(&SerializeOptions::default());
        assert_eq!(
            out,
            r#"<svg data-label="Tom &amp; &quot;Jerry&quot; &lt;3"/>"#
        );
    }

    #[test]
    fn test_style_text_is_not_escaped() {
        let svg = "<svg><style><![CDATA[.a > .b { fill: red; }]]></style></svg>";
        let out = normalized(svg).serialize(&SerializeOptions::default());
        assert_eq!(out, "<svg><style>.a > .b { fill: red; }</style></svg>");
    }

    #[test]
    fn test_serialized_overrides() {
        let mut doc = parse(r#"<svg xmlns="http://www.w3.org/2000/svg" id="x" width="24"><path d="M0 0"/></svg>"#);
        doc.apply(&Overrides {
            fill: Some("red"),
            width: Some("100"),
            height: Some("100"),
            classes: vec!["svg-icon"],
            ..Overrides::default()
        });
        let out = doc.serialize(&SerializeOptions::default());
        insta::assert_snapshot!(out, @r#"<svg xmlns="http://www.w3.org/2000/svg" width="100px" fill="red" height="100px" class="svg-icon"><path d="M0 0"/></svg>"#);
    }

    #[test]
    fn test_prefixed_names_survive_serialization() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a"/></svg>"##;
        let out = normalized(svg).serialize(&SerializeOptions::default());
        assert!(out.contains(r#"xmlns:xlink="http://www.w3.org/1999/xlink""#));
        assert!(out.contains(r##"<use xlink:href="#a"/>"##));
        assert!(!out.starts_with("<?xml"));
    }
}
