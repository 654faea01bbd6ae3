/*!
# Start tags

A start tag stays open after `start_element` so that attributes and
namespace declarations can still be added. The [`PendingStartTag`] buffers
those until the tag has to be written.
*/
use smartstring::alias::String as SmartString;

/// HTML elements which never get an end tag.
static HTML_EMPTY_ELEMENTS: &'static [&'static str] = &[
	"area", "base", "basefont", "br", "col", "frame", "hr", "img", "input", "isindex", "link",
	"meta", "param",
];

/// HTML elements whose text content is written without escaping.
static HTML_RAW_TEXT_ELEMENTS: &'static [&'static str] = &["script", "style"];

/// Whether `name` is an HTML empty element (ASCII case-insensitive).
pub fn is_html_empty_element(name: &str) -> bool {
	HTML_EMPTY_ELEMENTS
		.iter()
		.any(|v| v.eq_ignore_ascii_case(name))
}

/// Whether `name` is an HTML element with unescaped text content (ASCII
/// case-insensitive).
pub fn is_html_raw_text_element(name: &str) -> bool {
	HTML_RAW_TEXT_ELEMENTS
		.iter()
		.any(|v| v.eq_ignore_ascii_case(name))
}

/// Split a qualified name into prefix (empty if absent) and local name.
pub fn split_qname(name: &str) -> (&str, &str) {
	match name.find(':') {
		Some(pos) => (&name[..pos], &name[pos + 1..]),
		None => ("", name),
	}
}

/// An attribute as given to the serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	/// Qualified name
	pub name: SmartString,
	/// Unescaped value
	pub value: String,
}

impl Attribute {
	pub fn new<N: Into<SmartString>, V: Into<String>>(name: N, value: V) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}
}

/// A namespace declaration made on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
	/// Declared prefix, empty for the default namespace
	pub prefix: SmartString,
	pub uri: String,
}

/**
An open start tag.

Attribute names are matched case-insensitively if the tag was created for
HTML output, case-sensitively otherwise. Setting an attribute which already
exists overwrites the value but keeps the original position.

```rust
use xmlout::tag::PendingStartTag;

let mut tag = PendingStartTag::new("input", 1, true);
tag.set_attribute("TYPE", "text");
tag.set_attribute("type", "checkbox");
assert_eq!(tag.attributes().len(), 1);
assert_eq!(tag.attributes()[0].value, "checkbox");
```
*/
#[derive(Debug, Clone)]
pub struct PendingStartTag {
	name: SmartString,
	depth: usize,
	case_insensitive: bool,
	attributes: Vec<Attribute>,
	namespaces: Vec<NamespaceDecl>,
}

impl PendingStartTag {
	pub fn new<N: Into<SmartString>>(name: N, depth: usize, case_insensitive: bool) -> Self {
		Self {
			name: name.into(),
			depth,
			case_insensitive,
			attributes: Vec::new(),
			namespaces: Vec::new(),
		}
	}

	/// Qualified name of the element.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Tree depth of the element (the root element has depth 1).
	pub fn depth(&self) -> usize {
		self.depth
	}

	pub fn attributes(&self) -> &[Attribute] {
		&self.attributes[..]
	}

	/// Namespace declarations in the order they were accepted.
	pub fn namespaces(&self) -> &[NamespaceDecl] {
		&self.namespaces[..]
	}

	fn same_name(&self, a: &str, b: &str) -> bool {
		if self.case_insensitive {
			a.eq_ignore_ascii_case(b)
		} else {
			a == b
		}
	}

	/// Add an attribute, overwriting any existing one with the same name.
	pub fn set_attribute(&mut self, name: &str, value: &str) {
		let existing = self
			.attributes
			.iter()
			.position(|a| self.same_name(&a.name, name));
		match existing {
			Some(i) => {
				let attr = &mut self.attributes[i];
				attr.value.clear();
				attr.value.push_str(value);
			}
			None => self.attributes.push(Attribute::new(name, value)),
		}
	}

	/// Record a namespace declaration which was accepted by the scope,
	/// overwriting an earlier one for the same prefix.
	pub fn add_namespace(&mut self, prefix: &str, uri: &str) {
		match self.namespaces.iter_mut().find(|d| d.prefix.as_str() == prefix) {
			Some(decl) => {
				decl.uri.clear();
				decl.uri.push_str(uri);
			}
			None => self.namespaces.push(NamespaceDecl {
				prefix: prefix.into(),
				uri: uri.to_string(),
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn html_empty_elements_any_case() {
		for name in HTML_EMPTY_ELEMENTS.iter() {
			assert!(is_html_empty_element(name));
			assert!(is_html_empty_element(&name.to_ascii_uppercase()));
		}
		assert!(is_html_empty_element("Br"));
		assert!(!is_html_empty_element("p"));
		assert!(!is_html_empty_element("brx"));
	}

	#[test]
	fn raw_text_elements() {
		assert!(is_html_raw_text_element("SCRIPT"));
		assert!(is_html_raw_text_element("style"));
		assert!(!is_html_raw_text_element("pre"));
	}

	#[test]
	fn qname_splitting() {
		assert_eq!(split_qname("p:local"), ("p", "local"));
		assert_eq!(split_qname("local"), ("", "local"));
		assert_eq!(split_qname(":x"), ("", "x"));
	}

	#[test]
	fn xml_attributes_are_case_sensitive() {
		let mut tag = PendingStartTag::new("a", 1, false);
		tag.set_attribute("id", "1");
		tag.set_attribute("ID", "2");
		tag.set_attribute("id", "3");
		assert_eq!(
			tag.attributes(),
			&[Attribute::new("id", "3"), Attribute::new("ID", "2")][..]
		);
	}

	#[test]
	fn overwriting_keeps_position() {
		let mut tag = PendingStartTag::new("a", 1, true);
		tag.set_attribute("href", "x");
		tag.set_attribute("title", "t");
		tag.set_attribute("HREF", "y");
		assert_eq!(tag.attributes()[0], Attribute::new("href", "y"));
		assert_eq!(tag.attributes()[1], Attribute::new("title", "t"));
	}

	#[test]
	fn namespace_redeclaration_overwrites() {
		let mut tag = PendingStartTag::new("a", 1, false);
		tag.add_namespace("p", "urn:1");
		tag.add_namespace("", "urn:d");
		tag.add_namespace("p", "urn:2");
		assert_eq!(tag.namespaces().len(), 2);
		assert_eq!(tag.namespaces()[0].prefix.as_str(), "p");
		assert_eq!(tag.namespaces()[0].uri, "urn:2");
	}
}
