/*!
# Output properties

Configuration of a serializer, in the spirit of the `xsl:output` element.
*/
use std::fmt;

use crate::cdata::CdataRegistry;
use crate::encoding::EncodingProfile;

/// Target markup language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputMethod {
	Xml,
	Html,
}

impl OutputMethod {
	/// Look up an output method by name (ASCII case-insensitive).
	///
	/// Returns `None` for names which do not denote XML or HTML, including
	/// the empty string; such documents go through the
	/// [`UnknownOutput`](crate::UnknownOutput) dispatcher.
	pub fn from_name(name: &str) -> Option<OutputMethod> {
		let name = name.trim();
		if name.eq_ignore_ascii_case("xml") {
			Some(OutputMethod::Xml)
		} else if name.eq_ignore_ascii_case("html") {
			Some(OutputMethod::Html)
		} else {
			None
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			OutputMethod::Xml => "xml",
			OutputMethod::Html => "html",
		}
	}
}

impl fmt::Display for OutputMethod {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Document type identifiers.
///
/// The DOCTYPE declaration is written before the first element. The XML
/// method requires a system identifier; the HTML method writes a DOCTYPE if
/// either identifier is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Doctype {
	pub system: Option<String>,
	pub public: Option<String>,
}

impl Doctype {
	pub fn is_empty(&self) -> bool {
		self.system.is_none() && self.public.is_none()
	}
}

/**
Serializer configuration.

Construct with [`Default`] and adjust with the builder methods:

```rust
use xmlout::OutputProperties;

let props = OutputProperties::default()
	.encoding("iso-8859-1")
	.indent(true)
	.indent_number(2)
	.omit_xml_declaration(true);
assert_eq!(props.encoding.name(), "ISO-8859-1");
```
*/
#[derive(Debug, Clone)]
pub struct OutputProperties {
	/// Declared output encoding.
	pub encoding: EncodingProfile,

	/// Version written into the XML declaration.
	pub version: String,

	/// Value of the `standalone` pseudo-attribute, omitted if `None`.
	pub standalone: Option<String>,

	/// Suppress the XML declaration.
	pub omit_xml_declaration: bool,

	/// Indent nested elements.
	pub indent: bool,

	/// Spaces per indentation level.
	pub indent_number: usize,

	pub doctype: Doctype,

	/// Media type written into the HTML `<meta>` line.
	pub media_type: String,

	/// Elements whose text content is written as CDATA sections (XML only).
	pub cdata_section_elements: CdataRegistry,

	/// Escape character data. Can be toggled while serializing.
	pub escaping: bool,
}

impl OutputProperties {
	pub fn encoding(mut self, name: &str) -> Self {
		self.encoding = EncodingProfile::resolve(name);
		self
	}

	pub fn version<T: Into<String>>(mut self, v: T) -> Self {
		self.version = v.into();
		self
	}

	pub fn standalone<T: Into<String>>(mut self, v: Option<T>) -> Self {
		self.standalone = v.map(|v| v.into());
		self
	}

	pub fn omit_xml_declaration(mut self, v: bool) -> Self {
		self.omit_xml_declaration = v;
		self
	}

	pub fn indent(mut self, v: bool) -> Self {
		self.indent = v;
		self
	}

	pub fn indent_number(mut self, v: usize) -> Self {
		self.indent_number = v;
		self
	}

	pub fn doctype_system<T: Into<String>>(mut self, v: T) -> Self {
		self.doctype.system = Some(v.into());
		self
	}

	pub fn doctype_public<T: Into<String>>(mut self, v: T) -> Self {
		self.doctype.public = Some(v.into());
		self
	}

	pub fn media_type<T: Into<String>>(mut self, v: T) -> Self {
		self.media_type = v.into();
		self
	}

	pub fn cdata_section_elements(mut self, v: CdataRegistry) -> Self {
		self.cdata_section_elements = v;
		self
	}

	pub fn escaping(mut self, v: bool) -> Self {
		self.escaping = v;
		self
	}
}

impl Default for OutputProperties {
	fn default() -> Self {
		Self {
			encoding: EncodingProfile::utf8(),
			version: "1.0".to_string(),
			standalone: None,
			omit_xml_declaration: false,
			indent: false,
			indent_number: 2,
			doctype: Doctype::default(),
			media_type: "text/html".to_string(),
			cdata_section_elements: CdataRegistry::new(),
			escaping: true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn method_names() {
		assert_eq!(OutputMethod::from_name("XML"), Some(OutputMethod::Xml));
		assert_eq!(OutputMethod::from_name(" html "), Some(OutputMethod::Html));
		assert_eq!(OutputMethod::from_name("text"), None);
		assert_eq!(OutputMethod::from_name(""), None);
		assert_eq!(OutputMethod::Html.to_string(), "html");
	}

	#[test]
	fn builder_sets_fields() {
		let props = OutputProperties::default()
			.version("1.1")
			.standalone(Some("yes"))
			.doctype_system("about:legacy-compat")
			.media_type("application/xhtml+xml")
			.escaping(false);
		assert_eq!(props.version, "1.1");
		assert_eq!(props.standalone.as_deref(), Some("yes"));
		assert_eq!(props.doctype.system.as_deref(), Some("about:legacy-compat"));
		assert!(props.doctype.public.is_none());
		assert!(!props.doctype.is_empty());
		assert_eq!(props.media_type, "application/xhtml+xml");
		assert!(!props.escaping);
	}

	#[test]
	fn unknown_encoding_falls_back_to_utf8() {
		let props = OutputProperties::default().encoding("no-such-charset");
		assert_eq!(props.encoding.name(), "UTF-8");
	}
}
