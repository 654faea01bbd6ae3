use std::env;
use std::io;

use xmlout::{new_output, CdataRegistry, OutputHandler, OutputProperties, WriterOutputBuffer};

fn write_document(out: &mut dyn OutputHandler) -> xmlout::Result<()> {
	out.start_document()?;
	out.comment("written by the xmlout demo")?;
	out.start_element("html")?;
	out.start_element("head")?;
	out.start_element("title")?;
	out.characters("Fish & Chips")?;
	out.end_element("title")?;
	out.start_element("script")?;
	out.characters("if (a < b) { go(); }")?;
	out.end_element("script")?;
	out.end_element("head")?;
	out.start_element("body")?;
	out.start_element("a")?;
	out.attribute("href", "menu page.html")?;
	out.characters("Menu")?;
	out.end_element("a")?;
	out.start_element("br")?;
	out.end_element("br")?;
	out.start_element("pre")?;
	out.characters("x ]]> y")?;
	out.end_element("pre")?;
	out.end_element("body")?;
	out.end_element("html")?;
	out.end_document()
}

fn main() {
	// first argument selects the output method; anything but xml/html
	// decides on the root element, which is html here
	let method = env::args().nth(1).unwrap_or_default();
	let props = OutputProperties::default()
		.indent(true)
		.cdata_section_elements(["pre"].iter().copied().collect::<CdataRegistry>());
	let mut out = new_output(&method, props, WriterOutputBuffer::new(io::stdout()));
	if let Err(e) = write_document(&mut *out) {
		panic!("failed to serialize document: {}", e);
	}
	out.close();
	if let Some(e) = out.take_io_error() {
		panic!("I/O error: {}", e);
	}
	println!();
}
