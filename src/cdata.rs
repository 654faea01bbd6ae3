/*!
# CDATA section support

Elements listed in a [`CdataRegistry`] have their direct text content
written as CDATA sections instead of escaped text. The [`CdataTracker`]
records, per tree depth, which open element requested this.

CDATA sections cannot contain the sequence `]]>`. [`CdataSections`] splits
text at every occurrence so that each piece can be placed in its own
section: `a]]>b` becomes the pieces `a]]` and `>b`, which serialize as
`<![CDATA[a]]]]><![CDATA[>b]]>`.
*/
use std::collections::HashSet;
use std::iter::FromIterator;

use smartstring::alias::String as SmartString;

/// Opening marker of a CDATA section.
pub const CDATA_START: &'static str = "<![CDATA[";

/// Closing marker of a CDATA section.
pub const CDATA_END: &'static str = "]]>";

/**
Set of element names whose text content is written as CDATA sections.

Names are expanded names: a namespace URI (empty for no namespace) and a
local name. [`CdataRegistry::add`] accepts both `{uri}local` and plain
`local` notation.

```rust
use xmlout::CdataRegistry;

let mut reg = CdataRegistry::new();
reg.add("script");
reg.add("{urn:example}code");
assert!(reg.contains("", "script"));
assert!(reg.contains("urn:example", "code"));
assert!(!reg.contains("", "code"));
```
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CdataRegistry {
	names: HashSet<(SmartString, SmartString)>,
}

impl CdataRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a name in `{uri}local` or plain `local` notation.
	pub fn add(&mut self, name: &str) {
		let name = name.trim();
		if name.starts_with('{') {
			if let Some(end) = name.find('}') {
				self.add_qualified(&name[1..end], &name[end + 1..]);
				return;
			}
		}
		self.add_qualified("", name);
	}

	/// Register a namespace URI / local name pair.
	pub fn add_qualified(&mut self, uri: &str, local_name: &str) {
		self.names.insert((uri.into(), local_name.into()));
	}

	pub fn contains(&self, uri: &str, local_name: &str) -> bool {
		self.names
			.contains(&(SmartString::from(uri), SmartString::from(local_name)))
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

impl<'a> FromIterator<&'a str> for CdataRegistry {
	fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
		let mut reg = CdataRegistry::new();
		for name in iter {
			reg.add(name);
		}
		reg
	}
}

/// Stack of tree depths whose elements requested CDATA output.
#[derive(Debug, Clone, Default)]
pub struct CdataTracker {
	depths: Vec<usize>,
}

impl CdataTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record that the element opened at `depth` requested CDATA output.
	///
	/// Recording the same depth twice in a row has no effect.
	pub fn push(&mut self, depth: usize) {
		if self.depths.last() != Some(&depth) {
			self.depths.push(depth);
		}
	}

	/// Whether text at `depth` is to be written as CDATA.
	pub fn is_active(&self, depth: usize) -> bool {
		self.depths.last() == Some(&depth)
	}

	/// Forget the entry for `depth` if it is the innermost one.
	///
	/// Returns whether an entry was removed.
	pub fn pop(&mut self, depth: usize) -> bool {
		if self.is_active(depth) {
			self.depths.pop();
			true
		} else {
			false
		}
	}

	pub fn clear(&mut self) {
		self.depths.clear();
	}
}

/**
Iterator over the pieces of a text which may each be placed in a single
CDATA section.

```rust
use xmlout::cdata::CdataSections;

let pieces: Vec<&str> = CdataSections::new("a]]>b").collect();
assert_eq!(pieces, vec!["a]]", ">b"]);
```
*/
pub struct CdataSections<'x> {
	rest: Option<&'x str>,
}

impl<'x> CdataSections<'x> {
	pub fn new(text: &'x str) -> Self {
		Self { rest: Some(text) }
	}
}

impl<'x> Iterator for CdataSections<'x> {
	type Item = &'x str;

	fn next(&mut self) -> Option<&'x str> {
		let rest = self.rest?;
		match rest.find(CDATA_END) {
			Some(pos) => {
				// keep "]]" here, the ">" starts the next section
				let (head, tail) = rest.split_at(pos + 2);
				self.rest = Some(tail);
				Some(head)
			}
			None => {
				self.rest = None;
				Some(rest)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sections(s: &str) -> Vec<&str> {
		CdataSections::new(s).collect()
	}

	#[test]
	fn registry_accepts_clark_and_plain_names() {
		let reg: CdataRegistry = vec!["pre", "{urn:x}code", " spaced "].into_iter().collect();
		assert_eq!(reg.len(), 3);
		assert!(reg.contains("", "pre"));
		assert!(reg.contains("urn:x", "code"));
		assert!(reg.contains("", "spaced"));
		assert!(!reg.contains("urn:x", "pre"));
	}

	#[test]
	fn registry_treats_unterminated_brace_as_plain_name() {
		let mut reg = CdataRegistry::new();
		reg.add("{broken");
		assert!(reg.contains("", "{broken"));
	}

	#[test]
	fn tracker_matches_innermost_depth_only() {
		let mut t = CdataTracker::new();
		assert!(!t.is_active(1));
		t.push(1);
		assert!(t.is_active(1));
		assert!(!t.is_active(2));
		t.push(3);
		assert!(t.is_active(3));
		assert!(!t.pop(1));
		assert!(t.pop(3));
		assert!(t.is_active(1));
		assert!(t.pop(1));
		assert!(!t.is_active(1));
	}

	#[test]
	fn tracker_keeps_one_entry_per_depth() {
		let mut t = CdataTracker::new();
		t.push(2);
		t.push(2);
		assert!(t.pop(2));
		assert!(!t.is_active(2));
	}

	#[test]
	fn text_without_terminator_is_one_section() {
		assert_eq!(sections("plain <text> & stuff"), vec!["plain <text> & stuff"]);
		assert_eq!(sections(""), vec![""]);
	}

	#[test]
	fn terminator_splits_sections() {
		assert_eq!(sections("]]>"), vec!["]]", ">"]);
		assert_eq!(sections("x]]>y]]>z"), vec!["x]]", ">y]]", ">z"]);
		assert_eq!(sections("]]]]>>"), vec!["]]]]", ">>"]);
	}

	#[test]
	fn sections_concatenate_to_original_and_never_contain_terminator() {
		let samples = ["a]]>b", "]]>]]>", "]]]>", "no split", "x]]>"];
		for s in samples.iter() {
			let pieces = sections(s);
			assert_eq!(pieces.concat(), *s);
			for p in pieces.iter() {
				assert!(!p.contains(CDATA_END), "{:?} contains terminator", p);
			}
		}
	}
}
