/*!
# Namespace scopes

Tracks which namespace URI each prefix is bound to while a document is being
written. Bindings are tagged with the tree depth of the element which
introduced them and are retracted together when that element closes.

The protocol mirrors the nesting of the document:

1. Declare all bindings introduced on an element with
   [`NamespaceScope::declare`], passing the element's depth.
2. Process the element's content.
3. Call [`NamespaceScope::close_scope`] with the same depth when the element
   ends.
*/
use std::collections::HashMap;

use smartstring::alias::String as SmartString;

/// Namespace URI permanently bound to the `xml` prefix.
pub const XMLNS_XML: &'static str = "http://www.w3.org/XML/1998/namespace";

/// Namespace URI permanently bound to the `xmlns` prefix.
pub const XMLNS_XMLNS: &'static str = "http://www.w3.org/2000/xmlns/";

pub const PREFIX_XML: &'static str = "xml";
pub const PREFIX_XMLNS: &'static str = "xmlns";

/// Whether a prefix can never be rebound.
pub fn is_reserved_prefix(prefix: &str) -> bool {
	prefix == PREFIX_XML || prefix == PREFIX_XMLNS
}

/// Outcome of [`NamespaceScope::declare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration {
	/// Reserved prefix, or the binding is already in scope
	Unchanged,
	/// New binding for the element
	Added,
	/// The element's own earlier binding of the prefix was overwritten
	Replaced,
}

impl Declaration {
	/// Whether the start tag has to carry the declaration.
	pub fn is_visible(&self) -> bool {
		*self != Declaration::Unchanged
	}
}

/**
Prefix to namespace URI bindings with depth-based scoping.

Each prefix maps to a stack of URIs; the most recently declared one is in
scope. The default namespace is the empty prefix.

```rust
use xmlout::NamespaceScope;

let mut ns = NamespaceScope::new();
assert!(ns.declare("p", "urn:a", 1).is_visible());
assert!(ns.declare("p", "urn:b", 2).is_visible());
assert_eq!(ns.lookup("p"), Some("urn:b"));
ns.close_scope(2);
assert_eq!(ns.lookup("p"), Some("urn:a"));
ns.close_scope(1);
assert_eq!(ns.lookup("p"), None);
```
*/
#[derive(Debug, Clone)]
pub struct NamespaceScope {
	bindings: HashMap<SmartString, Vec<String>>,
	// (depth, prefix) in declaration order
	undo: Vec<(usize, SmartString)>,
}

impl NamespaceScope {
	/// Create a scope with the empty default namespace and the `xml` prefix
	/// bound.
	pub fn new() -> Self {
		let mut bindings = HashMap::new();
		bindings.insert(SmartString::new(), vec![String::new()]);
		bindings.insert(SmartString::from(PREFIX_XML), vec![XMLNS_XML.to_string()]);
		Self {
			bindings,
			undo: Vec::new(),
		}
	}

	/// Bind `prefix` to `uri` for the element at `depth`.
	///
	/// Nothing changes if the prefix is reserved or if `uri` is already the
	/// innermost binding of `prefix`. A second declaration of the same prefix
	/// at the same depth replaces the first one.
	pub fn declare(&mut self, prefix: &str, uri: &str, depth: usize) -> Declaration {
		if is_reserved_prefix(prefix) {
			return Declaration::Unchanged;
		}
		let stack = self
			.bindings
			.entry(SmartString::from(prefix))
			.or_insert_with(Vec::new);
		if stack.last().map(|v| v.as_str()) == Some(uri) {
			return Declaration::Unchanged;
		}
		let same_element = self
			.undo
			.iter()
			.rev()
			.take_while(|(d, _)| *d == depth)
			.any(|(_, p)| p == prefix);
		if same_element {
			if let Some(top) = stack.last_mut() {
				top.clear();
				top.push_str(uri);
			}
			return Declaration::Replaced;
		}
		stack.push(uri.to_string());
		self.undo.push((depth, SmartString::from(prefix)));
		Declaration::Added
	}

	/// Return the URI currently bound to `prefix`.
	pub fn lookup(&self, prefix: &str) -> Option<&str> {
		match prefix {
			PREFIX_XMLNS => Some(XMLNS_XMLNS),
			_ => self
				.bindings
				.get(prefix)
				.and_then(|stack| stack.last())
				.map(|v| v.as_str()),
		}
	}

	/// Retract every binding declared at exactly `depth`.
	///
	/// Returns the affected prefixes, innermost declaration first.
	pub fn close_scope(&mut self, depth: usize) -> Vec<SmartString> {
		let mut popped = Vec::new();
		while let Some((d, _)) = self.undo.last() {
			if *d != depth {
				break;
			}
			let (_, prefix) = match self.undo.pop() {
				Some(v) => v,
				None => break,
			};
			if let Some(stack) = self.bindings.get_mut(&prefix) {
				stack.pop();
			}
			popped.push(prefix);
		}
		popped
	}

	/// Number of bindings declared on top of the initial ones.
	pub fn declared(&self) -> usize {
		self.undo.len()
	}
}

impl Default for NamespaceScope {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn preseeded_bindings() {
		let ns = NamespaceScope::new();
		assert_eq!(ns.lookup(""), Some(""));
		assert_eq!(ns.lookup("xml"), Some(XMLNS_XML));
		assert_eq!(ns.lookup("xmlns"), Some(XMLNS_XMLNS));
		assert_eq!(ns.lookup("foo"), None);
	}

	#[test]
	fn reserved_prefixes_cannot_be_rebound() {
		let mut ns = NamespaceScope::new();
		assert_eq!(ns.declare("xml", "urn:evil", 1), Declaration::Unchanged);
		assert_eq!(ns.declare("xmlns", "urn:evil", 1), Declaration::Unchanged);
		assert_eq!(ns.lookup("xml"), Some(XMLNS_XML));
		assert_eq!(ns.declared(), 0);
	}

	#[test]
	fn redeclaration_is_suppressed() {
		let mut ns = NamespaceScope::new();
		assert_eq!(ns.declare("p", "urn:a", 1), Declaration::Added);
		assert_eq!(ns.declare("p", "urn:a", 2), Declaration::Unchanged);
		assert_eq!(ns.declared(), 1);
		// closing the inner element must not retract the outer binding
		assert!(ns.close_scope(2).is_empty());
		assert_eq!(ns.lookup("p"), Some("urn:a"));
	}

	#[test]
	fn empty_default_namespace_is_not_redeclared() {
		let mut ns = NamespaceScope::new();
		assert_eq!(ns.declare("", "", 1), Declaration::Unchanged);
		assert_eq!(ns.declare("", "urn:d", 1), Declaration::Added);
		assert_eq!(ns.declare("", "", 2), Declaration::Added);
		assert_eq!(ns.lookup(""), Some(""));
		ns.close_scope(2);
		assert_eq!(ns.lookup(""), Some("urn:d"));
	}

	#[test]
	fn close_scope_retracts_all_bindings_of_depth() {
		let mut ns = NamespaceScope::new();
		ns.declare("a", "urn:a", 1);
		ns.declare("b", "urn:b", 2);
		ns.declare("c", "urn:c", 2);
		let popped = ns.close_scope(2);
		assert_eq!(popped, vec![SmartString::from("c"), SmartString::from("b")]);
		assert_eq!(ns.lookup("b"), None);
		assert_eq!(ns.lookup("c"), None);
		assert_eq!(ns.lookup("a"), Some("urn:a"));
	}

	#[test]
	fn innermost_binding_wins() {
		let mut ns = NamespaceScope::new();
		ns.declare("p", "urn:outer", 1);
		ns.declare("p", "urn:inner", 3);
		assert_eq!(ns.lookup("p"), Some("urn:inner"));
		ns.close_scope(3);
		assert_eq!(ns.lookup("p"), Some("urn:outer"));
	}

	#[test]
	fn same_depth_declaration_replaces() {
		let mut ns = NamespaceScope::new();
		ns.declare("p", "urn:outer", 1);
		assert_eq!(ns.declare("p", "urn:1", 2), Declaration::Added);
		assert_eq!(ns.declare("p", "urn:2", 2), Declaration::Replaced);
		assert_eq!(ns.declare("p", "urn:2", 2), Declaration::Unchanged);
		assert_eq!(ns.lookup("p"), Some("urn:2"));
		assert_eq!(ns.declared(), 2);
		assert_eq!(ns.close_scope(2), vec![SmartString::from("p")]);
		assert_eq!(ns.lookup("p"), Some("urn:outer"));
	}

	#[test]
	fn default_namespace_replaced_on_same_element() {
		let mut ns = NamespaceScope::new();
		assert_eq!(ns.declare("", "urn:1", 1), Declaration::Added);
		assert_eq!(ns.declare("", "urn:2", 1), Declaration::Replaced);
		ns.close_scope(1);
		assert_eq!(ns.lookup(""), Some(""));
	}
}
