//! A small owned element tree over `quick-xml`, enough for path lookups into upstream
//! responses without a full DOM.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::error::LookupError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name, namespace prefix dropped.
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    text: String,
}

impl Element {
    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<Element, LookupError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Eof => break,
                Event::Start(e) => stack.push(open(&e)),
                Event::Empty(e) => {
                    let el = open(&e);
                    attach(&mut stack, &mut root, el);
                }
                Event::End(_) => {
                    let mut el = stack
                        .pop()
                        .ok_or_else(|| LookupError::malformed("unbalanced end tag"))?;
                    el.text = el.text.trim().to_string();
                    attach(&mut stack, &mut root, el);
                }
                Event::Text(t) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(t.as_ref()));
                    }
                }
                Event::CData(t) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(t.as_ref()));
                    }
                }
                Event::GeneralRef(r) => {
                    if let Some(top) = stack.last_mut() {
                        let name = String::from_utf8_lossy(r.as_ref()).into_owned();
                        match resolve_entity(&name) {
                            Some(s) => top.text.push_str(&s),
                            None => {
                                top.text.push('&');
                                top.text.push_str(&name);
                                top.text.push(';');
                            }
                        }
                    }
                }
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(LookupError::malformed("unexpected end of document"));
        }
        root.ok_or_else(|| LookupError::malformed("document has no root element"))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a chain of child names, taking the first match at each step.
    pub fn path(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    /// Text at `path`, if the element exists and is non-empty.
    pub fn path_text(&self, path: &[&str]) -> Option<String> {
        self.path(path)
            .map(Element::text)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

fn open(e: &BytesStart<'_>) -> Element {
    let attrs = e
        .attributes()
        .flatten()
        .map(|a| {
            (
                String::from_utf8_lossy(a.key.local_name().as_ref()).into_owned(),
                String::from_utf8_lossy(a.value.as_ref()).into_owned(),
            )
        })
        .collect();
    Element {
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        attrs,
        children: Vec::new(),
        text: String::new(),
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None => {
            root.get_or_insert(el);
        }
    }
}

fn resolve_entity(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let root = Element::parse(
            r#"<?xml version="1.0"?>
            <a><b x="1"><c>hello</c></b><b x="2"/></a>"#,
        )
        .unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.children_named("b").count(), 2);
        assert_eq!(root.path_text(&["b", "c"]).as_deref(), Some("hello"));
        assert_eq!(root.children[1].attr("x"), Some("2"));
    }

    #[test]
    fn resolves_entities_without_losing_spaces() {
        let root = Element::parse("<t>Cats &amp; dogs &#233;t&#xE9;</t>").unwrap();
        assert_eq!(root.text(), "Cats & dogs été");
    }

    #[test]
    fn strips_namespace_prefixes() {
        let root = Element::parse(r#"<x:a xmlns:x="urn:x"><x:b>v</x:b></x:a>"#).unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.path_text(&["b"]).as_deref(), Some("v"));
    }

    #[test]
    fn rejects_truncated_documents() {
        assert!(Element::parse("<a><b>").is_err());
        assert!(Element::parse("").is_err());
        assert!(Element::parse("<a></b>").is_err());
    }
}
