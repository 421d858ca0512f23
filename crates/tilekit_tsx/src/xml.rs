//! Minimal element tree built from quick-xml events

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::str::FromStr;

use crate::error::TsxError;

/// An XML element with its attributes, child elements and text content
#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    fn from_start(elem: &BytesStart) -> Result<Self, TsxError> {
        let name = std::str::from_utf8(elem.name().as_ref())
            .map_err(|e| TsxError::Xml(format!("invalid UTF-8 in element name: {}", e)))?
            .to_string();

        let mut attrs = Vec::new();
        for attr_result in elem.attributes() {
            let attr =
                attr_result.map_err(|e| TsxError::Xml(format!("attribute error: {}", e)))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| TsxError::Xml(format!("invalid UTF-8 in attribute key: {}", e)))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| TsxError::Xml(format!("invalid attribute value: {}", e)))?
                .into_owned();
            attrs.push((key, value));
        }

        Ok(Self {
            name,
            attrs,
            children: Vec::new(),
            text: String::new(),
        })
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parse an optional attribute
    pub fn parse_attr<T>(&self, key: &str) -> Result<Option<T>, TsxError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.attr(key) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|e: T::Err| self.invalid(key, raw, e.to_string())),
        }
    }

    /// Parse a required attribute
    pub fn required_attr<T>(&self, key: &str) -> Result<T, TsxError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.parse_attr(key)?
            .ok_or_else(|| TsxError::MissingAttribute {
                element: self.name.clone(),
                attribute: key.to_string(),
            })
    }

    pub fn invalid(&self, key: &str, value: &str, reason: impl Into<String>) -> TsxError {
        TsxError::InvalidAttribute {
            element: self.name.clone(),
            attribute: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }
}

/// Parse a whole document and return its root element
pub(crate) fn parse_document(xml: &str) -> Result<Element, TsxError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                stack.push(Element::from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = Element::from_start(e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| TsxError::Xml("unbalanced closing tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Ok(Event::Text(ref t)) => {
                if let Some(current) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .map_err(|e| TsxError::Xml(format!("invalid text content: {}", e)))?;
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(ref c)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(c));
                }
            }
            Ok(Event::Eof) => {
                return Err(TsxError::Xml(if stack.is_empty() {
                    "empty document".to_string()
                } else {
                    format!("unexpected end of document inside <{}>", stack[stack.len() - 1].name)
                }));
            }
            Err(e) => {
                return Err(TsxError::Xml(format!(
                    "at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {} // Skip comments, declarations, etc.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_tree() {
        let root = parse_document(
            r#"<?xml version="1.0"?>
            <a x="1"><b y="2"/><c>hello &amp; bye</c></a>"#,
        )
        .unwrap();

        assert_eq!(root.name, "a");
        assert_eq!(root.attr("x"), Some("1"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.child("b").and_then(|b| b.attr("y")), Some("2"));
        assert_eq!(root.child("c").map(|c| c.text.as_str()), Some("hello & bye"));
    }

    #[test]
    fn test_required_attr_errors() {
        let root = parse_document(r#"<tile id="x"/>"#).unwrap();
        assert!(matches!(
            root.required_attr::<u32>("id"),
            Err(TsxError::InvalidAttribute { .. })
        ));
        assert!(matches!(
            root.required_attr::<u32>("missing"),
            Err(TsxError::MissingAttribute { .. })
        ));
        assert_eq!(root.parse_attr::<u32>("missing").unwrap(), None);
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(parse_document("").is_err());
        assert!(parse_document("<a><b></a>").is_err());
        assert!(parse_document("<a>").is_err());
    }
}
