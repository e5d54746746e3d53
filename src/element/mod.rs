/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod builder;
mod error;

use std::fmt::Display;
use std::str::FromStr;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;

pub(crate) use builder::element_from_start;
pub(crate) use builder::read_element;
pub use error::ElementError;


/// A child of an [Element].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An owned XML element tree.
///
/// Elements read from the stream are never modified afterwards; outgoing
/// stanzas are assembled with the builder style `with_*` methods or the
/// in-place `set_*`/`append_*` methods before they are sent.
///
/// Names are kept exactly as they appear in the markup including any
/// namespace prefix, so a stream error element is named `stream:error`.
///
/// ```
/// use jabberwire::Element;
///
/// let iq = Element::new("iq")
///     .with_attribute("type", "get")
///     .with_child(Element::new("query").with_attribute("xmlns", "jabber:iq:roster"));
/// assert_eq!(
///     iq.to_string(),
///     "<iq type=\"get\"><query xmlns=\"jabber:iq:roster\"/></iq>"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Element {
        Element {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Sets the attribute value, replacing any previous value of the same name.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, old)) => *old = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Element {
        self.set_attribute(name, value);
        self
    }

    pub fn append_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn with_child(mut self, child: Element) -> Element {
        self.append_child(child);
        self
    }

    /// Appends character data, merging it with a directly preceding text node.
    pub fn append_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    pub fn with_text(mut self, text: &str) -> Element {
        self.append_text(text);
        self
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    pub fn find_children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.child_elements()
            .filter(move |element| element.name == name)
    }

    /// Returns the first child element with the given name.
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|element| element.name == name)
    }

    /// Concatenated character data of the direct text children.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            if let Node::Text(part) = node {
                text.push_str(part);
            }
        }
        text
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Element) -> bool {
        self.name == other.name
            && self.attributes.len() == other.attributes.len()
            && self
                .attributes()
                .all(|(key, value)| other.attribute(key) == Some(value))
            && self.children == other.children
    }
}

impl Eq for Element {}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {}=\"{}\"", key, escape(value))?;
        }
        if self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        for node in &self.children {
            match node {
                Node::Element(element) => element.fmt(f)?,
                Node::Text(text) => f.write_str(&escape(text))?,
            }
        }
        write!(f, "</{}>", self.name)
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

impl FromStr for Element {
    type Err = ElementError;

    /// Parses a single element, optionally preceded by an XML declaration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut reader = Reader::from_reader(s.as_bytes());
        let mut buf = Vec::new();
        let element = loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let root = element_from_start(&start)?;
                    break read_element(&mut reader, &mut buf, root)?;
                }
                Event::Empty(start) => break element_from_start(&start)?,
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Text(text) if is_blank(&text) => {}
                _ => return Err(ElementError::NoElement),
            }
        };
        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Eof => return Ok(element),
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(text) if is_blank(&text) => {}
                _ => return Err(ElementError::TrailingContent),
            }
        }
    }
}
