/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;

use super::Element;
use super::ElementError;

pub(crate) fn element_from_start(start: &BytesStart) -> Result<Element, ElementError> {
    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref()).map_err(|_| ElementError::BadEncoding)?;
    let mut element = Element::new(name);
    for attr in start.attributes() {
        let attr = attr?;
        let key =
            std::str::from_utf8(attr.key.as_ref()).map_err(|_| ElementError::BadEncoding)?;
        let value = attr.unescape_value()?;
        element.set_attribute(key, &value);
    }
    Ok(element)
}

/// Assembles an element tree from pull parser events.
///
/// The builder starts with the root element whose start tag has already
/// been consumed and keeps a stack of open elements. Completed children are
/// attached to their parent when their end tag arrives.
pub(crate) struct ElementBuilder {
    stack: Vec<Element>,
}

impl ElementBuilder {
    pub(crate) fn new(root: Element) -> Self {
        ElementBuilder { stack: vec![root] }
    }

    fn attach(&mut self, element: Element) -> Option<Element> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.append_child(element);
                None
            }
            None => Some(element),
        }
    }

    /// Returns the root element once its end tag is seen.
    pub(crate) fn push_event(&mut self, event: Event) -> Result<Option<Element>, ElementError> {
        match event {
            Event::Start(start) => {
                self.stack.push(element_from_start(&start)?);
                Ok(None)
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                Ok(self.attach(element))
            }
            Event::End(_) => match self.stack.pop() {
                Some(element) => Ok(self.attach(element)),
                None => Err(ElementError::NoElement),
            },
            Event::Text(text) => {
                let text = text.unescape()?;
                if text.is_empty() {
                    return Ok(None);
                }
                if let Some(parent) = self.stack.last_mut() {
                    parent.append_text(&text);
                }
                Ok(None)
            }
            Event::CData(cdata) => {
                let text = String::from_utf8(cdata.into_inner().into_owned())
                    .map_err(|_| ElementError::BadEncoding)?;
                if let Some(parent) = self.stack.last_mut() {
                    parent.append_text(&text);
                }
                Ok(None)
            }
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => Ok(None),
            Event::Eof => Err(ElementError::Truncated),
        }
    }
}

/// Reads the rest of an element whose start tag was just returned by the reader.
pub(crate) fn read_element<R: BufRead>(
    reader: &mut Reader<R>,
    buf: &mut Vec<u8>,
    root: Element,
) -> Result<Element, ElementError> {
    let mut builder = ElementBuilder::new(root);
    loop {
        buf.clear();
        let event = reader.read_event_into(buf)?;
        if let Some(element) = builder.push_event(event)? {
            return Ok(element);
        }
    }
}
