/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Typed views over the top level elements of an XMPP stream.
//!
//! Each stanza kind has a `from_element` constructor which returns
//! `Ok(None)` when the element is of some other kind, so the classifiers
//! can be tried one after another. Structural problems are reported as
//! [BadStanza] instead of being papered over with defaults.

mod error;
mod fault;
mod iq;
mod message;
mod presence;
mod vocabulary;

use crate::Element;
use crate::Jid;

pub use error::BadStanza;
pub use fault::StanzaError;
pub use fault::StreamError;
pub use iq::IqStanza;
pub use message::MessageStanza;
pub use presence::PresenceStanza;
pub use vocabulary::IqType;
pub use vocabulary::MessageType;
pub use vocabulary::PresenceShow;
pub use vocabulary::PresenceType;
pub use vocabulary::StanzaErrorCondition;
pub use vocabulary::StanzaErrorType;
pub use vocabulary::StreamErrorCondition;

/// Returns the value of an attribute which must be present and non-empty.
pub(crate) fn required_attribute(element: &Element, name: &'static str) -> Result<String, BadStanza> {
    match element.attribute(name) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(BadStanza::Missing(name)),
    }
}

/// Empty attribute values are treated as absent.
fn optional_attribute(element: &Element, name: &str) -> Option<String> {
    element
        .attribute(name)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn optional_jid(element: &Element, name: &str) -> Result<Option<Jid>, BadStanza> {
    match element.attribute(name).filter(|value| !value.is_empty()) {
        Some(value) => Ok(Some(Jid::new(value)?)),
        None => Ok(None),
    }
}

/// Trimmed text of the first child with the given name, empty is absent.
fn first_child_text(element: &Element, name: &str) -> Option<String> {
    let text = element.find_child(name)?.text();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Text of a child which may appear at most once.
fn single_child_text(element: &Element, name: &'static str) -> Result<Option<String>, BadStanza> {
    let mut children = element.find_children(name);
    let first = children.next();
    if children.next().is_some() {
        return Err(BadStanza::Repeated(name));
    }
    Ok(first.map(|child| child.text().trim().to_string()))
}

/// A classified top level element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stanza {
    Iq(IqStanza),
    Message(MessageStanza),
    Presence(PresenceStanza),
    StreamError(StreamError),
}

impl Stanza {
    /// Classifies an element, the first matching kind wins.
    ///
    /// Returns `Ok(None)` for elements which are not stanzas, such as
    /// `stream:features`.
    pub fn classify(element: &Element) -> Result<Option<Stanza>, BadStanza> {
        if let Some(iq) = IqStanza::from_element(element)? {
            return Ok(Some(Stanza::Iq(iq)));
        }
        if let Some(error) = StreamError::from_element(element)? {
            return Ok(Some(Stanza::StreamError(error)));
        }
        if let Some(message) = MessageStanza::from_element(element)? {
            return Ok(Some(Stanza::Message(message)));
        }
        if let Some(presence) = PresenceStanza::from_element(element)? {
            return Ok(Some(Stanza::Presence(presence)));
        }
        Ok(None)
    }

    /// The element this stanza was classified from.
    pub fn element(&self) -> &Element {
        match self {
            Stanza::Iq(iq) => &iq.element,
            Stanza::Message(message) => &message.element,
            Stanza::Presence(presence) => &presence.element,
            Stanza::StreamError(error) => &error.element,
        }
    }
}

#[cfg(test)]
mod tests;
