/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use crate::Element;
use crate::Jid;
use crate::constants::MESSAGE_TAG;

use super::BadStanza;
use super::MessageType;
use super::StanzaError;
use super::first_child_text;
use super::optional_attribute;
use super::optional_jid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStanza {
    pub from: Option<Jid>,
    pub to: Option<Jid>,
    pub id: Option<String>,
    /// The `type` attribute, absent means normal.
    pub kind: Option<MessageType>,
    pub body: Option<String>,
    pub subject: Option<String>,
    pub thread: Option<String>,
    pub error: Option<StanzaError>,
    pub element: Element,
}

impl MessageStanza {
    /// Returns `Ok(None)` if the element is not a `message`.
    pub fn from_element(element: &Element) -> Result<Option<MessageStanza>, BadStanza> {
        if element.name() != MESSAGE_TAG {
            return Ok(None);
        }
        let kind = optional_attribute(element, "type").map(|kind| MessageType::parse(&kind));
        let error = match kind {
            Some(MessageType::Error) => Some(StanzaError::from_stanza(element)?),
            _ => None,
        };
        Ok(Some(MessageStanza {
            from: optional_jid(element, "from")?,
            to: optional_jid(element, "to")?,
            id: optional_attribute(element, "id"),
            kind,
            body: first_child_text(element, "body"),
            subject: first_child_text(element, "subject"),
            thread: first_child_text(element, "thread"),
            error,
            element: element.clone(),
        }))
    }
}
