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
use crate::constants::PRESENCE_TAG;

use super::BadStanza;
use super::PresenceShow;
use super::PresenceType;
use super::StanzaError;
use super::error::description;
use super::first_child_text;
use super::optional_attribute;
use super::optional_jid;
use super::single_child_text;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceStanza {
    pub from: Option<Jid>,
    pub to: Option<Jid>,
    pub id: Option<String>,
    /// The `type` attribute, absent means available.
    pub kind: Option<PresenceType>,
    pub show: Option<PresenceShow>,
    pub status: Option<String>,
    pub priority: Option<i8>,
    pub error: Option<StanzaError>,
    pub element: Element,
}

impl PresenceStanza {
    /// Returns `Ok(None)` if the element is not a `presence`.
    pub fn from_element(element: &Element) -> Result<Option<PresenceStanza>, BadStanza> {
        if element.name() != PRESENCE_TAG {
            return Ok(None);
        }
        let kind = optional_attribute(element, "type").map(|kind| PresenceType::parse(&kind));
        let error = match kind {
            Some(PresenceType::Error) => Some(StanzaError::from_stanza(element)?),
            _ => None,
        };
        let priority = match single_child_text(element, "priority")? {
            Some(text) => Some(
                text.parse::<i8>()
                    .map_err(|_| BadStanza::Malformed(description::BAD_PRIORITY))?,
            ),
            None => None,
        };
        Ok(Some(PresenceStanza {
            from: optional_jid(element, "from")?,
            to: optional_jid(element, "to")?,
            id: optional_attribute(element, "id"),
            kind,
            show: single_child_text(element, "show")?.map(|show| PresenceShow::parse(&show)),
            status: first_child_text(element, "status"),
            priority,
            error,
            element: element.clone(),
        }))
    }

    /// True when the sender is available, i.e. the presence has no type.
    pub fn available(&self) -> bool {
        self.kind.is_none()
    }
}
