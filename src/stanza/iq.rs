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
use crate::constants::IQ_TAG;

use super::BadStanza;
use super::IqType;
use super::StanzaError;
use super::optional_jid;
use super::required_attribute;

/// Info/Query stanza, the request/response exchange of XMPP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IqStanza {
    /// Correlates a response to its request.
    pub id: String,
    /// The `type` attribute.
    pub kind: IqType,
    pub from: Option<Jid>,
    pub to: Option<Jid>,
    /// Set when the type is `error`.
    pub error: Option<StanzaError>,
    pub element: Element,
}

impl IqStanza {
    /// Returns `Ok(None)` if the element is not an `iq`.
    pub fn from_element(element: &Element) -> Result<Option<IqStanza>, BadStanza> {
        if element.name() != IQ_TAG {
            return Ok(None);
        }
        let id = required_attribute(element, "id")?;
        let kind = IqType::parse(&required_attribute(element, "type")?);
        let error = match kind {
            IqType::Error => Some(StanzaError::from_stanza(element)?),
            _ => None,
        };
        Ok(Some(IqStanza {
            id,
            kind,
            from: optional_jid(element, "from")?,
            to: optional_jid(element, "to")?,
            error,
            element: element.clone(),
        }))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The first child element, which carries the payload namespace.
    pub fn payload(&self) -> Option<&Element> {
        self.element
            .child_elements()
            .find(|child| child.name() != "error")
    }
}
