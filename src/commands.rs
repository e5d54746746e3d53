/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Ready made stanzas for common client tasks.
//!
//! The free functions build the elements, the [Connection] methods send
//! them. Requests return the response as an [IqStanza], or `None` if the
//! timeout expired before a response arrived.

use std::time::Duration;

use uuid::Uuid;

use crate::Connection;
use crate::ConnectionError;
use crate::Element;
use crate::IqStanza;
use crate::Jid;

pub const AUTH_NS: &str = "jabber:iq:auth";
pub const REGISTER_NS: &str = "jabber:iq:register";
pub const ROSTER_NS: &str = "jabber:iq:roster";

fn query(namespace: &str) -> Element {
    Element::new("query").with_attribute("xmlns", namespace)
}

fn text_child(name: &str, text: &str) -> Element {
    Element::new(name).with_text(text)
}

/// Random resource for sessions the user did not name.
fn random_resource() -> String {
    Uuid::new_v4().to_string()
}

/// Non-SASL authentication request (XEP-0078).
pub fn authenticate(user: &str, password: &str, resource: &str) -> Element {
    Element::new("iq").with_attribute("type", "set").with_child(
        query(AUTH_NS)
            .with_child(text_child("username", user))
            .with_child(text_child("password", password))
            .with_child(text_child("resource", resource)),
    )
}

/// In-band account registration request (XEP-0077).
pub fn register(domain: &str, user: &str, password: &str) -> Element {
    Element::new("iq")
        .with_attribute("type", "set")
        .with_attribute("to", domain)
        .with_child(
            query(REGISTER_NS)
                .with_child(text_child("username", user))
                .with_child(text_child("password", password)),
        )
}

/// Roster retrieval request (RFC 6121 section 2.1.3).
pub fn roster() -> Element {
    Element::new("iq")
        .with_attribute("type", "get")
        .with_child(query(ROSTER_NS))
}

pub fn message(id: &str, to: &Jid, body: &str) -> Element {
    Element::new("message")
        .with_attribute("id", id)
        .with_attribute("type", "chat")
        .with_attribute("to", to.full())
        .with_child(text_child("body", body))
}

/// Initial presence, announces availability to the server.
pub fn presence() -> Element {
    Element::new("presence")
}

fn response_iq(response: Option<Element>) -> Result<Option<IqStanza>, ConnectionError> {
    match response {
        Some(response) => Ok(IqStanza::from_element(&response)?),
        None => Ok(None),
    }
}

impl Connection {
    /// Logs in, a random resource is used if none is given.
    pub fn authenticate(
        &self,
        user: &str,
        password: &str,
        resource: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Option<IqStanza>, ConnectionError> {
        let resource = match resource {
            Some(resource) => resource.to_string(),
            None => random_resource(),
        };
        let response = self.send_request(authenticate(user, password, &resource), timeout)?;
        response_iq(response)
    }

    /// Creates an account on the connection's domain.
    pub fn register(
        &self,
        user: &str,
        password: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<IqStanza>, ConnectionError> {
        let response = self.send_request(register(self.domain(), user, password), timeout)?;
        response_iq(response)
    }

    pub fn roster(&self, timeout: Option<Duration>) -> Result<Option<IqStanza>, ConnectionError> {
        let response = self.send_request(roster(), timeout)?;
        response_iq(response)
    }

    /// Sends a chat message.
    pub fn message(&self, body: &str, to: &Jid) -> Result<(), ConnectionError> {
        self.send(&message(&self.next_id(), to, body))
    }

    pub fn presence(&self) -> Result<(), ConnectionError> {
        self.send(&presence())
    }
}
