/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::error::Error;
use std::fmt::Display;

use crate::BadStanza;
use crate::ElementError;
use crate::TransportError;

/// Error type returned by observers, anything convertible is accepted.
pub type HandlerError = Box<dyn Error + Send + Sync>;

#[derive(Debug)]
pub enum ConnectionError {
    /// The operation needs a connected session.
    NotConnected,
    /// `connect()` was called while already connected.
    AlreadyConnected,
    Transport(TransportError),
    BadStanza(BadStanza),
    /// The element given to a request call cannot be sent as a request.
    BadRequest(&'static str),
    /// A request with the same id is already waiting for a response.
    DuplicateRequest(String),
    /// The session was torn down before or during the operation.
    Closed,
    Element(ElementError),
}

impl Display for ConnectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionError::NotConnected => write!(f, "{}", description::NOT_CONNECTED),
            ConnectionError::AlreadyConnected => write!(f, "{}", description::ALREADY_CONNECTED),
            ConnectionError::Transport(err) => err.fmt(f),
            ConnectionError::BadStanza(err) => err.fmt(f),
            ConnectionError::BadRequest(msg) => write!(f, "invalid request: {msg}"),
            ConnectionError::DuplicateRequest(id) => {
                write!(f, "a request with id \"{id}\" is already pending")
            }
            ConnectionError::Closed => write!(f, "{}", description::CLOSED),
            ConnectionError::Element(err) => err.fmt(f),
        }
    }
}

impl Error for ConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConnectionError::Transport(err) => Some(err),
            ConnectionError::BadStanza(err) => Some(err),
            ConnectionError::Element(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for ConnectionError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Closed => ConnectionError::Closed,
            err => ConnectionError::Transport(err),
        }
    }
}

impl From<BadStanza> for ConnectionError {
    fn from(err: BadStanza) -> Self {
        ConnectionError::BadStanza(err)
    }
}

impl From<ElementError> for ConnectionError {
    fn from(err: ElementError) -> Self {
        ConnectionError::Element(err)
    }
}

pub(super) mod description {
    pub(in super::super) const NOT_CONNECTED: &str = "not connected";
    pub(in super::super) const ALREADY_CONNECTED: &str = "already connected";
    pub(in super::super) const CLOSED: &str = "connection is closed";
    pub(in super::super) const NOT_IQ: &str = "only iq elements can be sent as requests";
    pub(in super::super) const OBSERVER_PANIC: &str = "observer panicked";
}
