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
use std::sync::Arc;

use crate::ElementError;

#[derive(Debug)]
pub enum TransportError {
    IOError(std::io::Error),
    BadXml(quick_xml::Error),
    BadElement(ElementError),
    BadStream(&'static str),
    UnexpectedTag(String),
    Closed,
}

impl TransportError {
    /// Returns true if the error came from reading after the stream was
    /// closed on this side.
    pub fn is_closed(&self) -> bool {
        matches!(self, TransportError::Closed)
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::IOError(err) => err.fmt(f),
            TransportError::BadXml(err) => write!(f, "invalid XML syntax: {err}"),
            TransportError::BadElement(err) => err.fmt(f),
            TransportError::BadStream(msg) => write!(f, "invalid stream protocol: {msg}"),
            TransportError::UnexpectedTag(name) => {
                write!(f, "invalid stream protocol: unexpected top level element <{name}>")
            }
            TransportError::Closed => write!(f, "stream is closed"),
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransportError::IOError(err) => Some(err),
            TransportError::BadXml(err) => Some(err),
            TransportError::BadElement(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::IOError(err)
    }
}

impl From<quick_xml::Error> for TransportError {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(err) => {
                let err = Arc::try_unwrap(err)
                    .unwrap_or_else(|err| std::io::Error::new(err.kind(), err.to_string()));
                TransportError::IOError(err)
            }
            err => TransportError::BadXml(err),
        }
    }
}

impl From<ElementError> for TransportError {
    fn from(err: ElementError) -> Self {
        match err {
            ElementError::BadXml(err) => TransportError::from(err),
            ElementError::Truncated => TransportError::BadStream(description::NO_DATA),
            err => TransportError::BadElement(err),
        }
    }
}

pub(super) mod description {
    pub(in super::super) const NO_ADDRESS: &str = "host name did not resolve to any address";
    pub(in super::super) const NO_DATA: &str = "connection closed without closing the stream";
    pub(in super::super) const EXPECTED_OPEN: &str = "expected the stream open tag";
    pub(in super::super) const UNEXPECTED_TEXT: &str = "character data outside of stanzas";
    pub(in super::super) const UNEXPECTED_NODE: &str = "unexpected node outside of stanzas";
}
