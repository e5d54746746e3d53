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

use crate::BadJid;

/// A stanza does not have the structure required by RFC 6120.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum BadStanza {
    /// A required attribute is absent or empty.
    Missing(&'static str),
    /// A child element which can appear at most once is repeated.
    Repeated(&'static str),
    Malformed(&'static str),
    /// An address attribute is not a valid JID.
    Jid(BadJid),
}

impl Display for BadStanza {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BadStanza::Missing(name) => write!(f, "invalid stanza: missing \"{name}\" attribute"),
            BadStanza::Repeated(name) => write!(f, "invalid stanza: multiple \"{name}\" elements"),
            BadStanza::Malformed(msg) => write!(f, "invalid stanza: {msg}"),
            BadStanza::Jid(err) => write!(f, "invalid stanza: {err}"),
        }
    }
}

impl Error for BadStanza {}

impl From<BadJid> for BadStanza {
    fn from(err: BadJid) -> Self {
        BadStanza::Jid(err)
    }
}

pub(super) mod description {
    pub(in super::super) const NO_ERROR: &str = "error type stanza without an error element";
    pub(in super::super) const NO_CONDITION: &str = "no defined condition element found";
    pub(in super::super) const MULTIPLE_CONDITIONS: &str = "multiple defined condition elements found";
    pub(in super::super) const BAD_PRIORITY: &str = "priority is not an integer between -128 and 127";
}
