/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;

use std::fmt::Display;
use std::str::FromStr;

pub use error::BadJid;
use error::description;

const MAX_PART_SIZE: usize = 1023;

fn check_resource(resource: &str) -> Result<(), BadJid> {
    if resource.is_empty() {
        return Err(BadJid(description::RESOURCE_EMPTY));
    }
    if resource.len() > MAX_PART_SIZE {
        return Err(BadJid(description::RESOURCE_TOO_LONG));
    }
    Ok(())
}

/// The address of an entity in the XMPP protocol.
///
/// Each JID has three parts:
/// - Local part: Optionally identifies an account on the domain.
/// - Domain part: Identifies the XMPP server, always present.
/// - Resource part: Optionally identifies a connected device or session.
///
/// The text form `local@domain/resource` is kept exactly as given, so
/// formatting a parsed JID gives back the original string.
///
/// ```
/// use jabberwire::Jid;
///
/// let jid: Jid = "juliet@example.com/balcony".parse().unwrap();
/// assert_eq!(jid.localpart(), Some("juliet"));
/// assert_eq!(jid.domainpart(), "example.com");
/// assert_eq!(jid.resourcepart(), Some("balcony"));
/// assert_eq!(jid.to_string(), "juliet@example.com/balcony");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Jid {
    full: String,
    at_pos: Option<usize>,
    slash_pos: Option<usize>,
}

impl Jid {
    pub fn new(jid: &str) -> Result<Jid, BadJid> {
        // The resource may contain '@' and '/' so it is split off first.
        let slash_pos = jid.find('/');
        let bare = match slash_pos {
            Some(pos) => &jid[..pos],
            None => jid,
        };
        let at_pos = bare.find('@');
        let domain = match at_pos {
            Some(pos) => &bare[pos + 1..],
            None => bare,
        };
        if domain.is_empty() {
            return Err(BadJid(description::DOMAIN_EMPTY));
        }
        if domain.len() > MAX_PART_SIZE {
            return Err(BadJid(description::DOMAIN_TOO_LONG));
        }
        if domain.contains('@') {
            return Err(BadJid(description::DOMAIN_AT_SIGN));
        }
        if let Some(pos) = at_pos {
            if pos == 0 {
                return Err(BadJid(description::LOCAL_EMPTY));
            }
            if pos > MAX_PART_SIZE {
                return Err(BadJid(description::LOCAL_TOO_LONG));
            }
        }
        if let Some(pos) = slash_pos {
            check_resource(&jid[pos + 1..])?;
        }

        Ok(Jid {
            full: jid.to_string(),
            at_pos,
            slash_pos,
        })
    }

    pub fn full(&self) -> &str {
        &self.full
    }

    pub fn bare(&self) -> &str {
        match self.slash_pos {
            Some(pos) => &self.full[..pos],
            None => &self.full,
        }
    }

    pub fn localpart(&self) -> Option<&str> {
        self.at_pos.map(|pos| &self.full[..pos])
    }

    pub fn domainpart(&self) -> &str {
        let start = match self.at_pos {
            Some(pos) => pos + 1,
            None => 0,
        };
        let end = self.slash_pos.unwrap_or(self.full.len());
        &self.full[start..end]
    }

    pub fn resourcepart(&self) -> Option<&str> {
        self.slash_pos.map(|pos| &self.full[pos + 1..])
    }

    pub fn is_bare(&self) -> bool {
        self.slash_pos.is_none()
    }

    /// Returns the JID without its resource part.
    pub fn to_bare(&self) -> Jid {
        Jid {
            full: self.bare().to_string(),
            at_pos: self.at_pos,
            slash_pos: None,
        }
    }

    pub fn with_resource(self, resource: &str) -> Result<Jid, BadJid> {
        check_resource(resource)?;
        let bare = self.bare();
        let mut full = String::with_capacity(bare.len() + 1 + resource.len());
        full.push_str(bare);
        full.push('/');
        full.push_str(resource);
        Ok(Jid {
            slash_pos: Some(bare.len()),
            at_pos: self.at_pos,
            full,
        })
    }
}

impl Display for Jid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full)
    }
}

impl FromStr for Jid {
    type Err = BadJid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Jid::new(s)
    }
}

#[cfg(test)]
mod tests;
