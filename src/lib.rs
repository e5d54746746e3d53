/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod commands;
mod connection;
pub(crate) mod constants;
mod element;
mod jid;
mod stanza;
mod stream;
mod wait;

#[cfg(test)]
mod testing;

pub use element::Element;
pub use element::ElementError;
pub use element::Node;

pub use jid::BadJid;
pub use jid::Jid;

pub use stream::StreamElement;
pub use stream::TransportError;
pub use stream::XmppStream;

pub use wait::KeyedWait;
pub use wait::Pending;
pub use wait::WaitError;

pub use stanza::BadStanza;
pub use stanza::IqStanza;
pub use stanza::IqType;
pub use stanza::MessageStanza;
pub use stanza::MessageType;
pub use stanza::PresenceShow;
pub use stanza::PresenceStanza;
pub use stanza::PresenceType;
pub use stanza::Stanza;
pub use stanza::StanzaError;
pub use stanza::StanzaErrorCondition;
pub use stanza::StanzaErrorType;
pub use stanza::StreamError;
pub use stanza::StreamErrorCondition;

pub use connection::Connection;
pub use connection::ConnectionBuilder;
pub use connection::ConnectionError;
pub use connection::HandlerError;

pub use commands::AUTH_NS;
pub use commands::REGISTER_NS;
pub use commands::ROSTER_NS;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const XMPP_CLIENT_PORT: u16 = constants::CLIENT_PORT;
