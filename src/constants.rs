/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

pub const CLIENT_PORT: u16 = 5222;

pub const STREAM_TAG: &str = "stream:stream";

pub const FEATURES_TAG: &str = "stream:features";

pub const STREAM_ERROR_TAG: &str = "stream:error";

pub const IQ_TAG: &str = "iq";

pub const MESSAGE_TAG: &str = "message";

pub const PRESENCE_TAG: &str = "presence";

pub const STREAM_NS: &str = "http://etherx.jabber.org/streams";

pub const CLIENT_NS: &str = "jabber:client";

/// Names accepted as top level elements of an inbound stream.
pub const TOP_LEVEL_TAGS: [&str; 5] = [
    IQ_TAG,
    MESSAGE_TAG,
    PRESENCE_TAG,
    FEATURES_TAG,
    STREAM_ERROR_TAG,
];

pub const STREAM_CLOSE: &str = "</stream:stream>";
