/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Closed value sets of the protocol with a fallback for unknown values.
//!
//! Parsing trims the text, ignores case, and ignores hyphens, so
//! `"item-not-found"`, `"ItemNotFound"` and `"itemnotfound"` are the same.

fn same_word(text: &str, canonical: &str) -> bool {
    let mut text = text
        .trim()
        .chars()
        .filter(|c| *c != '-')
        .flat_map(char::to_lowercase);
    let mut canonical = canonical.chars().filter(|c| *c != '-');
    loop {
        match (text.next(), canonical.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a == b => {}
            _ => return false,
        }
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident => $text:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant, )*
            /// A value not listed in the RFC, the element has the actual text.
            Unknown,
        }

        impl $name {
            pub fn parse(text: &str) -> $name {
                $(
                    if same_word(text, $text) {
                        return $name::$variant;
                    }
                )*
                $name::Unknown
            }

            /// Spelling of the value on the wire, `None` for unknown values.
            pub fn name(&self) -> Option<&'static str> {
                match self {
                    $( $name::$variant => Some($text), )*
                    $name::Unknown => None,
                }
            }
        }
    };
}

vocabulary! {
    /// IQ stanza types (RFC 6120 section 8.2.3).
    IqType {
        /// Requests information.
        Get => "get",
        /// Provides data, sets new values, or replaces existing values.
        Set => "set",
        /// Response to a successful get or set request.
        Result => "result",
        /// Reports an error about a get or set request.
        Error => "error",
    }
}

vocabulary! {
    /// Message stanza types (RFC 6121 section 5.2.2).
    MessageType {
        Chat => "chat",
        Error => "error",
        Groupchat => "groupchat",
        Headline => "headline",
        Normal => "normal",
    }
}

vocabulary! {
    /// Presence stanza types (RFC 6121 section 4.7.1).
    ///
    /// A presence without a type attribute means available.
    PresenceType {
        Error => "error",
        Probe => "probe",
        Subscribe => "subscribe",
        Subscribed => "subscribed",
        Unavailable => "unavailable",
        Unsubscribe => "unsubscribe",
        Unsubscribed => "unsubscribed",
    }
}

vocabulary! {
    /// Availability sub-states of a presence (RFC 6121 section 4.7.2.1).
    PresenceShow {
        Away => "away",
        Chat => "chat",
        Dnd => "dnd",
        Xa => "xa",
    }
}

vocabulary! {
    /// Stanza error types (RFC 6120 section 8.3.2).
    StanzaErrorType {
        /// Retry after providing credentials.
        Auth => "auth",
        /// Do not retry, the error cannot be remedied.
        Cancel => "cancel",
        /// Proceed, the condition was only a warning.
        Continue => "continue",
        /// Retry after changing the data sent.
        Modify => "modify",
        /// Retry after waiting, the error is temporary.
        Wait => "wait",
    }
}

vocabulary! {
    /// Defined conditions of stanza errors (RFC 6120 section 8.3.3).
    StanzaErrorCondition {
        BadRequest => "bad-request",
        Conflict => "conflict",
        FeatureNotImplemented => "feature-not-implemented",
        Forbidden => "forbidden",
        Gone => "gone",
        InternalServerError => "internal-server-error",
        ItemNotFound => "item-not-found",
        JidMalformed => "jid-malformed",
        NotAcceptable => "not-acceptable",
        NotAllowed => "not-allowed",
        NotAuthorized => "not-authorized",
        PolicyViolation => "policy-violation",
        RecipientUnavailable => "recipient-unavailable",
        Redirect => "redirect",
        RegistrationRequired => "registration-required",
        RemoteServerNotFound => "remote-server-not-found",
        RemoteServerTimeout => "remote-server-timeout",
        ResourceConstraint => "resource-constraint",
        ServiceUnavailable => "service-unavailable",
        SubscriptionRequired => "subscription-required",
        UndefinedCondition => "undefined-condition",
        UnexpectedRequest => "unexpected-request",
    }
}

vocabulary! {
    /// Defined conditions of stream errors (RFC 6120 section 4.9.3).
    StreamErrorCondition {
        BadFormat => "bad-format",
        BadNamespacePrefix => "bad-namespace-prefix",
        Conflict => "conflict",
        ConnectionTimeout => "connection-timeout",
        HostGone => "host-gone",
        HostUnknown => "host-unknown",
        ImproperAddressing => "improper-addressing",
        InternalServerError => "internal-server-error",
        InvalidFrom => "invalid-from",
        InvalidNamespace => "invalid-namespace",
        InvalidXml => "invalid-xml",
        NotAuthorized => "not-authorized",
        NotWellFormed => "not-well-formed",
        PolicyViolation => "policy-violation",
        RemoteConnectionFailed => "remote-connection-failed",
        Reset => "reset",
        ResourceConstraint => "resource-constraint",
        RestrictedXml => "restricted-xml",
        SeeOtherHost => "see-other-host",
        SystemShutdown => "system-shutdown",
        UndefinedCondition => "undefined-condition",
        UnsupportedEncoding => "unsupported-encoding",
        UnsupportedFeature => "unsupported-feature",
        UnsupportedStanzaType => "unsupported-stanza-type",
        UnsupportedVersion => "unsupported-version",
    }
}
