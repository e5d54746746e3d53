/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::error::description;
use super::*;

fn element(xml: &str) -> Element {
    xml.parse().unwrap()
}

fn classify(xml: &str) -> Result<Option<Stanza>, BadStanza> {
    Stanza::classify(&element(xml))
}

#[test]
fn classification() {
    assert!(matches!(
        classify("<iq id='1' type='get'/>"),
        Ok(Some(Stanza::Iq(_)))
    ));
    assert!(matches!(
        classify("<message/>"),
        Ok(Some(Stanza::Message(_)))
    ));
    assert!(matches!(
        classify("<presence/>"),
        Ok(Some(Stanza::Presence(_)))
    ));
    assert!(matches!(
        classify("<stream:error><conflict/></stream:error>"),
        Ok(Some(Stanza::StreamError(_)))
    ));
    assert_eq!(classify("<stream:features/>"), Ok(None));
    assert_eq!(classify("<body/>"), Ok(None));

    let features = element("<stream:features><bind/></stream:features>");
    assert_eq!(IqStanza::from_element(&features), Ok(None));
    assert_eq!(MessageStanza::from_element(&features), Ok(None));
    assert_eq!(PresenceStanza::from_element(&features), Ok(None));
    assert_eq!(StreamError::from_element(&features), Ok(None));

    let stanza = classify("<message id='m1'/>").unwrap().unwrap();
    assert_eq!(stanza.element(), &element("<message id='m1'/>"));
}

#[test]
fn iq() {
    let iq = IqStanza::from_element(&element(
        "<iq id='r1' type='result' from='example.com' to='juliet@example.com/balcony'><query xmlns='jabber:iq:roster'/></iq>",
    ))
    .unwrap()
    .unwrap();
    assert_eq!(iq.id, "r1");
    assert_eq!(iq.kind, IqType::Result);
    assert_eq!(iq.from, Some(Jid::new("example.com").unwrap()));
    assert_eq!(iq.to.as_ref().unwrap().resourcepart(), Some("balcony"));
    assert!(!iq.is_error());
    assert_eq!(iq.payload().unwrap().attribute("xmlns"), Some("jabber:iq:roster"));

    assert_eq!(
        classify("<iq type='get'/>"),
        Err(BadStanza::Missing("id"))
    );
    assert_eq!(
        classify("<iq id='' type='get'/>"),
        Err(BadStanza::Missing("id"))
    );
    assert_eq!(classify("<iq id='1'/>"), Err(BadStanza::Missing("type")));
    assert!(matches!(
        classify("<iq id='1' type='get' from='@example.com'/>"),
        Err(BadStanza::Jid(_))
    ));

    let iq = IqStanza::from_element(&element("<iq id='1' type='fetch'/>"))
        .unwrap()
        .unwrap();
    assert_eq!(iq.kind, IqType::Unknown);
    assert_eq!(iq.from, None);
}

#[test]
fn message() {
    let message = MessageStanza::from_element(&element(
        "<message from='romeo@example.net/orchard' to='juliet@example.com' type='chat' id='m1'>\
         <subject>Plans</subject><body>Art thou not Romeo?</body><body>ignored</body>\
         <thread>e0ffe42b</thread></message>",
    ))
    .unwrap()
    .unwrap();
    assert_eq!(message.kind, Some(MessageType::Chat));
    assert_eq!(message.id.as_deref(), Some("m1"));
    assert_eq!(message.from.as_ref().unwrap().localpart(), Some("romeo"));
    assert_eq!(message.to.as_ref().unwrap().bare(), "juliet@example.com");
    assert_eq!(message.body.as_deref(), Some("Art thou not Romeo?"));
    assert_eq!(message.subject.as_deref(), Some("Plans"));
    assert_eq!(message.thread.as_deref(), Some("e0ffe42b"));
    assert_eq!(message.error, None);

    let message = MessageStanza::from_element(&element("<message id=''/>"))
        .unwrap()
        .unwrap();
    assert_eq!(message.kind, None);
    assert_eq!(message.id, None);
    assert_eq!(message.body, None);
}

#[test]
fn presence() {
    let presence = PresenceStanza::from_element(&element("<presence from='a@b.com'/>"))
        .unwrap()
        .unwrap();
    assert_eq!(presence.from, Some(Jid::new("a@b.com").unwrap()));
    assert_eq!(presence.kind, None);
    assert!(presence.available());

    let presence = PresenceStanza::from_element(&element(
        "<presence><show>dnd</show><status>busy</status><priority> -5 </priority></presence>",
    ))
    .unwrap()
    .unwrap();
    assert_eq!(presence.show, Some(PresenceShow::Dnd));
    assert_eq!(presence.status.as_deref(), Some("busy"));
    assert_eq!(presence.priority, Some(-5));

    let presence = PresenceStanza::from_element(&element("<presence type='unavailable'/>"))
        .unwrap()
        .unwrap();
    assert_eq!(presence.kind, Some(PresenceType::Unavailable));
    assert!(!presence.available());

    assert_eq!(
        classify("<presence><priority>200</priority></presence>"),
        Err(BadStanza::Malformed(description::BAD_PRIORITY))
    );
    assert_eq!(
        classify("<presence><priority>high</priority></presence>"),
        Err(BadStanza::Malformed(description::BAD_PRIORITY))
    );
    assert_eq!(
        classify("<presence><show>away</show><show>xa</show></presence>"),
        Err(BadStanza::Repeated("show"))
    );
}

#[test]
fn stanza_errors() {
    let iq = IqStanza::from_element(&element(
        "<iq id='1' type='error'><error type='cancel'>\
         <item-not-found xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'/>\
         <text xmlns='urn:ietf:params:xml:ns:xmpp-stanzas'>No such item</text>\
         </error></iq>",
    ))
    .unwrap()
    .unwrap();
    let error = iq.error.unwrap();
    assert_eq!(error.kind, StanzaErrorType::Cancel);
    assert_eq!(error.condition, StanzaErrorCondition::ItemNotFound);
    assert_eq!(error.text.as_deref(), Some("No such item"));
    assert_eq!(error.element.name(), "error");

    let message = MessageStanza::from_element(&element(
        "<message type='error'><error type='wait'><recipient-unavailable/></error></message>",
    ))
    .unwrap()
    .unwrap();
    let error = message.error.unwrap();
    assert_eq!(error.kind, StanzaErrorType::Wait);
    assert_eq!(error.condition, StanzaErrorCondition::RecipientUnavailable);
    assert_eq!(error.text, None);

    let presence = PresenceStanza::from_element(&element(
        "<presence type='error'><error type='modify'><frobnicated/></error></presence>",
    ))
    .unwrap()
    .unwrap();
    assert_eq!(presence.error.unwrap().condition, StanzaErrorCondition::Unknown);

    // error children are only looked at for error type stanzas
    let iq = IqStanza::from_element(&element(
        "<iq id='1' type='result'><error type='cancel'/></iq>",
    ))
    .unwrap()
    .unwrap();
    assert_eq!(iq.error, None);
}

#[test]
fn bad_error_blocks() {
    assert_eq!(
        classify("<iq id='1' type='error'/>"),
        Err(BadStanza::Malformed(description::NO_ERROR))
    );
    assert_eq!(
        classify("<iq id='1' type='error'><error type='cancel'><conflict/></error><error type='cancel'><conflict/></error></iq>"),
        Err(BadStanza::Repeated("error"))
    );
    assert_eq!(
        classify("<iq id='1' type='error'><error><conflict/></error></iq>"),
        Err(BadStanza::Missing("type"))
    );
    assert_eq!(
        classify("<message type='error'><error type='cancel'/></message>"),
        Err(BadStanza::Malformed(description::NO_CONDITION))
    );
    assert_eq!(
        classify("<message type='error'><error type='cancel'><text>only text</text></error></message>"),
        Err(BadStanza::Malformed(description::NO_CONDITION))
    );
    assert_eq!(
        classify("<presence type='error'><error type='cancel'><conflict/><gone/></error></presence>"),
        Err(BadStanza::Malformed(description::MULTIPLE_CONDITIONS))
    );
    assert_eq!(
        classify("<presence type='error'><error type='cancel'><conflict/><text>a</text><text>b</text></error></presence>"),
        Err(BadStanza::Repeated("text"))
    );
}

#[test]
fn stream_errors() {
    let error = StreamError::from_element(&element(
        "<stream:error><conflict xmlns='urn:ietf:params:xml:ns:xmpp-streams'/></stream:error>",
    ))
    .unwrap()
    .unwrap();
    assert_eq!(error.condition, StreamErrorCondition::Conflict);
    assert_eq!(error.text, None);

    let error = StreamError::from_element(&element(
        "<stream:error><text>Replaced by new connection</text><see-other-host>b.example.com</see-other-host></stream:error>",
    ))
    .unwrap()
    .unwrap();
    assert_eq!(error.condition, StreamErrorCondition::SeeOtherHost);
    assert_eq!(error.text.as_deref(), Some("Replaced by new connection"));

    assert_eq!(
        classify("<stream:error/>"),
        Err(BadStanza::Malformed(description::NO_CONDITION))
    );
    assert_eq!(
        classify("<stream:error><conflict/><reset/></stream:error>"),
        Err(BadStanza::Malformed(description::MULTIPLE_CONDITIONS))
    );
}

#[test]
fn vocabularies() {
    assert_eq!(IqType::parse("get"), IqType::Get);
    assert_eq!(IqType::parse(" RESULT "), IqType::Result);
    assert_eq!(IqType::parse(""), IqType::Unknown);
    assert_eq!(MessageType::parse("GroupChat"), MessageType::Groupchat);
    assert_eq!(PresenceType::parse("un-subscribed"), PresenceType::Unsubscribed);
    assert_eq!(PresenceShow::parse("XA"), PresenceShow::Xa);
    assert_eq!(StanzaErrorType::parse("auth"), StanzaErrorType::Auth);

    assert_eq!(
        StanzaErrorCondition::parse("item-not-found"),
        StanzaErrorCondition::ItemNotFound
    );
    assert_eq!(
        StanzaErrorCondition::parse("ItemNotFound"),
        StanzaErrorCondition::ItemNotFound
    );
    assert_eq!(
        StanzaErrorCondition::parse("itemnotfound"),
        StanzaErrorCondition::ItemNotFound
    );
    assert_eq!(
        StanzaErrorCondition::parse("item-not-found-at-all"),
        StanzaErrorCondition::Unknown
    );
    assert_eq!(
        StreamErrorCondition::parse("Unsupported-Stanza-Type"),
        StreamErrorCondition::UnsupportedStanzaType
    );

    assert_eq!(IqType::Set.name(), Some("set"));
    assert_eq!(StreamErrorCondition::SystemShutdown.name(), Some("system-shutdown"));
    assert_eq!(StanzaErrorCondition::Unknown.name(), None);
}
