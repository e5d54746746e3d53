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
use crate::constants::STREAM_ERROR_TAG;

use super::BadStanza;
use super::StanzaErrorCondition;
use super::StanzaErrorType;
use super::StreamErrorCondition;
use super::error::description;
use super::required_attribute;

const ERROR_TAG: &str = "error";
const TEXT_TAG: &str = "text";

/// Splits an error element into its defined condition name and text.
///
/// The error must have exactly one child other than `text`, which names
/// the condition, and at most one `text` child.
fn condition_and_text(error: &Element) -> Result<(&str, Option<String>), BadStanza> {
    let mut condition = None;
    let mut text = None;
    for child in error.child_elements() {
        if child.name() == TEXT_TAG {
            if text.is_some() {
                return Err(BadStanza::Repeated(TEXT_TAG));
            }
            text = Some(child.text().trim().to_string());
        } else {
            if condition.is_some() {
                return Err(BadStanza::Malformed(description::MULTIPLE_CONDITIONS));
            }
            condition = Some(child.name());
        }
    }
    let condition = condition.ok_or(BadStanza::Malformed(description::NO_CONDITION))?;
    Ok((condition, text.filter(|text| !text.is_empty())))
}

/// Stream level error sent by the server before it closes the stream
/// (RFC 6120 section 4.9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamError {
    pub condition: StreamErrorCondition,
    /// Descriptive text supplementing the condition.
    pub text: Option<String>,
    pub element: Element,
}

impl StreamError {
    /// Returns `Ok(None)` if the element is not a `stream:error`.
    pub fn from_element(element: &Element) -> Result<Option<StreamError>, BadStanza> {
        if element.name() != STREAM_ERROR_TAG {
            return Ok(None);
        }
        let (condition, text) = condition_and_text(element)?;
        Ok(Some(StreamError {
            condition: StreamErrorCondition::parse(condition),
            text,
            element: element.clone(),
        }))
    }
}

/// The `error` child of a stanza whose type is `error` (RFC 6120 section 8.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StanzaError {
    /// The `type` attribute of the error element.
    pub kind: StanzaErrorType,
    pub condition: StanzaErrorCondition,
    pub text: Option<String>,
    /// The `error` element itself.
    pub element: Element,
}

impl StanzaError {
    /// Extracts the error of a stanza already known to be of error type.
    pub fn from_stanza(stanza: &Element) -> Result<StanzaError, BadStanza> {
        let mut errors = stanza.find_children(ERROR_TAG);
        let error = errors
            .next()
            .ok_or(BadStanza::Malformed(description::NO_ERROR))?;
        if errors.next().is_some() {
            return Err(BadStanza::Repeated(ERROR_TAG));
        }
        let kind = required_attribute(error, "type")?;
        let (condition, text) = condition_and_text(error)?;
        Ok(StanzaError {
            kind: StanzaErrorType::parse(&kind),
            condition: StanzaErrorCondition::parse(condition),
            text,
            element: error.clone(),
        })
    }
}
