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

#[derive(Debug)]
pub enum ElementError {
    /// The pull parser rejected the input.
    BadXml(quick_xml::Error),
    /// A tag or attribute name is not valid UTF-8.
    BadEncoding,
    /// The input has no element in it.
    NoElement,
    /// The input ended before the element was closed.
    Truncated,
    /// There is something other than whitespace or comments after the element.
    TrailingContent,
}

impl Display for ElementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementError::BadXml(err) => write!(f, "invalid XML syntax: {err}"),
            ElementError::BadEncoding => write!(f, "{}", description::BAD_ENCODING),
            ElementError::NoElement => write!(f, "{}", description::NO_ELEMENT),
            ElementError::Truncated => write!(f, "{}", description::TRUNCATED),
            ElementError::TrailingContent => write!(f, "{}", description::TRAILING_CONTENT),
        }
    }
}

impl Error for ElementError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ElementError::BadXml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for ElementError {
    fn from(err: quick_xml::Error) -> Self {
        ElementError::BadXml(err)
    }
}

impl From<quick_xml::events::attributes::AttrError> for ElementError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ElementError::BadXml(err.into())
    }
}

pub(super) mod description {
    pub(in super::super) const BAD_ENCODING: &str = "name is not valid UTF-8";
    pub(in super::super) const NO_ELEMENT: &str = "input does not contain an element";
    pub(in super::super) const TRUNCATED: &str = "input ended inside an element";
    pub(in super::super) const TRAILING_CONTENT: &str = "content after the element";
}
