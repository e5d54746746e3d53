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

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum WaitError {
    /// There is already a caller waiting on this key.
    Duplicate,
    /// The table was closed before or while waiting.
    Closed,
}

impl Display for WaitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitError::Duplicate => write!(f, "there is already a waiting call for this key"),
            WaitError::Closed => write!(f, "keyed wait is closed"),
        }
    }
}

impl Error for WaitError {}
