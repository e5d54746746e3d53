/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::sync::Arc;
use std::thread;

use tracing::warn;

use super::ConnectionError;
use super::HandlerError;
use super::error::description;
use crate::Element;
use crate::IqStanza;
use crate::MessageStanza;
use crate::PresenceStanza;
use crate::StreamError;

pub(super) type Observer<T> = Arc<dyn Fn(&T) -> Result<(), HandlerError> + Send + Sync>;

pub(super) type ExceptionObserver = Arc<dyn Fn(&HandlerError) + Send + Sync>;

/// Callbacks registered on a connection, one list per event.
#[derive(Default)]
pub(super) struct Observers {
    pub(super) element: Vec<Observer<Element>>,
    pub(super) stream_error: Vec<Observer<StreamError>>,
    pub(super) message: Vec<Observer<MessageStanza>>,
    pub(super) presence: Vec<Observer<PresenceStanza>>,
    pub(super) iq: Vec<Observer<IqStanza>>,
    pub(super) stream_end: Vec<Observer<Option<Element>>>,
    pub(super) internal_error: Vec<Observer<ConnectionError>>,
    pub(super) exception: Vec<ExceptionObserver>,
}

fn panic_error(panic: Box<dyn Any + Send>) -> HandlerError {
    let text = if let Some(text) = panic.downcast_ref::<&str>() {
        text.to_string()
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else {
        return description::OBSERVER_PANIC.into();
    };
    format!("{}: {text}", description::OBSERVER_PANIC).into()
}

fn report_exception(observers: &[ExceptionObserver], err: &HandlerError) {
    if observers.is_empty() {
        warn!(error = %err, "observer failed");
        return;
    }
    for observer in observers {
        if catch_unwind(AssertUnwindSafe(|| observer(err))).is_err() {
            warn!(error = %err, "exception observer panicked");
        }
    }
}

/// Runs every observer on its own thread with the same event.
///
/// Errors and panics of the observers are caught and passed to the
/// exception observers, they never reach the caller.
pub(super) fn dispatch<T>(observers: Vec<Observer<T>>, exception: Vec<ExceptionObserver>, event: T)
where
    T: Send + Sync + 'static,
{
    if observers.is_empty() {
        return;
    }
    let event = Arc::new(event);
    let exception: Arc<[ExceptionObserver]> = exception.into();
    for observer in observers {
        let event = Arc::clone(&event);
        let exception = Arc::clone(&exception);
        let spawned = thread::Builder::new()
            .name("jabberwire-observer".to_string())
            .spawn(move || {
                let err = match catch_unwind(AssertUnwindSafe(|| observer(event.as_ref()))) {
                    Ok(Ok(())) => return,
                    Ok(Err(err)) => err,
                    Err(panic) => panic_error(panic),
                };
                report_exception(&exception, &err);
            });
        if let Err(err) = spawned {
            warn!(error = %err, "cannot start observer thread");
        }
    }
}
