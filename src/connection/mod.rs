/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! The connection ties the stream, the stanza classifiers and the request
//! table together around a dedicated read thread.

mod error;
mod observers;

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::warn;

pub use error::ConnectionError;
pub use error::HandlerError;
use error::description;
use observers::Observer;
use observers::Observers;
use observers::dispatch;

use crate::Element;
use crate::IqStanza;
use crate::KeyedWait;
use crate::MessageStanza;
use crate::PresenceStanza;
use crate::Stanza;
use crate::StreamElement;
use crate::StreamError;
use crate::TransportError;
use crate::WaitError;
use crate::XmppStream;
use crate::constants::CLIENT_PORT;
use crate::constants::IQ_TAG;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}

fn read<T>(rwlock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    rwlock.read().unwrap_or_else(|err| err.into_inner())
}

fn write<T>(rwlock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    rwlock.write().unwrap_or_else(|err| err.into_inner())
}

pub struct ConnectionBuilder {
    host: String,
    port: u16,
    domain: Option<String>,
    connection_timeout: Duration,
    request_timeout: Option<Duration>,
}

impl ConnectionBuilder {
    pub fn new(host: &str) -> Self {
        ConnectionBuilder {
            host: host.to_string(),
            port: CLIENT_PORT,
            domain: None,
            connection_timeout: Duration::from_secs(30),
            request_timeout: None,
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Domain put into the stream header, defaults to the host.
    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Timeout for requests which do not specify their own.
    pub fn request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Creates the connection in the disconnected state.
    pub fn build(self) -> Connection {
        let domain = self.domain.unwrap_or_else(|| self.host.clone());
        Connection {
            shared: Arc::new(Shared {
                host: self.host,
                port: self.port,
                domain,
                connection_timeout: self.connection_timeout,
                request_timeout: self.request_timeout,
                session: Mutex::new(None),
                observers: RwLock::new(Observers::default()),
            }),
            next_id: AtomicU64::new(0),
            reader: Mutex::new(None),
        }
    }
}

/// State of one connected period, replaced on every connect.
struct Session {
    stream: XmppStream,
    pending: KeyedWait<String, Element>,
    cancelled: AtomicBool,
}

struct Shared {
    host: String,
    port: u16,
    domain: String,
    connection_timeout: Duration,
    request_timeout: Option<Duration>,
    session: Mutex<Option<Arc<Session>>>,
    observers: RwLock<Observers>,
}

impl Shared {
    fn notify<T, F>(&self, select: F, event: T)
    where
        T: Send + Sync + 'static,
        F: Fn(&Observers) -> &Vec<Observer<T>>,
    {
        let (observers, exception) = {
            let all = read(&self.observers);
            (select(&*all).clone(), all.exception.clone())
        };
        dispatch(observers, exception, event);
    }

    /// Tears a session down, safe to call from any thread any number of times.
    fn end_session(&self, session: &Arc<Session>) -> Result<(), TransportError> {
        {
            let mut current = lock(&self.session);
            if current
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, session))
            {
                *current = None;
            }
        }
        session.cancelled.store(true, Ordering::SeqCst);
        session.pending.close();
        session.stream.disconnect()
    }

    fn read_loop(&self, session: Arc<Session>) {
        debug!("read loop started");
        while !session.cancelled.load(Ordering::SeqCst) {
            match session.stream.read() {
                Ok(StreamElement::Element(element)) => self.handle_element(&session, element),
                Ok(StreamElement::End(last)) => {
                    info!(host = %self.host, "server closed the stream");
                    let _ = self.end_session(&session);
                    self.notify(|all| &all.stream_end, last);
                    break;
                }
                Err(err) => {
                    if session.cancelled.load(Ordering::SeqCst) || err.is_closed() {
                        break;
                    }
                    warn!(error = %err, "read loop failed");
                    let _ = self.end_session(&session);
                    self.notify(|all| &all.internal_error, ConnectionError::from(err));
                    break;
                }
            }
        }
        debug!("read loop stopped");
    }

    fn handle_element(&self, session: &Session, element: Element) {
        debug!(name = element.name(), "element received");
        self.notify(|all| &all.element, element.clone());
        match Stanza::classify(&element) {
            Ok(Some(Stanza::Iq(iq))) => {
                if !deliver(session, &iq.id, &element) {
                    self.notify(|all| &all.iq, iq);
                }
            }
            Ok(Some(Stanza::StreamError(error))) => {
                warn!(condition = ?error.condition, text = ?error.text, "stream error received");
                self.notify(|all| &all.stream_error, error);
            }
            Ok(Some(Stanza::Message(message))) => self.notify(|all| &all.message, message),
            Ok(Some(Stanza::Presence(presence))) => self.notify(|all| &all.presence, presence),
            Ok(None) => {}
            Err(err) => {
                warn!(name = element.name(), error = %err, "cannot classify element");
                if element.name() == IQ_TAG {
                    if let Some(id) = element.attribute("id") {
                        deliver(session, id, &element);
                    }
                }
                self.notify(|all| &all.internal_error, ConnectionError::BadStanza(err));
            }
        }
    }
}

fn join_reader(reader: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = reader.take() {
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            warn!("read loop panicked");
        }
    }
}

/// Hands a response to the request waiting on its id.
fn deliver(session: &Session, id: &str, element: &Element) -> bool {
    let id = id.to_string();
    if !session.pending.is_waiting(&id) {
        return false;
    }
    matches!(session.pending.set(&id, element.clone()), Ok(true))
}

/// Client connection to an XMPP server.
///
/// A connection starts disconnected. [connect()](Connection::connect) opens
/// the stream and starts a read thread which classifies every incoming
/// element and passes it to the registered observers. Observers run on
/// their own threads, so they may call back into the connection, for
/// example to send a reply.
///
/// Requests sent with [send_request()](Connection::send_request) block the
/// calling thread until the read thread sees an `iq` with the same id.
///
/// ```no_run
/// use std::time::Duration;
/// use jabberwire::Connection;
///
/// # fn main() -> Result<(), jabberwire::ConnectionError> {
/// let connection = Connection::build("localhost").port(5222).build();
/// connection.on_message(|message| {
///     println!("{:?}: {:?}", message.from, message.body);
///     Ok(())
/// });
/// connection.connect()?;
/// let roster = connection.roster(Some(Duration::from_secs(5)))?;
/// println!("{roster:?}");
/// connection.disconnect()?;
/// # Ok(())
/// # }
/// ```
pub struct Connection {
    shared: Arc<Shared>,
    next_id: AtomicU64,
    // held across connect and disconnect
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl Connection {
    pub fn build(host: &str) -> ConnectionBuilder {
        ConnectionBuilder::new(host)
    }

    pub fn host(&self) -> &str {
        &self.shared.host
    }

    pub fn port(&self) -> u16 {
        self.shared.port
    }

    pub fn domain(&self) -> &str {
        &self.shared.domain
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.shared.session).is_some()
    }

    /// Stream id assigned by the server to the current session.
    pub fn stream_id(&self) -> Option<String> {
        let session = lock(&self.shared.session).clone()?;
        session.stream.id().map(str::to_string)
    }

    /// Returns a new stanza id, unique within this connection.
    pub fn next_id(&self) -> String {
        (self.next_id.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }

    /// Opens the stream and starts the read thread.
    ///
    /// The session lock is not held during the handshake, so
    /// [is_connected()](Connection::is_connected) and the send methods
    /// answer while a connect is in progress. A concurrent
    /// [disconnect()](Connection::disconnect) waits for the handshake to
    /// finish or time out.
    pub fn connect(&self) -> Result<(), ConnectionError> {
        let mut reader = lock(&self.reader);
        if self.is_connected() {
            return Err(ConnectionError::AlreadyConnected);
        }
        // the read thread of a previous session may still be finishing
        join_reader(&mut reader);

        let shared = &self.shared;
        let stream = XmppStream::connect(
            &shared.host,
            shared.port,
            &shared.domain,
            shared.connection_timeout,
        )?;
        let session = Arc::new(Session {
            stream,
            pending: KeyedWait::new(),
            cancelled: AtomicBool::new(false),
        });
        *lock(&shared.session) = Some(Arc::clone(&session));

        let spawned = {
            let shared = Arc::clone(&self.shared);
            let session = Arc::clone(&session);
            thread::Builder::new()
                .name("jabberwire-reader".to_string())
                .spawn(move || shared.read_loop(session))
        };
        match spawned {
            Ok(handle) => {
                *reader = Some(handle);
                info!(host = %shared.host, port = shared.port, "connected");
                Ok(())
            }
            Err(err) => {
                let _ = shared.end_session(&session);
                Err(ConnectionError::Transport(TransportError::IOError(err)))
            }
        }
    }

    /// Closes the stream and stops the read thread.
    ///
    /// Requests blocked in [send_request()](Connection::send_request) fail
    /// with [ConnectionError::Closed]. Calling this on a disconnected
    /// connection does nothing. When it returns, the read thread of the
    /// closed session has stopped.
    pub fn disconnect(&self) -> Result<(), ConnectionError> {
        let mut reader = lock(&self.reader);
        let session = lock(&self.shared.session).take();
        let result = match session {
            Some(session) => {
                debug!(host = %self.shared.host, "disconnecting");
                self.shared.end_session(&session)
            }
            None => Ok(()),
        };
        join_reader(&mut reader);
        match result {
            Ok(()) | Err(TransportError::Closed) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn session(&self) -> Result<Arc<Session>, ConnectionError> {
        lock(&self.shared.session)
            .clone()
            .ok_or(ConnectionError::NotConnected)
    }

    /// Sends an element without waiting for any response.
    pub fn send(&self, element: &Element) -> Result<(), ConnectionError> {
        self.send_xml(&element.to_string())
    }

    /// Sends raw XML text as is.
    pub fn send_xml(&self, xml: &str) -> Result<(), ConnectionError> {
        let session = self.session()?;
        session.stream.write(xml)?;
        Ok(())
    }

    /// Sends an `iq` request and blocks until its response arrives.
    ///
    /// An `id` attribute is assigned if the element does not have one.
    /// Returns `Ok(None)` if no response arrives within the timeout, which
    /// defaults to the builder's request timeout. Without any timeout the
    /// call waits until the response arrives or the connection closes.
    pub fn send_request(
        &self,
        mut element: Element,
        timeout: Option<Duration>,
    ) -> Result<Option<Element>, ConnectionError> {
        if element.name() != IQ_TAG {
            return Err(ConnectionError::BadRequest(description::NOT_IQ));
        }
        let id = match element.attribute("id") {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                let id = self.next_id();
                element.set_attribute("id", &id);
                id
            }
        };
        let session = self.session()?;
        let pending = session.pending.register(id.clone()).map_err(|err| match err {
            WaitError::Duplicate => ConnectionError::DuplicateRequest(id.clone()),
            WaitError::Closed => ConnectionError::Closed,
        })?;
        session.stream.write(&element.to_string())?;

        let timeout = timeout.or(self.shared.request_timeout);
        match pending.wait(timeout) {
            Ok(Some(response)) => Ok(Some(response)),
            Ok(None) => {
                debug!(%id, ?timeout, "request timed out");
                Ok(None)
            }
            Err(WaitError::Closed) => Err(ConnectionError::Closed),
            Err(WaitError::Duplicate) => Err(ConnectionError::DuplicateRequest(id)),
        }
    }

    /// Parses the text and sends it with [send_request()](Connection::send_request).
    pub fn send_request_xml(
        &self,
        xml: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<Element>, ConnectionError> {
        let element: Element = xml.parse()?;
        self.send_request(element, timeout)
    }

    /// Called with every element received, before classification.
    pub fn on_element<F>(&self, observer: F)
    where
        F: Fn(&Element) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        write(&self.shared.observers).element.push(Arc::new(observer));
    }

    pub fn on_stream_error<F>(&self, observer: F)
    where
        F: Fn(&StreamError) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        write(&self.shared.observers).stream_error.push(Arc::new(observer));
    }

    pub fn on_message<F>(&self, observer: F)
    where
        F: Fn(&MessageStanza) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        write(&self.shared.observers).message.push(Arc::new(observer));
    }

    pub fn on_presence<F>(&self, observer: F)
    where
        F: Fn(&PresenceStanza) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        write(&self.shared.observers).presence.push(Arc::new(observer));
    }

    /// Called with `iq` stanzas which are not responses to a pending request.
    pub fn on_iq<F>(&self, observer: F)
    where
        F: Fn(&IqStanza) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        write(&self.shared.observers).iq.push(Arc::new(observer));
    }

    /// Called after the server closed the stream and the session is torn
    /// down, with the last element received before the close.
    pub fn on_stream_end<F>(&self, observer: F)
    where
        F: Fn(&Option<Element>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        write(&self.shared.observers).stream_end.push(Arc::new(observer));
    }

    /// Called with errors returned by other observers, and with their panics.
    pub fn on_exception<F>(&self, observer: F)
    where
        F: Fn(&HandlerError) + Send + Sync + 'static,
    {
        write(&self.shared.observers).exception.push(Arc::new(observer));
    }

    /// Called with failures of the read thread.
    ///
    /// Transport errors end the session, elements which fail classification
    /// are reported and skipped.
    pub fn on_internal_error<F>(&self, observer: F)
    where
        F: Fn(&ConnectionError) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        write(&self.shared.observers).internal_error.push(Arc::new(observer));
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let _ = self.disconnect();
    }
}
