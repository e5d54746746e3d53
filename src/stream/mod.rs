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

use std::io::BufReader;
use std::io::Write;
use std::net::Shutdown;
use std::net::TcpStream;
use std::net::ToSocketAddrs;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::TryLockError;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use tracing::debug;
use tracing::trace;
use tracing::warn;

pub use error::TransportError;
use error::description;

use crate::Element;
use crate::constants::CLIENT_NS;
use crate::constants::STREAM_CLOSE;
use crate::constants::STREAM_NS;
use crate::constants::STREAM_TAG;
use crate::constants::TOP_LEVEL_TAGS;
use crate::element::element_from_start;
use crate::element::read_element;

/// A unit read from the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamElement {
    /// A complete top level element.
    Element(Element),

    /// The server closed the stream with `</stream:stream>`.
    ///
    /// The argument is the last element received before the close, which
    /// is typically a `stream:error` explaining the reason.
    End(Option<Element>),
}

pub(crate) fn stream_open(domain: &str) -> String {
    format!(
        "<{STREAM_TAG} to='{}' xmlns='{CLIENT_NS}' xmlns:stream='{STREAM_NS}' version='1.0'>",
        escape(domain)
    )
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|err| err.into_inner())
}

type StreamReader = Reader<BufReader<TcpStream>>;

struct ReadHalf {
    // None after the stream ended, failed, or was disconnected.
    reader: Option<StreamReader>,
    buf: Vec<u8>,
    last: Option<Element>,
}

fn connect_socket(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, TransportError> {
    let mut last_error = None;
    for address in (host, port).to_socket_addrs()? {
        debug!(%address, "connecting");
        match TcpStream::connect_timeout(&address, timeout) {
            Ok(socket) => return Ok(socket),
            Err(err) => {
                debug!(%address, error = %err, "connection attempt failed");
                last_error = Some(err);
            }
        }
    }
    match last_error {
        Some(err) => Err(err.into()),
        None => Err(TransportError::BadStream(description::NO_ADDRESS)),
    }
}

fn read_stream_open(reader: &mut StreamReader, buf: &mut Vec<u8>) -> Result<Element, TransportError> {
    let mut seen_declaration = false;
    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Decl(_) if !seen_declaration => seen_declaration = true,
            Event::Comment(_) | Event::PI(_) => {}
            Event::Text(text) if is_blank(&text) => {}
            Event::Start(start) if start.name().as_ref() == STREAM_TAG.as_bytes() => {
                return Ok(element_from_start(&start)?);
            }
            Event::Eof => return Err(TransportError::BadStream(description::NO_DATA)),
            _ => return Err(TransportError::BadStream(description::EXPECTED_OPEN)),
        }
    }
}

fn read_stream_element(
    reader: &mut StreamReader,
    buf: &mut Vec<u8>,
) -> Result<Option<Element>, TransportError> {
    loop {
        buf.clear();
        let element = match reader.read_event_into(buf)? {
            Event::Start(start) => {
                let root = element_from_start(&start)?;
                read_element(reader, buf, root)?
            }
            Event::Empty(start) => element_from_start(&start)?,
            Event::End(end) if end.name().as_ref() == STREAM_TAG.as_bytes() => return Ok(None),
            Event::Comment(_) | Event::PI(_) => continue,
            Event::Text(text) if is_blank(&text) => continue,
            Event::Text(_) | Event::CData(_) => {
                return Err(TransportError::BadStream(description::UNEXPECTED_TEXT));
            }
            Event::Eof => return Err(TransportError::BadStream(description::NO_DATA)),
            Event::End(_) | Event::Decl(_) | Event::DocType(_) => {
                return Err(TransportError::BadStream(description::UNEXPECTED_NODE));
            }
        };
        if !TOP_LEVEL_TAGS.contains(&element.name()) {
            return Err(TransportError::UnexpectedTag(element.name().to_string()));
        }
        return Ok(Some(element));
    }
}

/// Client side of an XMPP stream over TCP.
///
/// The stream frames the endless XML document sent by the server into top
/// level elements. Reading and writing are guarded by separate locks, so a
/// thread blocked in [read()](XmppStream::read) does not stop other threads
/// from sending.
pub struct XmppStream {
    socket: TcpStream,
    header: Element,
    read_half: Mutex<ReadHalf>,
    write_half: Mutex<Option<TcpStream>>,
    closed: AtomicBool,
}

impl XmppStream {
    /// Opens the connection and performs the stream open handshake.
    ///
    /// Blocks until the server's `<stream:stream>` open tag is received.
    /// The timeout applies to the TCP connect and again to waiting for the
    /// open tag.
    pub fn connect(
        host: &str,
        port: u16,
        domain: &str,
        timeout: Duration,
    ) -> Result<XmppStream, TransportError> {
        let socket = connect_socket(host, port, timeout)?;
        let mut writer = socket.try_clone()?;
        let mut reader = Reader::from_reader(BufReader::new(socket.try_clone()?));
        socket.set_read_timeout(Some(timeout))?;

        let open = stream_open(domain);
        trace!(bytes = %open, "sending");
        writer.write_all(open.as_bytes())?;

        let mut buf = Vec::new();
        let opened = read_stream_open(&mut reader, &mut buf).and_then(|header| {
            socket.set_read_timeout(None)?;
            Ok(header)
        });
        let header = match opened {
            Ok(header) => header,
            Err(err) => {
                warn!(error = %err, "stream open failed");
                let _ = socket.shutdown(Shutdown::Both);
                return Err(err);
            }
        };
        debug!(%host, port, %domain, id = header.attribute("id"), "stream opened");

        Ok(XmppStream {
            socket,
            header,
            read_half: Mutex::new(ReadHalf {
                reader: Some(reader),
                buf,
                last: None,
            }),
            write_half: Mutex::new(Some(writer)),
            closed: AtomicBool::new(false),
        })
    }

    /// The server's stream open tag, without children.
    pub fn header(&self) -> &Element {
        &self.header
    }

    /// Stream id assigned by the server.
    pub fn id(&self) -> Option<&str> {
        self.header.attribute("id")
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Writes raw XML text to the server.
    pub fn write(&self, text: &str) -> Result<(), TransportError> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        let mut write_half = lock(&self.write_half);
        let socket = write_half.as_mut().ok_or(TransportError::Closed)?;
        trace!(bytes = %text, "sending");
        socket.write_all(text.as_bytes())?;
        socket.flush()?;
        Ok(())
    }

    /// Blocks until the next top level element is framed.
    ///
    /// Any error ends the stream, later calls fail with
    /// [TransportError::Closed].
    pub fn read(&self) -> Result<StreamElement, TransportError> {
        let mut read_half = lock(&self.read_half);
        let ReadHalf { reader, buf, last } = &mut *read_half;
        let result = match reader.as_mut() {
            Some(reader) if !self.is_closed() => read_stream_element(reader, buf),
            _ => return Err(TransportError::Closed),
        };
        if self.is_closed() {
            // disconnect() could not drop the reader while we were blocked
            *reader = None;
            return Err(TransportError::Closed);
        }
        match result {
            Ok(Some(element)) => {
                trace!(element = %element, "received");
                *last = Some(element.clone());
                Ok(StreamElement::Element(element))
            }
            Ok(None) => {
                debug!("server closed the stream");
                *reader = None;
                Ok(StreamElement::End(last.take()))
            }
            Err(err) => {
                warn!(error = %err, "stream read failed");
                *reader = None;
                Err(err)
            }
        }
    }

    /// Sends the stream close tag and releases the socket.
    ///
    /// Only the first call does anything, later calls return `Ok(())`.
    /// A thread blocked in [read()](XmppStream::read) is woken up and gets
    /// [TransportError::Closed].
    pub fn disconnect(&self) -> Result<(), TransportError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let mut result = Ok(());
        if let Some(mut socket) = lock(&self.write_half).take() {
            trace!(bytes = STREAM_CLOSE, "sending");
            result = socket
                .write_all(STREAM_CLOSE.as_bytes())
                .map_err(TransportError::from);
        }
        if let Err(err) = self.socket.shutdown(Shutdown::Both) {
            debug!(error = %err, "socket shutdown failed");
        }
        match self.read_half.try_lock() {
            Ok(mut read_half) => read_half.reader = None,
            Err(TryLockError::Poisoned(err)) => err.into_inner().reader = None,
            Err(TryLockError::WouldBlock) => {}
        }
        debug!("stream disconnected");
        result
    }
}

impl Drop for XmppStream {
    fn drop(&mut self) {
        let _ = self.disconnect();
    }
}
