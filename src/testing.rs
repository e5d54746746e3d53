/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Scripted loopback server for exercising the client side of a stream.

use std::io::Read;
use std::io::Write;
use std::net::TcpListener;
use std::net::TcpStream;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::Element;

pub(crate) const SERVER_OPEN: &str = "<?xml version='1.0'?><stream:stream from='example.com' id='s1' \
     xmlns='jabber:client' xmlns:stream='http://etherx.jabber.org/streams' version='1.0'>";

pub(crate) const TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) struct Peer {
    socket: TcpStream,
    received: String,
}

impl Peer {
    pub(crate) fn send(&mut self, text: &str) {
        self.socket.write_all(text.as_bytes()).unwrap();
        self.socket.flush().unwrap();
    }

    /// Returns everything received up to and including the pattern.
    pub(crate) fn read_until(&mut self, pattern: &str) -> String {
        let mut buffer = [0u8; 1024];
        loop {
            if let Some(pos) = self.received.find(pattern) {
                let end = pos + pattern.len();
                let text = self.received[..end].to_string();
                self.received.drain(..end);
                return text;
            }
            let nr_read = self.socket.read(&mut buffer).unwrap();
            assert!(nr_read > 0, "connection closed while waiting for {pattern}");
            self.received
                .push_str(&String::from_utf8_lossy(&buffer[..nr_read]));
        }
    }

    /// Reads the next stanza ending with the given close tag.
    pub(crate) fn read_element(&mut self, close: &str) -> Element {
        let text = self.read_until(close);
        text.trim().parse().unwrap()
    }

    /// Waits for the client's stream open tag and answers it.
    pub(crate) fn accept_stream(&mut self) -> String {
        let open = self.read_until("version='1.0'>");
        self.send(SERVER_OPEN);
        open
    }

    /// Reads until the client closes the connection.
    pub(crate) fn read_to_end(&mut self) -> String {
        let mut rest = Vec::new();
        let _ = self.socket.read_to_end(&mut rest);
        let mut text = std::mem::take(&mut self.received);
        text.push_str(&String::from_utf8_lossy(&rest));
        text
    }
}

pub(crate) struct FakeServer {
    port: u16,
    handle: JoinHandle<()>,
}

impl FakeServer {
    /// Accepts a single client and runs the script on it.
    pub(crate) fn start<F>(script: F) -> FakeServer
    where
        F: FnOnce(Peer) + Send + 'static,
    {
        let mut script = Some(script);
        FakeServer::start_sessions(1, move |peer| {
            if let Some(script) = script.take() {
                script(peer);
            }
        })
    }

    /// Accepts clients one after another, running the script on each.
    pub(crate) fn start_sessions<F>(count: usize, mut script: F) -> FakeServer
    where
        F: FnMut(Peer) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            for _ in 0..count {
                let (socket, _) = listener.accept().unwrap();
                socket.set_read_timeout(Some(TIMEOUT)).unwrap();
                script(Peer {
                    socket,
                    received: String::new(),
                });
            }
        });
        FakeServer { port, handle }
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    pub(crate) fn join(self) {
        if let Err(panic) = self.handle.join() {
            std::panic::resume_unwind(panic);
        }
    }
}
