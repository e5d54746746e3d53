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

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;
use std::time::Instant;

pub use error::WaitError;

struct Table<K, V> {
    // None while the waiter is blocked, Some once a value is deposited.
    slots: HashMap<K, Option<V>>,
    closed: bool,
}

/// Keyed rendezvous between a waiting caller and a producer thread.
///
/// A caller registers a key and blocks until another thread calls
/// [set()](KeyedWait::set) with the same key, the optional timeout expires,
/// or the whole table is [closed](KeyedWait::close). At most one caller can
/// wait on a key at a time. Values for keys nobody waits on are dropped.
///
/// The connection uses this with stanza ids as keys so that a request can be
/// written to the socket and its response picked up from the read loop.
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use jabberwire::KeyedWait;
///
/// let wait = Arc::new(KeyedWait::new());
/// let pending = wait.register("a").unwrap();
/// let producer = {
///     let wait = Arc::clone(&wait);
///     thread::spawn(move || wait.set(&"a", 42).unwrap())
/// };
/// assert_eq!(pending.wait(None), Ok(Some(42)));
/// assert!(producer.join().unwrap());
/// ```
pub struct KeyedWait<K, V> {
    table: Mutex<Table<K, V>>,
    signal: Condvar,
}

impl<K: Eq + Hash + Clone, V> KeyedWait<K, V> {
    pub fn new() -> Self {
        KeyedWait {
            table: Mutex::new(Table {
                slots: HashMap::new(),
                closed: false,
            }),
            signal: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table<K, V>> {
        self.table.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Registers the key without blocking.
    ///
    /// The registration is kept until the returned guard is waited on or
    /// dropped. Registering before sending a request guarantees that a fast
    /// response cannot arrive before anybody is waiting for it.
    pub fn register(&self, key: K) -> Result<Pending<'_, K, V>, WaitError> {
        let mut table = self.lock();
        if table.closed {
            return Err(WaitError::Closed);
        }
        if table.slots.contains_key(&key) {
            return Err(WaitError::Duplicate);
        }
        table.slots.insert(key.clone(), None);
        Ok(Pending {
            owner: self,
            key: Some(key),
        })
    }

    /// Registers the key and blocks until a value arrives.
    ///
    /// Returns `Ok(None)` when the timeout expires first.
    pub fn get(&self, key: K, timeout: Option<Duration>) -> Result<Option<V>, WaitError> {
        self.register(key)?.wait(timeout)
    }

    /// Hands the value to the caller waiting on the key.
    ///
    /// Returns false if nobody is waiting on the key, in which case the
    /// value is dropped.
    pub fn set(&self, key: &K, value: V) -> Result<bool, WaitError> {
        let mut table = self.lock();
        if table.closed {
            return Err(WaitError::Closed);
        }
        match table.slots.get_mut(key) {
            Some(slot) if slot.is_none() => {
                *slot = Some(value);
                self.signal.notify_all();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn is_waiting(&self, key: &K) -> bool {
        matches!(self.lock().slots.get(key), Some(None))
    }

    /// Releases every blocked caller with [WaitError::Closed].
    ///
    /// Returns true for the call which actually closed the table, later
    /// calls do nothing.
    pub fn close(&self) -> bool {
        let mut table = self.lock();
        if table.closed {
            return false;
        }
        table.closed = true;
        self.signal.notify_all();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn take(&self, key: &K, timeout: Option<Duration>) -> Result<Option<V>, WaitError> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut table = self.lock();
        loop {
            if table.closed {
                table.slots.remove(key);
                return Err(WaitError::Closed);
            }
            if let Some(Some(_)) = table.slots.get(key) {
                return Ok(table.slots.remove(key).flatten());
            }
            table = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        table.slots.remove(key);
                        return Ok(None);
                    }
                    self.signal
                        .wait_timeout(table, deadline - now)
                        .unwrap_or_else(|err| err.into_inner())
                        .0
                }
                None => self
                    .signal
                    .wait(table)
                    .unwrap_or_else(|err| err.into_inner()),
            };
        }
    }
}

impl<K: Eq + Hash + Clone, V> Default for KeyedWait<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered key of a [KeyedWait] which has not been waited on yet.
pub struct Pending<'a, K: Eq + Hash + Clone, V> {
    owner: &'a KeyedWait<K, V>,
    key: Option<K>,
}

impl<K: Eq + Hash + Clone, V> Pending<'_, K, V> {
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Blocks until the value arrives, the timeout expires, or the table closes.
    pub fn wait(mut self, timeout: Option<Duration>) -> Result<Option<V>, WaitError> {
        match self.key.take() {
            Some(key) => self.owner.take(&key, timeout),
            None => Ok(None),
        }
    }
}

impl<K: Eq + Hash + Clone, V> Drop for Pending<'_, K, V> {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.owner.lock().slots.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests;

mod nocompile;
