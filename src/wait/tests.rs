/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use super::*;

fn spin_until_waiting(wait: &KeyedWait<String, u32>, key: &str) {
    let key = key.to_string();
    let start = Instant::now();
    while !wait.is_waiting(&key) {
        assert!(start.elapsed() < Duration::from_secs(5));
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn get_blocks_until_set() {
    let wait = Arc::new(KeyedWait::<String, u32>::new());
    let getter = {
        let wait = Arc::clone(&wait);
        thread::spawn(move || wait.get("a".to_string(), None))
    };
    spin_until_waiting(&wait, "a");
    assert_eq!(wait.set(&"a".to_string(), 7), Ok(true));
    assert_eq!(getter.join().unwrap(), Ok(Some(7)));
    assert!(!wait.is_waiting(&"a".to_string()));
}

#[test]
fn duplicate_waiter() {
    let wait = Arc::new(KeyedWait::<String, u32>::new());
    let getter = {
        let wait = Arc::clone(&wait);
        thread::spawn(move || wait.get("a".to_string(), None))
    };
    spin_until_waiting(&wait, "a");
    assert_eq!(
        wait.get("a".to_string(), Some(Duration::from_millis(10))),
        Err(WaitError::Duplicate)
    );
    // the first waiter is not disturbed by the failed second one
    assert_eq!(wait.set(&"a".to_string(), 1), Ok(true));
    assert_eq!(getter.join().unwrap(), Ok(Some(1)));
}

#[test]
fn set_without_waiter() {
    let wait = KeyedWait::<String, u32>::new();
    assert_eq!(wait.set(&"b".to_string(), 5), Ok(false));
    // the value is not buffered for a later waiter
    assert_eq!(
        wait.get("b".to_string(), Some(Duration::from_millis(20))),
        Ok(None)
    );
}

#[test]
fn second_set_is_dropped() {
    let wait = KeyedWait::<String, u32>::new();
    let pending = wait.register("a".to_string()).unwrap();
    assert_eq!(wait.set(&"a".to_string(), 1), Ok(true));
    assert_eq!(wait.set(&"a".to_string(), 2), Ok(false));
    assert_eq!(pending.wait(None), Ok(Some(1)));
}

#[test]
fn timeout() {
    let wait = KeyedWait::<String, u32>::new();
    let start = Instant::now();
    assert_eq!(
        wait.get("a".to_string(), Some(Duration::from_millis(100))),
        Ok(None)
    );
    assert!(start.elapsed() >= Duration::from_millis(100));
    // an expired key can be waited on again
    assert!(!wait.is_waiting(&"a".to_string()));
    assert_eq!(wait.set(&"a".to_string(), 3), Ok(false));
    assert!(wait.register("a".to_string()).is_ok());
}

#[test]
fn register_before_set() {
    let wait = KeyedWait::<String, u32>::new();
    let pending = wait.register("x".to_string()).unwrap();
    assert_eq!(pending.key(), Some(&"x".to_string()));
    // value arrives before the caller starts blocking
    assert_eq!(wait.set(&"x".to_string(), 9), Ok(true));
    assert_eq!(pending.wait(Some(Duration::from_millis(10))), Ok(Some(9)));
}

#[test]
fn dropped_registration() {
    let wait = KeyedWait::<String, u32>::new();
    {
        let _pending = wait.register("x".to_string()).unwrap();
        assert!(wait.is_waiting(&"x".to_string()));
    }
    assert!(!wait.is_waiting(&"x".to_string()));
    assert_eq!(wait.set(&"x".to_string(), 1), Ok(false));
}

#[test]
fn close_releases_waiters() {
    let wait = Arc::new(KeyedWait::<String, u32>::new());
    let getters: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|key| {
            let wait = Arc::clone(&wait);
            let key = key.to_string();
            thread::spawn(move || wait.get(key, None))
        })
        .collect();
    for key in ["a", "b", "c"] {
        spin_until_waiting(&wait, key);
    }
    assert!(wait.close());
    assert!(!wait.close());
    for getter in getters {
        assert_eq!(getter.join().unwrap(), Err(WaitError::Closed));
    }
    assert!(wait.is_closed());
    assert_eq!(wait.get("d".to_string(), None), Err(WaitError::Closed));
    assert_eq!(wait.set(&"a".to_string(), 1), Err(WaitError::Closed));
}

#[test]
fn many_keys() {
    let wait = Arc::new(KeyedWait::<String, u32>::new());
    let getters: Vec<_> = (0..16)
        .map(|i| {
            let wait = Arc::clone(&wait);
            thread::spawn(move || wait.get(i.to_string(), Some(Duration::from_secs(5))))
        })
        .collect();
    for i in 0..16 {
        spin_until_waiting(&wait, &i.to_string());
    }
    for i in (0..16).rev() {
        assert_eq!(wait.set(&i.to_string(), i * 10), Ok(true));
    }
    for (i, getter) in getters.into_iter().enumerate() {
        assert_eq!(getter.join().unwrap(), Ok(Some(i as u32 * 10)));
    }
}
