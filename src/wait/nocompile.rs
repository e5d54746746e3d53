/*
** This file is a part of Jabberwire (blocking XMPP client engine)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Jabberwire is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// # Must not compile tests
///
/// A pending registration cannot outlive its table:
/// ```compile_fail
/// use jabberwire::KeyedWait;
/// let pending;
/// {
///     let wait: KeyedWait<String, u32> = KeyedWait::new();
///     pending = wait.register("a".to_string()).unwrap();
/// }
/// let _ = pending.wait(None);
/// ```
///
/// A pending registration can be waited on only once:
/// ```compile_fail
/// use jabberwire::KeyedWait;
/// let wait: KeyedWait<String, u32> = KeyedWait::new();
/// let pending = wait.register("a".to_string()).unwrap();
/// let _ = pending.wait(None);
/// let _ = pending.wait(None);
/// ```
#[cfg(doctest)]
struct MustNotCompileTests;
