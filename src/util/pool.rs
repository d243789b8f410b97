// This module provides a relatively simple thread-safe pool of reusable
// objects. It is implemented by a stack represented by a Mutex<Vec<Box<T>>>.
// Boxing the values keeps pushes and pops cheap regardless of how big T is.
//
// There is no "owner thread" fast path that bypasses the mutex. The values
// pooled here are scratch spaces for replacement routines, whose own cost
// dwarfs an uncontended lock, and a fast path would require unsafe code to
// hand out a value without synchronization.

/*!
A thread safe memory pool.

The principal type in this module is a [`Pool`]. Its main use case is for
holding a thread safe collection of mutable scratch spaces that replacement
routines need in order to execute. This permits sharing the same read-only
automaton across multiple threads while having a quick way of reusing scratch
space in a thread safe way.
*/

use std::sync::Mutex;

/// A thread safe pool.
///
/// Getting a value out comes with a guard. When that guard is dropped, the
/// value is automatically put back in the pool. This guarantees that a value
/// is returned on every exit path of the code holding the guard, including
/// early returns and panics.
///
/// A `Pool` impls `Sync` when `T` is `Send` (even if `T` is not `Sync`),
/// since a pool hands any particular value to exactly one caller at a time.
///
/// Currently, a pool never contracts in size. Its size is proportional to the
/// maximum number of simultaneous uses.
///
/// # Example
///
/// ```
/// use keyword_automata::util::pool::Pool;
///
/// let pool: Pool<Vec<u8>> = Pool::new(|| Vec::with_capacity(64));
/// {
///     let mut buf = pool.get();
///     buf.extend_from_slice(b"scratch");
///     assert_eq!(b"scratch", &buf[..]);
/// }
/// // The buffer was returned to the pool when its guard was dropped, so
/// // this gets the same buffer back (with its contents intact).
/// assert_eq!(b"scratch", &pool.get()[..]);
/// ```
pub struct Pool<T, F = fn() -> T> {
    /// A stack of T values to hand out.
    stack: Mutex<Vec<Box<T>>>,
    /// A function to create more T values when stack is empty and a caller
    /// has requested a T.
    create: F,
}

impl<T, F> Pool<T, F> {
    /// Create a new pool. The given closure is used to create values in
    /// the pool when necessary.
    pub fn new(create: F) -> Pool<T, F> {
        Pool { stack: Mutex::new(vec![]), create }
    }
}

impl<T: Send, F: Fn() -> T> Pool<T, F> {
    /// Get a value from the pool. The caller is guaranteed to have
    /// exclusive access to the given value.
    ///
    /// Note that there is no guarantee provided about which value in the
    /// pool is returned. That is, calling get, dropping the guard (causing
    /// the value to go back into the pool) and then calling get again is
    /// *not* guaranteed to return the same value received in the first `get`
    /// call.
    pub fn get(&self) -> PoolGuard<'_, T, F> {
        let value = match self.lock().pop() {
            None => Box::new((self.create)()),
            Some(value) => value,
        };
        PoolGuard { pool: self, value: Some(value) }
    }

    /// Puts a value back into the pool. Callers don't need to call this.
    /// Once the guard that's returned by 'get' is dropped, it is put back
    /// into the pool automatically.
    fn put(&self, value: Box<T>) {
        self.lock().push(value);
    }

    /// Returns the number of values currently sitting in the pool, i.e.,
    /// values that are not checked out by a guard.
    pub fn idle(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Box<T>>> {
        // A panic while a guard was alive can never leave the stack itself
        // in a bad state, since values are only pushed or popped while
        // locked. So poisoning can be ignored.
        self.stack.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl<T: core::fmt::Debug, F> core::fmt::Debug for Pool<T, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pool").field("stack", &self.stack).finish()
    }
}

/// A guard that is returned when a caller requests a value from the pool.
///
/// The purpose of the guard is to use RAII to automatically put the value
/// back in the pool once it's dropped.
pub struct PoolGuard<'a, T: Send, F: Fn() -> T> {
    /// The pool that this guard is attached to.
    pool: &'a Pool<T, F>,
    /// This is only None after the guard has been dropped.
    value: Option<Box<T>>,
}

impl<'a, T: Send, F: Fn() -> T> core::ops::Deref for PoolGuard<'a, T, F> {
    type Target = T;

    fn deref(&self) -> &T {
        match self.value {
            Some(ref v) => &**v,
            None => unreachable!("pool guard value taken before drop"),
        }
    }
}

impl<'a, T: Send, F: Fn() -> T> core::ops::DerefMut for PoolGuard<'a, T, F> {
    fn deref_mut(&mut self) -> &mut T {
        match self.value {
            Some(ref mut v) => &mut **v,
            None => unreachable!("pool guard value taken before drop"),
        }
    }
}

impl<'a, T: Send + core::fmt::Debug, F: Fn() -> T> core::fmt::Debug
    for PoolGuard<'a, T, F>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PoolGuard").field("value", &self.value).finish()
    }
}

impl<'a, T: Send, F: Fn() -> T> Drop for PoolGuard<'a, T, F> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.put(value);
        }
    }
}
