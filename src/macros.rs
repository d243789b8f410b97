// Logging macros that compile to nothing unless the 'logging' feature is
// enabled. Every log statement in the crate goes through these, so that the
// 'log' crate never needs to be named outside of this file.

macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) }
}
