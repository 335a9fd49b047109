//! Thin wrapper around the optional `log` dependency.
//!
//! The core is usable without pulling in `log` at all (the default feature
//! set does not enable it); these macros fall back to doing nothing when the
//! dependency is absent, so call sites never need to `#[cfg]` themselves.

#![allow(unused_macros)]

#[cfg(feature = "log")]
macro_rules! error {
    ($($arg:tt)*) => { ::log::error!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! error {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! warn {
    ($($arg:tt)*) => { ::log::warn!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! info {
    ($($arg:tt)*) => { ::log::info!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)*) => { ::log::debug!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}
