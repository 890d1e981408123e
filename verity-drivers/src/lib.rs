//! Driver layer for browser automation.
//!
//! This crate exposes the WebDriver session wrapper used to render pages in a
//! real browser, plus the launch arguments and user-agent pool that go with it.
//!
//! - [`browser::driver::VerityDriver`]: one isolated WebDriver session
//! - [`browser::args`]: hardened Chrome launch arguments
//! - [`browser::fingerprint`]: user-agent selection (random pool or fixed)
pub mod browser;
