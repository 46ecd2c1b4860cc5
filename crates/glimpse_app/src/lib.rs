//! Glimpse application driver
//!
//! Ties the persistence, scanning, ordering, navigation and timer pieces
//! together behind one `App` type. A front end (window chrome, menus,
//! key bindings) calls into this surface; the bundled binary drives it
//! headless on a one-second tick.

pub mod app;

pub use app::{App, DisplayReason};
