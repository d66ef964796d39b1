//! Terminal client for creating, editing, and deleting equipment records
//! held by a remote REST API.
//!
//! [`model::FormState`] holds the record being edited and whether a submit
//! creates or updates. [`sync::ListSynchronizer`] owns the local list and
//! re-fetches it after every successful write. [`tui::App`] wires both to
//! the keyboard.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod logging;
pub mod model;
pub mod sync;
pub mod tui;
