//! Travel Route Finder - trip-search form TUI
//!
//! This library exposes the application's modules for testing.

pub mod action;
pub mod calendar;
pub mod components;
pub mod effect;
pub mod form;
pub mod logging;
pub mod reducer;
pub mod region;
pub mod search;
pub mod state;
