//! Pip-Boy styled creature catalog for the terminal.
//!
//! The library exposes the loading pipeline and the tui-dispatch store
//! pieces so they can be driven from tests.

pub mod action;
pub mod api;
pub mod assemble;
pub mod audio;
pub mod effect;
pub mod error;
pub mod evolution;
pub mod loader;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod ui;
