//! Core library for the scfilter command line application.
//!
//! The library implements the short-circuit fault report pipeline that
//! powers the command-line interface as well as the tests. The modules are
//! structured to keep responsibilities narrow and composable: IO adapters
//! live under [`io`], data representations inside [`model`], row selection
//! in [`classify`], table composition in [`compose`], and the session
//! command handlers under [`session`].

pub mod classify;
pub mod compose;
pub mod error;
pub mod io;
pub mod model;
pub mod session;

pub use error::{FilterError, Result};
