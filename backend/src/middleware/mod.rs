//! Actix middleware wrapped around the whole application.

pub mod trace;

pub use trace::Trace;
