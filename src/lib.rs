//! wide-event - one canonical log line per request
//!
//! Instead of scattering log statements across a request's lifecycle, handlers
//! record observations on a per-request [`WideEvent`](event::WideEvent) and a
//! single record is emitted when the response completes, either as a
//! colorized block for humans or as one JSON line for machines.
//!
//! - [`event`] accumulates field groups and an error payload per request
//! - [`render`] formats an assembled record
//! - [`sink`] writes rendered records to stdout/stderr
//! - [`logging`] binds the accumulator to an axum request lifecycle

pub mod api;
pub mod cli;
pub mod config;
pub mod event;
pub mod logging;
pub mod render;
pub mod sink;
