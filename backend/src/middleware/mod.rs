//! Request middleware.
//!
//! [`Trace`] wraps every request in a trace scope. Session handling is the
//! stock `actix-session` middleware configured in [`crate::server`].

pub mod trace;

pub use trace::Trace;
