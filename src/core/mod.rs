//! Background work for the dashboard.
//!
//! - `worker`: runs adapter requests off the UI thread and posts the results
//!   back over the app's message channel

pub mod worker;

pub use worker::{spawn_request, Request, Response};
