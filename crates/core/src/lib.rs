//! Domain types shared by the search engine, the event protocol and the transports.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::{CoreError, Result};
