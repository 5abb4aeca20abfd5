//! Persistence context.
//!
//! The application owns one [`DbConnection`] (a pooled sea-orm connection)
//! for the lifetime of the process and takes a [`DbScope`] from it for each
//! request. The scope is what repositories hold; dropping it at the end of
//! the request span releases the request's claim on the context.

mod connection;

pub use connection::{DbConnection, DbScope};
