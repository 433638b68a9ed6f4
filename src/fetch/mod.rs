//! HTTP plumbing: the client seam, bearer-token auth, and the page loop.

mod basic;
mod client;
mod pages;

pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;
pub use pages::{PageQuery, fetch_all_pages, records_from_body};
