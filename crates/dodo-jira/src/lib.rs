//! Jira adapter for dodo.
//!
//! Decodes `GET /rest/api/2/search?expand=changelog` responses into
//! [`dodo_core::item::WorkItemRecord`]s and fetches them over HTTP. Decoding
//! is pure and synchronous; only [`JiraClient`] touches the network.
//!
//! # Quick start
//!
//! ```no_run
//! use dodo_jira::parse_search;
//!
//! let body = br#"{"issues":[{"key":"DODO-1","fields":{"created":"2017-06-22T08:00:11.000+0500"}}]}"#;
//! let items = parse_search(body).unwrap();
//! println!("{} work items", items.len());
//! ```

mod client;
pub mod error;
mod parse;

pub use client::{JiraClient, JiraConfig};
pub use error::{Error, Result};
pub use parse::parse_search;
