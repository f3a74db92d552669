//! Source-control provider abstraction and backends.
//!
//! A provider clones the repository at the start of a run and publishes the
//! upgrade branch as a pull request at the end. Each backend owns its
//! authentication scheme and REST protocol; selection happens through the
//! registry in [`factory`].

pub mod bitbucket;
pub mod config;
pub mod factory;
pub mod github;
pub mod traits;
