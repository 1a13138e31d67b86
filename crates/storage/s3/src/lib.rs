//! Amazon S3 backend for the Lexcase [`ObjectStore`](lexcase_storage::ObjectStore).
//!
//! Works against AWS proper or any S3-compatible endpoint (`LocalStack`,
//! `MinIO`) via [`S3Config::endpoint_url`]. Credentials come from the
//! standard AWS environment chain, optionally exchanged for an assumed role.

pub mod config;
pub mod error;
pub mod store;

pub use config::S3Config;
pub use store::S3ObjectStore;
