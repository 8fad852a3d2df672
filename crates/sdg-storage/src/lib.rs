//! sdg-storage
//!
//! Persistence for activities, impact sets, evidence, and metrics. The
//! `ActivityStore` trait has an S3-backed and an in-memory implementation.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod state;
pub mod store;

pub use memory::MemoryStore;
pub use s3::S3Store;
pub use store::ActivityStore;
