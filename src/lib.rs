//! # rustdblp
//!
//! DBLP Author Publication Explorer - Rust Microservice
//!
//! ## Modules
//!
//! - [`resolver`] - DBLP author search API client
//! - [`profile`] - Profile page scraping into publication records
//! - [`pipeline`] - Resolver → extractor → store search pipeline
//! - [`store`] - JSON persistence of the latest result set
//! - [`bibliography`] - Author extraction from uploaded .bib files
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustdblp::pipeline::SearchPipeline;
//! use rustdblp::store::PublicationStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = SearchPipeline::new(PublicationStore::default())?;
//!     let publications = pipeline.search("Donald Knuth").await;
//!     println!("Found {} publications", publications.len());
//!     Ok(())
//! }
//! ```

pub mod bibliography;
pub mod error;
pub mod pipeline;
pub mod profile;
pub mod resolver;
pub mod store;

pub use error::{DblpError, Result};
