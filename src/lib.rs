//! # zoter
//!
//! Zotero API client and NSF collaborator report generator.
//!
//! ## Modules
//!
//! - [`zotero`] - Zotero web API client (paginated "My Publications")
//! - [`cache`] - Day-long JSON cache of fetched publications
//! - [`names`] - Author name cleaning
//! - [`collaborators`] - Collaborator extraction by item type and year
//! - [`report`] - Merge with prior institutions and CSV output
//! - [`config`] - Credentials and endpoint settings
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zoter::{config::ZoteroConfig, zotero::ZoteroClient, collaborators};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ZoteroClient::new(ZoteroConfig::from_env()?)?;
//!     let items = client.fetch_all_publications().await?;
//!     let authors = collaborators::extract(&items, 2022)?;
//!     println!("Found {} collaborators", authors.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod names;
pub mod report;
pub mod zotero;

pub use error::{Result, ZoterError};
