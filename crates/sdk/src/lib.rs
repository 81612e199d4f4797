//! # Instantly SDK
//!
//! Rust client for the Instantly.ai v2 API.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use instantly_sdk::{CredentialSources, InstantlyClient, InstantlyResult, ListParams};
//!
//! #[tokio::main]
//! async fn main() -> InstantlyResult<()> {
//!     let client = InstantlyClient::builder().build()?;
//!     let credential = client.credential(CredentialSources::from_env())?;
//!
//!     // One page of campaigns
//!     let page = client
//!         .campaigns(&credential)
//!         .list(&ListParams::new().limit(20))
//!         .await?;
//!     println!("Found {} campaigns", page.items.len());
//!
//!     // Resume from the cursor upstream handed back
//!     if let Some(cursor) = page.next_cursor {
//!         let rest = client
//!             .campaigns(&credential)
//!             .paginate(ListParams::new().starting_after(cursor))
//!             .collect()
//!             .await?;
//!         println!("...and {} more", rest.items.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Credentials
//!
//! Every call runs under an explicit [`Credential`]. [`CredentialSources`]
//! picks one from a per-call key, a transport-supplied key and the process
//! environment, in that order.

pub mod api;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod pagination;
pub mod rate_limit;
pub mod transport;

// Re-export main client
pub use client::{InstantlyClient, InstantlyClientBuilder};
pub use config::{ClientConfig, TimeoutConfig, TimeoutProfile, DEFAULT_BASE_URL};
pub use credentials::{Credential, CredentialSource, CredentialSources, API_KEY_ENV};
pub use error::{InstantlyError, InstantlyResult, MISSING_CREDENTIAL_HELP};
pub use pagination::{Collected, ListEndpoint, ListParams, Paginator};
pub use rate_limit::RateLimitTracker;
pub use transport::{ApiRequest, ApiResponse, HttpMethod};

// Re-export core types for convenience
pub use instantly_core::{Page, RateLimitSnapshot, MAX_PAGE_SIZE};
