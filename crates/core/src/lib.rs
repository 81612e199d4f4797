// Shared data model for the Instantly MCP workspace

pub mod category;
pub mod page;
pub mod rate_limit;

pub use category::{Category, CategorySelection, UnknownCategory};
pub use page::{Page, MAX_PAGE_SIZE};
pub use rate_limit::RateLimitSnapshot;
