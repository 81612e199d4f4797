//! API endpoint groups.

mod accounts;
mod analytics;
mod background_jobs;
mod campaigns;
mod emails;
mod lead_lists;
mod leads;

pub use accounts::*;
pub use analytics::*;
pub use background_jobs::*;
pub use campaigns::*;
pub use emails::*;
pub use lead_lists::*;
pub use leads::*;
