mod accounts;
mod analytics;
mod background_jobs;
mod campaigns;
pub mod catalog;
mod emails;
mod lead_lists;
mod leads;
pub mod listing;
mod registry;
pub mod schema;
mod server_info;

#[cfg(test)]
pub(crate) mod testing;

pub use accounts::AccountTools;
pub use analytics::AnalyticsTools;
pub use background_jobs::BackgroundJobTools;
pub use campaigns::CampaignTools;
pub use catalog::ToolName;
pub use emails::EmailTools;
pub use lead_lists::LeadListTools;
pub use leads::LeadTools;
pub use registry::{CallContext, ToolContext, ToolHandler, ToolRegistry};
pub use schema::{
    json_schema_array, json_schema_boolean, json_schema_number, json_schema_object,
    json_schema_string, validate, ToolSpec, ValidatedArgs,
};
pub use server_info::ServerInfoTool;
