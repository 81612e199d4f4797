// MCP (Model Context Protocol) server for the Instantly.ai v2 API.
// Exposes Instantly operations as tools to agent clients over stdio or HTTP.

pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::ToolError;
pub use server::McpServer;
pub use tools::{CallContext, ToolName, ToolRegistry};
