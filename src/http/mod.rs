//! HTTP protocol helpers shared by the pipeline stages.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{build_404_response, build_file_response};
