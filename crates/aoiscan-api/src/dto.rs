//! Request and response bodies

mod request;
mod response;

pub use request::{AnalyzeRequest, EmbedQuery, ExportQuery};
pub use response::{AnalyzeResponse, ConfigResponse, HealthResponse, LayerStatus, LayerSummary};
