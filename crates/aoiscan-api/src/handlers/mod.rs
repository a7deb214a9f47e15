mod analysis;
mod export;
mod health;
mod widget;

pub use analysis::{handle_analyze, list_results};
pub use export::handle_export;
pub use health::health_check;
pub use widget::{embed_code, resolve_config};
