pub mod assistant;
pub mod frontend;
pub mod logging;
pub mod server;

pub use assistant::configuration::Configuration;
pub use assistant::error::{ResearchError, Result};
pub use assistant::orchestrator::Orchestrator;
pub use assistant::state::{Paper, PaperSummary, PipelineStage, ResearchReport};

use dotenv::dotenv;

pub fn init() {
    dotenv().ok();
}
