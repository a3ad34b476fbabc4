mod debounce;
mod pipeline;
mod planner;
mod session;

pub use debounce::Debouncer;
pub use pipeline::{apply_filters, rank_by_distance, SearchPipeline};
pub use planner::{plan_stages, PlannedStage, Stage, StageRequest};
pub use session::{SearchSession, SearchView};
