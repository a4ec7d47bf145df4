pub mod clock;
pub mod workflow;

pub use clock::{Clock, SystemClock};
pub use workflow::{GenerationWorkflow, WorkflowPhase, WorkflowSnapshot};
