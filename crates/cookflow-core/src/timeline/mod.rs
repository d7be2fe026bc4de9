mod clock;
mod engine;
mod event;
mod recipe;
mod step;

pub use clock::{TickClock, DEFAULT_TICK_INTERVAL};
pub use engine::{ListenerId, Requests, TimelineEngine, TimelineSnapshot};
pub use event::{TimelineEvent, TimelineEventKind};
pub use recipe::{RecipeFile, StepSource};
pub use step::{deductions_for, total_duration_secs, Deduction, Step};
