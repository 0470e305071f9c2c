//! Domain model (IDs, tasks, state, events, errors).

pub mod errors;
pub mod events;
pub mod ids;
pub mod state;
pub mod task;

pub use self::errors::{AgerError, ErrorKind};
pub use self::events::{ProgressDelta, QueueCounts, QueueEvent, QueueSnapshot};
pub use self::ids::TaskId;
pub use self::state::TaskStatus;
pub use self::task::{COMPLETED_EFFECTIVE_PRIORITY, PROGRESS_COMPLETE, Task};
