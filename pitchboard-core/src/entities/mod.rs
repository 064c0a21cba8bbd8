//! Typed records stored in the keyspace, and the commands that act on them.
//!
//! Each command is a plain struct handled by [`Keyspace`](crate::Keyspace)
//! through `kanau::processor::Processor`.

pub mod analysis;
pub mod event;
pub mod participant;
pub mod scoring_record;
pub mod session;

pub use analysis::{BaselineAnalysis, EnhancedAnalysis, SessionAnalyses};
pub use event::Event;
pub use participant::Participant;
pub use scoring_record::{JudgeScore, ScoringRecord};
pub use session::Session;

pub(crate) fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
