//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `model`: the stored conversation document and its list projection
//! - `turn`: append-only conversation turns (`TurnAuthor`, `Turn`)
//! - `artifact`: the generated markup/styling/logic fields and their update policy
//! - `merge`: `ArtifactMerger`, which turns a generation result into a `MergePlan`
//! - `repository`: the document-store contract for conversations

mod artifact;
mod merge;
mod model;
mod repository;
mod turn;

// Re-export public API
pub use artifact::{Artifact, ArtifactUpdate};
pub use merge::{ArtifactMerger, MergeOutcome, MergePlan};
pub use model::{ConversationDocument, ConversationSummary, DEFAULT_DISPLAY_NAME};
pub use repository::ConversationRepository;
pub use turn::{Turn, TurnAuthor};
