//! Merge rules for folding a generation result into a conversation.
//!
//! The merger never touches storage. It produces a [`MergePlan`]: the two
//! turns to append, the artifact fields to replace, and the rename to apply
//! if the conversation still carries the sentinel name. Document stores apply
//! the plan with [`MergePlan::apply`] against their own current copy of the
//! document, under their single-document atomicity guarantee, so concurrent
//! posts never lose each other's turns.

use super::artifact::ArtifactUpdate;
use super::model::ConversationDocument;
use super::turn::Turn;
use crate::generation::GenerationOutput;
use serde::{Deserialize, Serialize};

/// The minimal update produced by a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePlan {
    /// Turns to append, in order (user turn, then assistant turn).
    pub turns: Vec<Turn>,
    /// Artifact fields to replace.
    pub artifact: ArtifactUpdate,
    /// New display name, applied only while the name is still the sentinel.
    pub rename_to: Option<String>,
}

impl MergePlan {
    /// Applies the plan to `document` in place.
    ///
    /// Turns are appended after whatever the document already holds. The
    /// rename is re-checked against the document being mutated, so a name
    /// set by a concurrent merge or an explicit rename is never overwritten.
    ///
    /// Returns true if the display name changed.
    pub fn apply(&self, document: &mut ConversationDocument) -> bool {
        self.artifact.apply_to(&mut document.artifact);
        document.turns.extend(self.turns.iter().cloned());

        let renamed = match &self.rename_to {
            Some(name) if document.has_default_name() => {
                document.display_name = name.clone();
                true
            }
            _ => false,
        };

        document.touch();
        renamed
    }

    /// The assistant turn carried by this plan.
    pub fn assistant_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

/// Result of merging against an in-memory document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The document with the plan applied.
    pub document: ConversationDocument,
    /// The plan a document store applies atomically.
    pub plan: MergePlan,
    /// Whether the merge renamed the conversation.
    pub applied_rename: bool,
}

/// Field-level last-writer-wins merge of generated artifacts.
pub struct ArtifactMerger;

impl ArtifactMerger {
    /// Builds the plan for one user message and its generated reply.
    pub fn plan(
        previous: &ConversationDocument,
        user_input: &str,
        output: &GenerationOutput,
    ) -> MergePlan {
        let artifact = ArtifactUpdate::from_incoming(
            output.markup.as_deref(),
            output.styling.as_deref(),
            output.logic.as_deref(),
        );

        let rename_to = previous
            .has_default_name()
            .then(|| user_input.to_string());

        tracing::debug!(
            "[ArtifactMerger] conversation={} markup={} styling={} logic={} rename={}",
            previous.id,
            artifact.markup.is_some(),
            artifact.styling.is_some(),
            artifact.logic.is_some(),
            rename_to.is_some()
        );

        MergePlan {
            turns: vec![
                Turn::user(user_input),
                Turn::assistant(output.explanation.clone()),
            ],
            artifact,
            rename_to,
        }
    }

    /// Merges into a copy of `previous` and returns the updated document
    /// together with the plan that produced it.
    pub fn merge(
        previous: &ConversationDocument,
        user_input: &str,
        output: &GenerationOutput,
    ) -> MergeOutcome {
        let plan = Self::plan(previous, user_input, output);
        let mut document = previous.clone();
        let applied_rename = plan.apply(&mut document);

        MergeOutcome {
            document,
            plan,
            applied_rename,
        }
    }
}
