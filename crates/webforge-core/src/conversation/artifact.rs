//! Generated artifact fields and their update policy.

use serde::{Deserialize, Serialize};

/// The latest structured output attached to a conversation.
///
/// Each field holds the whole generated text for that concern; an empty
/// string means the field has never been produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Page markup (HTML).
    #[serde(default)]
    pub markup: String,
    /// Styling (CSS).
    #[serde(default)]
    pub styling: String,
    /// Script logic (JS).
    #[serde(default)]
    pub logic: String,
}

/// Whole-field replacements to apply to an [`Artifact`].
///
/// `None` leaves the stored field untouched. Blank or whitespace-only
/// incoming text is treated as "no change", never as "clear": the generator
/// echoes back fields it does not intend to alter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactUpdate {
    pub markup: Option<String>,
    pub styling: Option<String>,
    pub logic: Option<String>,
}

impl ArtifactUpdate {
    /// Builds an update from optional incoming fields, dropping blank ones.
    pub fn from_incoming(
        markup: Option<&str>,
        styling: Option<&str>,
        logic: Option<&str>,
    ) -> Self {
        Self {
            markup: non_blank(markup),
            styling: non_blank(styling),
            logic: non_blank(logic),
        }
    }

    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        self.markup.is_none() && self.styling.is_none() && self.logic.is_none()
    }

    /// Replaces every field that carries a value.
    pub fn apply_to(&self, artifact: &mut Artifact) {
        if let Some(markup) = &self.markup {
            artifact.markup = markup.clone();
        }
        if let Some(styling) = &self.styling {
            artifact.styling = styling.clone();
        }
        if let Some(logic) = &self.logic {
            artifact.logic = logic.clone();
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_are_dropped() {
        let update = ArtifactUpdate::from_incoming(Some("   \n\t"), Some(""), None);
        assert!(update.is_empty());
    }

    #[test]
    fn test_apply_replaces_whole_field() {
        let mut artifact = Artifact {
            markup: "<div>old</div>".to_string(),
            styling: "body {}".to_string(),
            logic: "gsap.to('.a', {x: 1});".to_string(),
        };
        let update = ArtifactUpdate::from_incoming(None, Some("h1 { color: red; }"), None);
        update.apply_to(&mut artifact);

        assert_eq!(artifact.markup, "<div>old</div>");
        assert_eq!(artifact.styling, "h1 { color: red; }");
        assert_eq!(artifact.logic, "gsap.to('.a', {x: 1});");
    }

    #[test]
    fn test_surrounding_whitespace_is_kept_verbatim() {
        let update = ArtifactUpdate::from_incoming(Some("  <p>x</p>\n"), None, None);
        assert_eq!(update.markup.as_deref(), Some("  <p>x</p>\n"));
    }
}
