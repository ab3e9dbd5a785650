//! Suggested actions for the selection surface.

use std::collections::HashSet;

use crate::collaborators::{ChoiceSuggester, Intent};
use crate::context_assembler::StateContext;

/// Most suggestions shown at once.
pub const MAX_CHOICES: usize = 4;

/// Ask the suggester for actions matching `intent`.
///
/// Suggestions are trimmed, blanks and duplicates dropped, and the list is
/// cut to [`MAX_CHOICES`] in the collaborator's order. A failed request
/// yields no suggestions.
pub fn collect_choices(
    suggester: &dyn ChoiceSuggester,
    context: &StateContext,
    intent: &Intent,
) -> Vec<String> {
    let raw = match suggester.suggest(context, intent) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(
                target: "narrative_core::choices",
                intent = %intent.label,
                error = %err,
                "choice suggestion failed"
            );
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|choice| choice.trim().to_string())
        .filter(|choice| !choice.is_empty() && seen.insert(choice.clone()))
        .take(MAX_CHOICES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::NarrativeError;
    use crate::context_assembler::ContextAssembler;
    use game_state::{GameConfig, GameEngine};

    struct FixedSuggester(Result<Vec<String>, NarrativeError>);

    impl ChoiceSuggester for FixedSuggester {
        fn suggest(&self, _: &StateContext, _: &Intent) -> Result<Vec<String>, NarrativeError> {
            self.0.clone()
        }
    }

    fn context() -> StateContext {
        let engine = GameEngine::from_config(GameConfig::bundled().unwrap()).unwrap();
        ContextAssembler::with_defaults().summarize(engine.state())
    }

    #[test]
    fn test_choices_cleaned_and_capped() {
        let suggester = FixedSuggester(Ok(vec![
            " Compliment her scarf ".to_string(),
            "".to_string(),
            "Ask about work".to_string(),
            "Compliment her scarf".to_string(),
            "Offer a coffee".to_string(),
            "Suggest a walk".to_string(),
            "Tell a joke".to_string(),
        ]));

        let choices = collect_choices(&suggester, &context(), &Intent::new("Flirt", ""));

        assert_eq!(
            choices,
            vec![
                "Compliment her scarf",
                "Ask about work",
                "Offer a coffee",
                "Suggest a walk"
            ]
        );
    }

    #[test]
    fn test_failed_suggestion_is_empty() {
        let suggester = FixedSuggester(Err(NarrativeError::Unavailable("timeout".to_string())));
        assert!(collect_choices(&suggester, &context(), &Intent::new("Work", "")).is_empty());
    }
}
