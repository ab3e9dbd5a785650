//! Story session - runs complete turns against a narrative generator.
//!
//! The session is the synchronous driver: it starts a turn on the engine,
//! builds the request, calls the generator and feeds the result back. Callers
//! with an asynchronous generator can drive [`GameEngine::begin_turn`] and
//! [`GameEngine::complete_turn`] themselves.

use game_state::{DeltaReport, GameEngine, TurnError};

use crate::choices::collect_choices;
use crate::collaborators::{ChoiceSuggester, Intent, NarrativeError, NarrativeGenerator};
use crate::context_assembler::ContextAssembler;
use crate::response::parse_response;

/// How a submitted turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnReport {
    /// The response was applied. `structured` is false when it could not be
    /// parsed and only the raw text was recorded.
    Completed { report: DeltaReport, structured: bool },
    /// The generator failed; a notice was added to the history.
    Failed { error: NarrativeError },
}

/// A playable session: engine, generator and optional choice suggester.
pub struct StorySession<G> {
    engine: GameEngine,
    generator: G,
    suggester: Option<Box<dyn ChoiceSuggester>>,
    assembler: ContextAssembler,
}

impl<G: NarrativeGenerator> StorySession<G> {
    /// Create a session with the default context assembler.
    pub fn new(engine: GameEngine, generator: G) -> Self {
        Self {
            engine,
            generator,
            suggester: None,
            assembler: ContextAssembler::with_defaults(),
        }
    }

    /// Attach a choice suggester.
    pub fn with_suggester(mut self, suggester: impl ChoiceSuggester + 'static) -> Self {
        self.suggester = Some(Box::new(suggester));
        self
    }

    /// Replace the context assembler.
    pub fn with_assembler(mut self, assembler: ContextAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Direct engine access for equip, load, new game and debug commands.
    pub fn engine_mut(&mut self) -> &mut GameEngine {
        &mut self.engine
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Play one turn.
    ///
    /// Errors only when the engine refuses to start the turn. Generator
    /// failures are recorded in the history and reported as
    /// [`TurnReport::Failed`].
    pub fn submit(&mut self, action: &str, intent: Option<&Intent>) -> Result<TurnReport, TurnError> {
        let turn = self.engine.begin_turn(action)?;
        let request = self
            .assembler
            .assemble(self.engine.state(), &turn.action, intent);

        match self.generator.generate(&request) {
            Ok(raw) => {
                let outcome = parse_response(&raw);
                let structured = outcome.delta.is_some();
                let report = self.engine.complete_turn(turn.id, outcome)?;
                Ok(TurnReport::Completed { report, structured })
            }
            Err(NarrativeError::Cancelled) => {
                self.engine.cancel_turn(turn.id)?;
                Ok(TurnReport::Failed {
                    error: NarrativeError::Cancelled,
                })
            }
            Err(error) => {
                self.engine.fail_turn(turn.id, &error.to_string())?;
                Ok(TurnReport::Failed { error })
            }
        }
    }

    /// Suggested actions for `intent`. Empty without a suggester.
    pub fn choices(&self, intent: &Intent) -> Vec<String> {
        match &self.suggester {
            Some(suggester) => {
                let context = self.assembler.summarize(self.engine.state());
                collect_choices(suggester.as_ref(), &context, intent)
            }
            None => Vec::new(),
        }
    }

    /// Undo the last turn. See [`GameEngine::undo`].
    pub fn undo(&mut self) -> bool {
        self.engine.undo()
    }
}
