//! Summary generation state machine.
//!
//! An explicit tagged-state type with pure transition functions, decoupled
//! from rendering and from the network. The two-slot design (saved vs.
//! candidate) lets a user compare a regenerated summary against the saved
//! one before committing it.

/// Which kind of generation is (or was) in flight.
///
/// The distinction exists because failures surface with a different message
/// for the initial, automatic generation than for a manual regeneration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationPhase {
    /// Automatic generation on entering a note with no saved summary.
    /// On success the result becomes the note's canonical saved summary.
    Initial,
    /// Manual regeneration producing a candidate held apart from the saved
    /// summary until explicitly committed.
    Regeneration,
}

impl GenerationPhase {
    /// User-visible failure message for this phase.
    pub fn failure_message(&self) -> &'static str {
        match self {
            GenerationPhase::Initial => "Couldn't generate summary",
            GenerationPhase::Regeneration => "Couldn't regenerate summary",
        }
    }
}

/// Tagged state of a summary page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryState {
    /// Nothing generated and nothing saved yet.
    Idle,
    /// A generation request is in flight. Controls that would start another
    /// request are disabled in this state.
    Generating(GenerationPhase),
    /// A summary (saved or candidate) is available for display.
    Displayed,
    /// The last generation failed. A previously saved summary, if any, is
    /// still displayable.
    Failed {
        phase: GenerationPhase,
        reason: String,
    },
}

/// Per-page summary session: the state tag plus the two summary slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySession {
    state: SummaryState,
    saved: Option<String>,
    candidate: Option<String>,
}

impl SummarySession {
    /// Open a session for a note. A note that already has a saved summary
    /// shows it immediately with no network call.
    pub fn open(existing_summary: Option<String>) -> Self {
        let state = match existing_summary {
            Some(_) => SummaryState::Displayed,
            None => SummaryState::Idle,
        };
        Self {
            state,
            saved: existing_summary,
            candidate: None,
        }
    }

    pub fn state(&self) -> &SummaryState {
        &self.state
    }

    /// The note's canonical saved summary, if any.
    pub fn saved(&self) -> Option<&str> {
        self.saved.as_deref()
    }

    /// The uncommitted regeneration result, if any.
    pub fn candidate(&self) -> Option<&str> {
        self.candidate.as_deref()
    }

    /// True while a request is in flight.
    pub fn is_generating(&self) -> bool {
        matches!(self.state, SummaryState::Generating(_))
    }

    /// What the page should show: the candidate when one exists, otherwise
    /// the saved summary.
    pub fn display_text(&self) -> Option<&str> {
        self.candidate.as_deref().or(self.saved.as_deref())
    }

    /// Enter the generating state. Returns `false` (and changes nothing)
    /// when a generation is already in flight.
    pub fn begin(&mut self, phase: GenerationPhase) -> bool {
        if self.is_generating() {
            return false;
        }
        self.state = SummaryState::Generating(phase);
        true
    }

    /// Complete an initial generation: the result is the note's canonical
    /// saved summary (the caller persists it in the same step).
    pub fn complete_initial(&mut self, summary: String) {
        self.saved = Some(summary);
        self.candidate = None;
        self.state = SummaryState::Displayed;
    }

    /// Complete a regeneration: the result is held as a candidate and the
    /// saved summary is left untouched.
    pub fn complete_regeneration(&mut self, candidate: String) {
        self.candidate = Some(candidate);
        self.state = SummaryState::Displayed;
    }

    /// Record a failed generation. A previously saved summary is never
    /// cleared by a failure.
    pub fn fail(&mut self, phase: GenerationPhase, reason: impl Into<String>) {
        self.state = SummaryState::Failed {
            phase,
            reason: reason.into(),
        };
    }

    /// Promote the candidate to the saved slot. Called after the caller has
    /// persisted it. Returns the newly saved text, or `None` when there was
    /// no candidate to commit.
    pub fn commit_candidate(&mut self) -> Option<String> {
        let committed = self.candidate.take()?;
        self.saved = Some(committed.clone());
        self.state = SummaryState::Displayed;
        Some(committed)
    }

    /// Drop the candidate, falling back to the saved summary.
    pub fn discard_candidate(&mut self) {
        self.candidate = None;
        self.state = match self.saved {
            Some(_) => SummaryState::Displayed,
            None => SummaryState::Idle,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_with_existing_summary_displays_immediately() {
        let session = SummarySession::open(Some("saved".to_string()));
        assert_eq!(*session.state(), SummaryState::Displayed);
        assert_eq!(session.saved(), Some("saved"));
        assert_eq!(session.display_text(), Some("saved"));
    }

    #[test]
    fn test_open_without_summary_is_idle() {
        let session = SummarySession::open(None);
        assert_eq!(*session.state(), SummaryState::Idle);
        assert_eq!(session.display_text(), None);
    }

    #[test]
    fn test_initial_generation_sets_saved() {
        let mut session = SummarySession::open(None);
        assert!(session.begin(GenerationPhase::Initial));
        assert!(session.is_generating());

        session.complete_initial("generated".to_string());
        assert_eq!(session.saved(), Some("generated"));
        assert_eq!(session.candidate(), None);
        assert_eq!(*session.state(), SummaryState::Displayed);
    }

    #[test]
    fn test_begin_rejected_while_generating() {
        let mut session = SummarySession::open(None);
        assert!(session.begin(GenerationPhase::Initial));
        assert!(!session.begin(GenerationPhase::Regeneration));
        assert_eq!(
            *session.state(),
            SummaryState::Generating(GenerationPhase::Initial)
        );
    }

    #[test]
    fn test_regeneration_does_not_touch_saved() {
        let mut session = SummarySession::open(Some("saved".to_string()));
        assert!(session.begin(GenerationPhase::Regeneration));
        session.complete_regeneration("candidate".to_string());

        assert_eq!(session.saved(), Some("saved"));
        assert_eq!(session.candidate(), Some("candidate"));
        // Candidate takes display priority for comparison.
        assert_eq!(session.display_text(), Some("candidate"));
    }

    #[test]
    fn test_commit_candidate_promotes() {
        let mut session = SummarySession::open(Some("saved".to_string()));
        session.begin(GenerationPhase::Regeneration);
        session.complete_regeneration("candidate".to_string());

        let committed = session.commit_candidate();
        assert_eq!(committed.as_deref(), Some("candidate"));
        assert_eq!(session.saved(), Some("candidate"));
        assert_eq!(session.candidate(), None);
    }

    #[test]
    fn test_commit_without_candidate_is_none() {
        let mut session = SummarySession::open(Some("saved".to_string()));
        assert_eq!(session.commit_candidate(), None);
        assert_eq!(session.saved(), Some("saved"));
    }

    #[test]
    fn test_discard_candidate_falls_back_to_saved() {
        let mut session = SummarySession::open(Some("saved".to_string()));
        session.begin(GenerationPhase::Regeneration);
        session.complete_regeneration("candidate".to_string());

        session.discard_candidate();
        assert_eq!(session.candidate(), None);
        assert_eq!(session.display_text(), Some("saved"));
        assert_eq!(*session.state(), SummaryState::Displayed);
    }

    #[test]
    fn test_failure_keeps_saved_summary() {
        let mut session = SummarySession::open(Some("saved".to_string()));
        session.begin(GenerationPhase::Regeneration);
        session.fail(GenerationPhase::Regeneration, "provider unavailable");

        assert_eq!(session.saved(), Some("saved"));
        assert_eq!(session.display_text(), Some("saved"));
        match session.state() {
            SummaryState::Failed { phase, reason } => {
                assert_eq!(*phase, GenerationPhase::Regeneration);
                assert_eq!(reason, "provider unavailable");
            }
            other => panic!("Expected Failed state, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_messages_differ_by_phase() {
        assert_ne!(
            GenerationPhase::Initial.failure_message(),
            GenerationPhase::Regeneration.failure_message()
        );
    }

    #[test]
    fn test_generation_allowed_again_after_failure() {
        let mut session = SummarySession::open(None);
        session.begin(GenerationPhase::Initial);
        session.fail(GenerationPhase::Initial, "timeout");
        assert!(session.begin(GenerationPhase::Initial));
    }
}
