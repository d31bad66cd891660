//! UI state machine and event definitions.
//!
//! The controller owns all view state and is the single writer for it.
//! Widgets read from it and report user actions back as method calls;
//! background request threads report completion through [`RequestEvent`]s.

use crate::types::{GenerationResult, MemeStyle};

/// Current phase of the generation workflow.
///
/// The controller follows a simple state machine:
/// `Idle` -> `AwaitingResult` (generate) -> `ResultShown` (success)
///                                       \-> back (failure, error shown)
/// `ResultShown` -> `AwaitingResult` (regenerate, prior result stays visible)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No request pending and nothing shown yet.
    Idle,
    /// A request is in flight; the generate trigger is disabled.
    AwaitingResult,
    /// A result is displayed; generate (as "regenerate") is available again.
    ResultShown,
}

/// Events sent from the background request thread to the UI thread.
///
/// Every event carries the token of the request that produced it so stale
/// responses from superseded requests can be discarded.
pub enum RequestEvent {
    /// The service returned a parsed result.
    Completed(u64, GenerationResult),
    /// The request failed with a user-displayable message.
    Failed(u64, String),
}

/// Owns the view state and sequences user actions into state transitions.
pub struct Controller {
    phase: Phase,
    style: MemeStyle,
    context: String,
    result: Option<GenerationResult>,
    error: Option<String>,
    /// Token of the most recently issued request; only a response carrying
    /// this token may be applied.
    latest_token: u64,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            style: MemeStyle::default(),
            context: String::new(),
            result: None,
            error: None,
            latest_token: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn style(&self) -> MemeStyle {
        self.style
    }

    /// Unconditional style write, available in any phase. Never touches an
    /// in-flight request's recorded style.
    pub fn set_style(&mut self, style: MemeStyle) {
        self.style = style;
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Mutable access for direct text-edit binding.
    pub fn context_mut(&mut self) -> &mut String {
        &mut self.context
    }

    /// The currently displayed result, if any. During regeneration this is
    /// still the previous result: stale-but-visible beats a blank pane.
    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::AwaitingResult
    }

    /// Whether the generate trigger is enabled: an image must be present and
    /// no request may already be pending.
    pub fn can_generate(&self, has_image: bool) -> bool {
        has_image && self.phase != Phase::AwaitingResult
    }

    /// Enters `AwaitingResult` and issues a fresh request token.
    ///
    /// Returns `None` (no transition, no request) when the trigger is not
    /// currently available. Any displayed error is cleared; a previously
    /// shown result stays visible until the new one arrives.
    pub fn begin_request(&mut self, has_image: bool) -> Option<u64> {
        if !self.can_generate(has_image) {
            return None;
        }
        self.latest_token += 1;
        self.phase = Phase::AwaitingResult;
        self.error = None;
        Some(self.latest_token)
    }

    /// Applies a successful response, replacing any prior result wholesale.
    ///
    /// Responses from superseded requests are discarded. Returns whether the
    /// event was applied.
    pub fn apply_success(&mut self, token: u64, result: GenerationResult) -> bool {
        if token != self.latest_token {
            log::debug!("Discarding stale response for request {}", token);
            return false;
        }
        self.result = Some(result);
        self.phase = Phase::ResultShown;
        true
    }

    /// Applies a failed response: the error becomes visible and dismissible,
    /// and the trigger is available again. A previously shown result stays
    /// on screen.
    pub fn apply_failure(&mut self, token: u64, message: String) -> bool {
        if token != self.latest_token {
            log::debug!("Discarding stale failure for request {}", token);
            return false;
        }
        self.error = Some(message);
        self.phase = if self.result.is_some() {
            Phase::ResultShown
        } else {
            Phase::Idle
        };
        true
    }

    /// Handles one event from the request channel.
    pub fn handle_event(&mut self, event: RequestEvent) -> bool {
        match event {
            RequestEvent::Completed(token, result) => self.apply_success(token, result),
            RequestEvent::Failed(token, message) => self.apply_failure(token, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str) -> GenerationResult {
        GenerationResult {
            id: id.to_string(),
            top_text: "TOP".to_string(),
            bottom_text: "BOTTOM".to_string(),
            image_url: "http://example.com/meme.png".to_string(),
            style: "sarcastic".to_string(),
            confidence: 0.5,
            similar: vec![],
        }
    }

    #[test]
    fn generate_requires_an_image() {
        let mut controller = Controller::new();
        assert!(!controller.can_generate(false));
        assert_eq!(controller.begin_request(false), None);
        assert_eq!(controller.phase(), Phase::Idle);
    }

    #[test]
    fn generate_transitions_idle_to_awaiting() {
        let mut controller = Controller::new();
        let token = controller.begin_request(true).unwrap();
        assert_eq!(token, 1);
        assert_eq!(controller.phase(), Phase::AwaitingResult);

        // Trigger is disabled while a request is pending.
        assert!(!controller.can_generate(true));
        assert_eq!(controller.begin_request(true), None);
    }

    #[test]
    fn success_shows_the_result() {
        let mut controller = Controller::new();
        let token = controller.begin_request(true).unwrap();
        assert!(controller.apply_success(token, result("m1")));
        assert_eq!(controller.phase(), Phase::ResultShown);
        assert_eq!(controller.result().unwrap().id, "m1");
    }

    #[test]
    fn failure_returns_to_idle_with_visible_error() {
        let mut controller = Controller::new();
        let token = controller.begin_request(true).unwrap();
        assert!(controller.apply_failure(token, "boom".to_string()));
        assert_eq!(controller.phase(), Phase::Idle);
        assert_eq!(controller.error(), Some("boom"));
        assert!(controller.result().is_none());

        controller.dismiss_error();
        assert!(controller.error().is_none());
        assert!(controller.can_generate(true));
    }

    #[test]
    fn regenerate_retains_previous_result_until_replaced() {
        let mut controller = Controller::new();
        let token = controller.begin_request(true).unwrap();
        controller.apply_success(token, result("m1"));

        let token = controller.begin_request(true).unwrap();
        assert_eq!(controller.phase(), Phase::AwaitingResult);
        assert_eq!(controller.result().unwrap().id, "m1");

        controller.apply_success(token, result("m2"));
        assert_eq!(controller.result().unwrap().id, "m2");
    }

    #[test]
    fn regenerate_failure_keeps_prior_result_shown() {
        let mut controller = Controller::new();
        let token = controller.begin_request(true).unwrap();
        controller.apply_success(token, result("m1"));

        let token = controller.begin_request(true).unwrap();
        controller.apply_failure(token, "gone".to_string());
        assert_eq!(controller.phase(), Phase::ResultShown);
        assert_eq!(controller.result().unwrap().id, "m1");
        assert_eq!(controller.error(), Some("gone"));
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut controller = Controller::new();
        let first = controller.begin_request(true).unwrap();
        // Failure of the first request frees the trigger; a second request
        // supersedes it.
        controller.apply_failure(first, "slow".to_string());
        let second = controller.begin_request(true).unwrap();

        assert!(!controller.apply_success(first, result("late")));
        assert!(controller.result().is_none());
        assert_eq!(controller.phase(), Phase::AwaitingResult);

        assert!(controller.apply_success(second, result("fresh")));
        assert_eq!(controller.result().unwrap().id, "fresh");
    }

    #[test]
    fn style_edits_are_unconditional() {
        let mut controller = Controller::new();
        controller.begin_request(true).unwrap();

        controller.set_style(MemeStyle::Wholesome);
        assert_eq!(controller.style(), MemeStyle::Wholesome);
        // Still pending; the edit triggered nothing.
        assert_eq!(controller.phase(), Phase::AwaitingResult);

        controller.context_mut().push_str("my cat being dramatic");
        assert_eq!(controller.context(), "my cat being dramatic");
    }

    #[test]
    fn begin_request_clears_displayed_error() {
        let mut controller = Controller::new();
        let token = controller.begin_request(true).unwrap();
        controller.apply_failure(token, "boom".to_string());

        controller.begin_request(true).unwrap();
        assert!(controller.error().is_none());
    }
}
