// navigation.rs — View state machine for one user session.
//
// The state is the pair (view, context). Context is the animal a screen is
// about, and it only survives transitions that explicitly carry it:
//
//   home ──► list ──► detail(A) ──► submit(A)
//    │  ╲              │   ▲   ╲
//    │   ╲             │   │    ► report(A) ──► list (after filing)
//    ▼    ► faq        ▼   └────────┘
//   submit           list
//
//   any view ──► home
//
// A transition replaces the whole state at once, so no view can observe a
// context left over from another view. A rejected request resets the
// controller to home.

use std::fmt;
use std::str::FromStr;

use paw_records::{AnimalId, UnknownVariant};
use serde::{Deserialize, Serialize};

use crate::error::PawError;

/// The screens of the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    List,
    Detail,
    Submit,
    Faq,
    Report,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Home,
        View::List,
        View::Detail,
        View::Submit,
        View::Faq,
        View::Report,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::List => "list",
            View::Detail => "detail",
            View::Submit => "submit",
            View::Faq => "faq",
            View::Report => "report",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for View {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|view| view.key() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "view",
                value: s.to_string(),
            })
    }
}

/// Current view plus the animal it is about, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    view: View,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<AnimalId>,
}

impl NavigationState {
    /// `{view: home, context: none}` — where every session starts.
    pub fn home() -> Self {
        Self {
            view: View::Home,
            context: None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn context(&self) -> Option<AnimalId> {
        self.context
    }

    /// Check whether moving from this state to `next` is allowed.
    ///
    /// Detail and report always need an animal. Submit needs one exactly
    /// when it is opened from a detail page. Everything else forbids one.
    /// Carried contexts must match the animal currently on screen.
    pub fn can_transition_to(&self, next: &NavigationState) -> bool {
        use View::*;

        let carried = next.context.is_some() && next.context == self.context;

        match (self.view, next.view) {
            (_, Home) => next.context.is_none(),
            (Home | Detail | Report, List) => next.context.is_none(),
            (Home, Faq) | (Home, Submit) => next.context.is_none(),
            (List, Detail) => next.context.is_some(),
            (Detail, Submit) | (Detail, Report) | (Report, Detail) => carried,
            _ => false,
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::home()
    }
}

impl fmt::Display for NavigationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.context {
            Some(id) => write!(f, "{}({})", self.view, id),
            None => write!(f, "{}", self.view),
        }
    }
}

/// Owns a session's NavigationState; the only thing allowed to change it.
#[derive(Debug, Default)]
pub struct NavigationController {
    state: NavigationState,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavigationState {
        self.state
    }

    /// Move to `view` with `context`, or reset to home and fail.
    pub fn transition(
        &mut self,
        view: View,
        context: Option<AnimalId>,
    ) -> Result<NavigationState, PawError> {
        let next = NavigationState { view, context };

        if !self.state.can_transition_to(&next) {
            let err = PawError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            };
            tracing::warn!(
                from = %self.state,
                to = %next,
                "rejected navigation, resetting to home"
            );
            self.state = NavigationState::home();
            return Err(err);
        }

        tracing::debug!(from = %self.state, to = %next, "navigate");
        self.state = next;
        Ok(next)
    }

    /// Explicit "return home". Always valid.
    pub fn go_home(&mut self) -> NavigationState {
        self.state = NavigationState::home();
        self.state
    }

    pub fn open_list(&mut self) -> Result<NavigationState, PawError> {
        self.transition(View::List, None)
    }

    pub fn open_detail(&mut self, animal: AnimalId) -> Result<NavigationState, PawError> {
        self.transition(View::Detail, Some(animal))
    }

    /// Open the intake form; from a detail page the animal is pre-selected.
    pub fn open_submit(&mut self) -> Result<NavigationState, PawError> {
        self.transition(View::Submit, self.detail_context())
    }

    pub fn open_faq(&mut self) -> Result<NavigationState, PawError> {
        self.transition(View::Faq, None)
    }

    pub fn open_report(&mut self) -> Result<NavigationState, PawError> {
        self.transition(View::Report, self.detail_context())
    }

    /// Leave the report form for the detail page it was opened from.
    pub fn back_to_detail(&mut self) -> Result<NavigationState, PawError> {
        self.transition(View::Detail, self.state.context)
    }

    /// Recovery when the animal in context no longer resolves. Valid from
    /// any view.
    pub fn fall_back_to_list(&mut self) -> NavigationState {
        tracing::info!(from = %self.state, "content unavailable, falling back to list");
        self.state = NavigationState {
            view: View::List,
            context: None,
        };
        self.state
    }

    fn detail_context(&self) -> Option<AnimalId> {
        match self.state.view {
            View::Detail => self.state.context,
            _ => None,
        }
    }
}
