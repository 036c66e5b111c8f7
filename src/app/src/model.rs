use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::*;

/// Identifies one open-screen lifetime.
///
/// Every subscription and one-shot read is tagged with the session that
/// issued it, so callbacks arriving after the screen closed are dropped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SessionId(pub u32);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Application Model - the complete state
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Model {
    /// Mirrored database values, replaced wholesale by the reducer
    pub view: ViewState,

    // Screen lifecycle
    pub session: Option<SessionId>,
    pub sessions_started: u32,
}

impl Model {
    /// Start a new session with fresh view state.
    ///
    /// Ids wrap around after `u32::MAX` sessions.
    pub fn open_session(&mut self) -> SessionId {
        self.sessions_started = self.sessions_started.wrapping_add(1);
        let session = SessionId(self.sessions_started);
        self.session = Some(session);
        self.view = ViewState::default();
        session
    }

    /// End the current session and discard its state
    pub fn close_session(&mut self) -> Option<SessionId> {
        let session = self.session.take()?;
        self.view = ViewState::default();
        Some(session)
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_current(&self, session: SessionId) -> bool {
        self.session == Some(session)
    }

    pub fn view_model(&self) -> ViewModel {
        ViewModel::new(&self.view, self.is_open())
    }
}
