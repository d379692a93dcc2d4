//! Fullscreen gating.

/// Source of the binary fullscreen signal.
pub trait FullscreenSignal: Send {
    /// Ask to enter fullscreen. Returns whether the request was granted.
    fn request(&mut self) -> bool;

    /// Whether the display is fullscreen right now.
    fn current(&self) -> bool;
}

/// What an observed signal value means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateChange {
    Entered,
    Exited,
    Unchanged,
}

/// Edge detector over the fullscreen signal.
///
/// The first observation always counts as a change so startup can show
/// either the quiz or the prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullscreenGate {
    open: Option<bool>,
}

impl FullscreenGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, is_fullscreen: bool) -> GateChange {
        if self.open == Some(is_fullscreen) {
            return GateChange::Unchanged;
        }
        self.open = Some(is_fullscreen);
        if is_fullscreen {
            GateChange::Entered
        } else {
            GateChange::Exited
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open == Some(true)
    }
}

/// Signal with a fixed answer to `request`, for terminals and tests.
#[derive(Debug, Clone, Copy)]
pub struct ManualSignal {
    fullscreen: bool,
    grant_requests: bool,
}

impl ManualSignal {
    #[must_use]
    pub fn new(fullscreen: bool, grant_requests: bool) -> Self {
        Self {
            fullscreen,
            grant_requests,
        }
    }

    pub fn leave(&mut self) {
        self.fullscreen = false;
    }
}

impl FullscreenSignal for ManualSignal {
    fn request(&mut self) -> bool {
        if self.grant_requests {
            self.fullscreen = true;
        } else {
            log::warn!("fullscreen request denied");
        }
        self.grant_requests
    }

    fn current(&self) -> bool {
        self.fullscreen
    }
}
