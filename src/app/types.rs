use std::fmt;

/// Components whose lifecycles the orchestrator tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Expression detector (bootstrap only; holds no running task)
    Detector,
    /// Camera source and its frame stream
    Camera,
    /// Expression poll loop
    Poll,
    /// Keyboard input handler for the headless demo
    Keyboard,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Detector => write!(f, "detector"),
            Component::Camera => write!(f, "camera"),
            Component::Poll => write!(f, "poll"),
            Component::Keyboard => write!(f, "keyboard"),
        }
    }
}

/// Component lifecycle states
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentState {
    Stopped,
    Starting,
    Running,
    Stopping,
    Failed,
}

/// System shutdown reason
#[derive(Debug, Clone)]
pub enum ShutdownReason {
    Signal(String),
    Error(String),
    UserRequest,
}
