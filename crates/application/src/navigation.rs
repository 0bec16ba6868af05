use std::fmt::{Display, Formatter};

use vca_domain::{DamageReport, ImageFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Pickup,
    Return,
    Report,
}

impl Route {
    /// Flow only moves forward; the report stage is terminal.
    pub fn next(self) -> Option<Route> {
        match self {
            Self::Pickup => Some(Self::Return),
            Self::Return => Some(Self::Report),
            Self::Report => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pickup => "pickup",
            Self::Return => "return",
            Self::Report => "report",
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data handed to the next stage exactly once, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationState {
    Files(Vec<ImageFile>),
    Report(Box<DamageReport>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub to: Route,
    pub state: NavigationState,
}

impl Transition {
    pub fn to_return(files: Vec<ImageFile>) -> Self {
        Self {
            to: Route::Return,
            state: NavigationState::Files(files),
        }
    }

    pub fn to_report(report: DamageReport) -> Self {
        Self {
            to: Route::Report,
            state: NavigationState::Report(Box::new(report)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_only_move_forward() {
        assert_eq!(Route::Pickup.next(), Some(Route::Return));
        assert_eq!(Route::Return.next(), Some(Route::Report));
        assert_eq!(Route::Report.next(), None);
    }
}
