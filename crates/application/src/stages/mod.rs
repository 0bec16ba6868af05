mod pickup;
mod report;
mod returning;

pub use pickup::{PickupStage, NO_FILES_MESSAGE};
pub use report::{RenderProgress, ReportStage, RENDER_FAILED_MESSAGE};
pub use returning::{
    CompareStatus, ComparisonProgress, ReturnStage, COMPARE_FAILED_MESSAGE,
    NOT_ENOUGH_FILES_MESSAGE,
};

use crate::{Route, Transition};

pub enum Stage {
    Pickup(PickupStage),
    Return(ReturnStage),
    Report(ReportStage),
}

impl Stage {
    pub fn enter(transition: Transition) -> Self {
        match transition.to {
            Route::Pickup => Self::Pickup(PickupStage::default()),
            Route::Return => Self::Return(ReturnStage::enter(Some(transition.state))),
            Route::Report => Self::Report(ReportStage::enter(Some(transition.state))),
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Self::Pickup(_) => Route::Pickup,
            Self::Return(_) => Route::Return,
            Self::Report(_) => Route::Report,
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::Pickup(PickupStage::default())
    }
}
