use vca_domain::{FileSelection, ImageFile};

use crate::{Alerts, Transition};

pub const NO_FILES_MESSAGE: &str = "Select at least one file.";

#[derive(Debug, Default)]
pub struct PickupStage {
    selection: FileSelection,
}

impl PickupStage {
    pub fn select_files(&mut self, files: Vec<ImageFile>) {
        tracing::debug!(count = files.len(), "pickup selection replaced");
        self.selection.replace(files);
    }

    pub fn selection(&self) -> &FileSelection {
        &self.selection
    }

    pub fn proceed(&self, alerts: &dyn Alerts) -> Option<Transition> {
        if self.selection.is_empty() {
            tracing::info!("pickup proceed rejected: no files selected");
            alerts.alert(NO_FILES_MESSAGE);
            return None;
        }
        Some(Transition::to_return(self.selection.files().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{NavigationState, Route};

    #[derive(Default)]
    struct FakeAlerts {
        messages: RefCell<Vec<String>>,
    }

    impl Alerts for FakeAlerts {
        fn alert(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    #[test]
    fn proceed_without_files_alerts_and_stays() {
        let alerts = FakeAlerts::default();
        let stage = PickupStage::default();
        assert!(stage.proceed(&alerts).is_none());
        assert_eq!(*alerts.messages.borrow(), vec![NO_FILES_MESSAGE.to_string()]);
    }

    #[test]
    fn proceed_carries_files_in_order() {
        let alerts = FakeAlerts::default();
        let mut stage = PickupStage::default();
        let files = vec![
            ImageFile::new("b.jpg", vec![2]),
            ImageFile::new("a.jpg", vec![1]),
        ];
        stage.select_files(files.clone());

        let transition = stage.proceed(&alerts).expect("transition");
        assert_eq!(transition.to, Route::Return);
        assert_eq!(transition.state, NavigationState::Files(files));
        assert!(alerts.messages.borrow().is_empty());
    }
}
