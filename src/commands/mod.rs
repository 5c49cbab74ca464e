pub mod config;
pub mod convert;
pub mod session;
pub mod status;

use anyhow::Result;
use inquire::InquireError;
use tokio::task::JoinHandle;

use crate::clipboard::SystemClipboard;
use crate::client::HttpConverter;
use crate::controller::UploadController;
use crate::endpoint::PageLocation;
use crate::notify::TerminalNotifier;
use crate::render::{self, SpinnerSlot};

/// Controller wired to the real service, terminal toasts and the given
/// clipboard, plus the task drawing its loading spinner. The task ends once
/// the controller is dropped.
pub fn terminal_controller(
    location: PageLocation,
    clipboard: SystemClipboard,
) -> (UploadController<HttpConverter>, JoinHandle<()>) {
    let spinner = SpinnerSlot::default();
    let controller = UploadController::new(
        HttpConverter::new(),
        location,
        Box::new(TerminalNotifier::new(spinner.clone())),
        Box::new(clipboard),
    );
    let indicator = render::spawn_loading_indicator(controller.subscribe(), spinner);
    (controller, indicator)
}

/// Treat Esc and Ctrl+C on a prompt as "no answer"
pub fn optional<T>(answer: Result<T, InquireError>) -> Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
