/// UI module
///
/// The iced applications live here:
/// - The check-in wizard the visitor touches (kiosk.rs)
/// - The visitor-list viewer for front-desk staff (admin.rs)
///
/// Both are thin shells over the state modules; every transition they
/// trigger is implemented and tested in the library.

pub mod admin;
pub mod kiosk;

use rfd::{MessageButtons, MessageDialog, MessageLevel};

/// Blocking warning notice, the desktop equivalent of an alert box.
/// Used for validation failures, camera trouble and failed requests.
pub(crate) fn notify_warning(title: &str, description: &str) {
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

/// Blocking informational notice, e.g. the welcome after check-in.
pub(crate) fn notify_info(title: &str, description: &str) {
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}
