/// Visitor check-in kiosk
///
/// Two independent front-ends share this library:
/// - `kiosk` walks a visitor through the six-step check-in wizard
///   (name, contact details, agreement, photo capture, submission)
/// - `admin` lists registered visitors with search and date filtering
///
/// All state transitions live here so they can be unit tested without
/// a running UI. The binaries only wire these pieces into iced.
pub mod api;
pub mod camera;
pub mod state;
pub mod ui;
pub mod validate;
