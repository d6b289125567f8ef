/// State management module
///
/// This module owns all application state, including:
/// - The wizard step machine and its transition gates (wizard.rs)
/// - The in-progress visitor draft collected across steps (draft.rs)
/// - The admin viewer's cached collection and filters (admin.rs)

pub mod admin;
pub mod draft;
pub mod wizard;
