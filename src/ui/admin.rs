/// The visitor-list viewer
///
/// Loads the registered visitors once at start, renders them as a
/// table and filters the cached collection on every keystroke. A row
/// click opens the detail modal; badges download to the user's
/// download directory.
use std::collections::HashMap;

use chrono::Local;
use iced::widget::image::Handle;
use iced::widget::{
    button, center, column, container, horizontal_space, mouse_area, opaque, pick_list, row,
    scrollable, stack, text, text_input,
};
use iced::{Color, Element, Length, Task, Theme};

use crate::api::{ApiError, BackendClient, VisitorRecord};
use crate::state::admin::{format_timestamp, AdminState, DateFilter};
use crate::ui::{notify_info, notify_warning};

const NOTICE_TITLE: &str = "Visitor Log";

// Table column widths
const COL_NAME: f32 = 190.0;
const COL_PURPOSE: f32 = 110.0;
const COL_DATE: f32 = 170.0;
const COL_MEETING: f32 = 160.0;
const COL_PHOTO: f32 = 110.0;
const COL_BADGE: f32 = 150.0;

/// Main admin application state
pub struct AdminApp {
    /// Cached collection, filters and modal selection
    state: AdminState,
    client: BackendClient,
    /// Decoded photo thumbnails, keyed by their download link
    thumbnails: HashMap<String, Handle>,
    /// Status line shown under the table
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// The visitor collection arrived (or failed to)
    VisitorsLoaded(Result<Vec<VisitorRecord>, ApiError>),
    /// Explicit refresh of the cached collection
    ReloadVisitors,
    SearchChanged(String),
    DateFilterPicked(DateFilter),
    /// A name was clicked; open the detail modal
    OpenDetail(VisitorRecord),
    CloseDetail,
    /// A photo thumbnail finished downloading
    ThumbnailLoaded(String, Result<Vec<u8>, ApiError>),
    /// Download the badge PDF behind this link
    DownloadBadge(String),
    BadgeSaved(Result<String, String>),
    Logout,
    LoggedOut(Result<(), ApiError>),
}

impl AdminApp {
    /// Create a new instance and kick off the initial load
    pub fn new() -> (Self, Task<Message>) {
        let client = BackendClient::default();
        let app = AdminApp {
            state: AdminState::new(),
            client: client.clone(),
            thumbnails: HashMap::new(),
            status: String::from("Loading visitors..."),
        };
        (app, load_visitors(client))
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::VisitorsLoaded(Ok(visitors)) => {
                println!("📋 Loaded {} visitors", visitors.len());
                self.status = format!("{} visitors", visitors.len());

                // Fetch any thumbnails we have not cached yet.
                let pending: Vec<Task<Message>> = visitors
                    .iter()
                    .filter_map(|v| v.photo_download.clone())
                    .filter(|link| !self.thumbnails.contains_key(link))
                    .map(|link| {
                        let client = self.client.clone();
                        Task::perform(
                            async move {
                                let result = client.fetch_bytes(&link).await;
                                (link, result)
                            },
                            |(link, result)| Message::ThumbnailLoaded(link, result),
                        )
                    })
                    .collect();

                self.state.set_visitors(visitors);
                Task::batch(pending)
            }
            Message::VisitorsLoaded(Err(e)) => {
                eprintln!("❌ Failed to load visitors: {}", e);
                self.status = String::from("Could not load visitors");
                let notice = if matches!(e, ApiError::Status(_)) {
                    "Error loading visitors. Are you logged in?"
                } else {
                    "Error loading visitors"
                };
                notify_warning(NOTICE_TITLE, notice);
                Task::none()
            }
            Message::ReloadVisitors => {
                self.status = String::from("Loading visitors...");
                load_visitors(self.client.clone())
            }
            Message::SearchChanged(term) => {
                self.state.search = term;
                Task::none()
            }
            Message::DateFilterPicked(filter) => {
                self.state.date_filter = filter;
                Task::none()
            }
            Message::OpenDetail(record) => {
                self.state.open_detail(record);
                Task::none()
            }
            Message::CloseDetail => {
                self.state.close_detail();
                Task::none()
            }
            Message::ThumbnailLoaded(link, Ok(bytes)) => {
                self.thumbnails.insert(link, Handle::from_bytes(bytes));
                Task::none()
            }
            Message::ThumbnailLoaded(link, Err(e)) => {
                eprintln!("⚠️  Could not load thumbnail {}: {}", link, e);
                Task::none()
            }
            Message::DownloadBadge(link) => {
                let client = self.client.clone();
                let filename = match link.rsplit('/').next() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => String::from("badge.pdf"),
                };
                Task::perform(
                    async move {
                        let bytes = client.fetch_bytes(&link).await.map_err(|e| e.to_string())?;
                        let dir = dirs::download_dir()
                            .or_else(dirs::home_dir)
                            .ok_or_else(|| String::from("could not determine a download directory"))?;
                        let path = dir.join(filename);
                        tokio::fs::write(&path, &bytes)
                            .await
                            .map_err(|e| e.to_string())?;
                        Ok(path.display().to_string())
                    },
                    Message::BadgeSaved,
                )
            }
            Message::BadgeSaved(Ok(path)) => {
                println!("🖨️  Badge saved to {}", path);
                self.status = format!("Badge saved to {}", path);
                Task::none()
            }
            Message::BadgeSaved(Err(detail)) => {
                eprintln!("❌ Badge download failed: {}", detail);
                notify_warning(NOTICE_TITLE, "Could not download the badge");
                Task::none()
            }
            Message::Logout => {
                let client = self.client.clone();
                Task::perform(async move { client.logout().await }, Message::LoggedOut)
            }
            Message::LoggedOut(Ok(())) => {
                self.state.clear();
                self.thumbnails.clear();
                self.status = String::from("Logged out");
                notify_info(NOTICE_TITLE, "You have been logged out.");
                Task::none()
            }
            Message::LoggedOut(Err(e)) => {
                eprintln!("❌ Logout failed: {}", e);
                notify_warning(NOTICE_TITLE, "Something went wrong!");
                Task::none()
            }
        }
    }

    /// Build the user interface
    pub fn view(&self) -> Element<Message> {
        let header = row![
            text("Visitor Log").size(32),
            horizontal_space(),
            button(text("Reload").size(16))
                .on_press(Message::ReloadVisitors)
                .padding(8),
            button(text("Logout").size(16))
                .on_press(Message::Logout)
                .padding(8),
        ]
        .spacing(10);

        let filters = row![
            text_input("Search by name or purpose", &self.state.search)
                .on_input(Message::SearchChanged)
                .padding(10)
                .width(Length::Fixed(320.0)),
            pick_list(
                DateFilter::OPTIONS,
                Some(self.state.date_filter),
                Message::DateFilterPicked
            )
            .padding(10),
        ]
        .spacing(10);

        let header_row = row![
            header_cell("Name", COL_NAME),
            header_cell("Purpose", COL_PURPOSE),
            header_cell("Date / Time", COL_DATE),
            header_cell("Meeting", COL_MEETING),
            header_cell("Photo", COL_PHOTO),
            header_cell("Badge", COL_BADGE),
        ]
        .spacing(5);

        // Always filter from the original cached collection.
        let now = Local::now().naive_local();
        let mut body = column![].spacing(5);
        for record in self.state.filtered(now) {
            body = body.push(visitor_row(record, &self.thumbnails));
        }

        let base = column![
            header,
            filters,
            header_row,
            scrollable(body).height(Length::Fill),
            text(&self.status).size(14),
        ]
        .spacing(15)
        .padding(20);

        match &self.state.selected {
            Some(record) => stack![base, detail_modal(record)].into(),
            None => base.into(),
        }
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn load_visitors(client: BackendClient) -> Task<Message> {
    Task::perform(
        async move { client.fetch_visitors().await },
        Message::VisitorsLoaded,
    )
}

fn header_cell(label: &str, width: f32) -> Element<'static, Message> {
    container(text(label.to_string()).size(16))
        .width(Length::Fixed(width))
        .into()
}

fn visitor_row<'a>(
    record: &'a VisitorRecord,
    thumbnails: &'a HashMap<String, Handle>,
) -> Element<'a, Message> {
    // The name opens the detail modal.
    let name = button(text(&record.full_name).size(16))
        .style(button::text)
        .padding(0)
        .on_press(Message::OpenDetail(record.clone()));

    let photo: Element<Message> = match &record.photo_download {
        Some(link) => match thumbnails.get(link) {
            Some(handle) => iced::widget::image(handle.clone())
                .height(Length::Fixed(40.0))
                .into(),
            // Still downloading
            None => text("...").size(14).into(),
        },
        None => text("No photo").size(14).into(),
    };

    let badge: Element<Message> = match &record.pdf_download {
        Some(link) => button(text("Download Badge").size(14))
            .padding(5)
            .on_press(Message::DownloadBadge(link.clone()))
            .into(),
        None => text("No badge").size(14).into(),
    };

    row![
        container(name).width(Length::Fixed(COL_NAME)),
        container(text(&record.purpose).size(16)).width(Length::Fixed(COL_PURPOSE)),
        container(text(format_timestamp(record.created_at)).size(16))
            .width(Length::Fixed(COL_DATE)),
        container(text(&record.finding).size(16)).width(Length::Fixed(COL_MEETING)),
        container(photo).width(Length::Fixed(COL_PHOTO)),
        container(badge).width(Length::Fixed(COL_BADGE)),
    ]
    .spacing(5)
    .into()
}

/// The detail card over a dimmed backdrop. Clicking outside the card
/// dismisses it, clicking the card does not.
fn detail_modal(record: &VisitorRecord) -> Element<Message> {
    let card = container(
        column![
            text(record.full_name.clone()).size(28),
            detail_line("Email", record.email.as_deref().unwrap_or("N/A")),
            detail_line("Phone", record.phone.as_deref().unwrap_or("N/A")),
            detail_line("Purpose", &record.purpose),
            detail_line("Meeting", &record.finding),
            detail_line("Checked in", &format_timestamp(record.created_at)),
            button(text("Close").size(16))
                .on_press(Message::CloseDetail)
                .padding(8),
        ]
        .spacing(10),
    )
    .padding(30)
    .width(Length::Fixed(420.0))
    .style(container::rounded_box);

    let backdrop = center(opaque(card)).style(|_theme| container::Style {
        background: Some(
            Color {
                a: 0.6,
                ..Color::BLACK
            }
            .into(),
        ),
        ..container::Style::default()
    });

    opaque(mouse_area(backdrop).on_press(Message::CloseDetail))
}

fn detail_line(label: &str, value: &str) -> Element<'static, Message> {
    row![
        text(format!("{}:", label)).size(16).width(Length::Fixed(110.0)),
        text(value.to_string()).size(16),
    ]
    .spacing(10)
    .into()
}
