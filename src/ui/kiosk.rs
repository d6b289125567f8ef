/// The check-in wizard application
///
/// One step panel is visible at a time and every transition flows
/// through `WizardState::advance`. The camera controller drives the
/// photo step; submission posts the assembled draft to the backend.
use std::time::Duration;

use iced::time;
use iced::widget::image::Handle;
use iced::widget::{
    button, center, checkbox, column, container, pick_list, row, stack, text, text_input,
};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};

use crate::api::{BackendClient, SubmitResponse};
use crate::camera::{CameraController, CameraPhase, SystemCamera, Tick};
use crate::state::draft::{VisitorDraft, PURPOSES};
use crate::state::wizard::{Step, WizardState};
use crate::ui::{notify_info, notify_warning};
use crate::validate::ValidationError;

/// Dialog title for every kiosk notice.
const NOTICE_TITLE: &str = "Visitor Check-In";

/// Main kiosk application state
pub struct KioskApp {
    /// The step machine; mutated only through validated transitions
    wizard: WizardState,
    /// Everything the visitor has entered so far
    draft: VisitorDraft,
    /// The capture device lifecycle for the photo step
    camera: CameraController<SystemCamera>,
    /// Backend handle, cloned into submission tasks
    client: BackendClient,
    /// Latest live preview frame, ready for the image widget
    preview: Option<Handle>,
    /// The frozen still, decoded once for display
    captured: Option<Handle>,
    /// Guards against double-submitting while a request is in flight
    submitting: bool,
    /// Status line shown at the bottom of the window
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// The current step's "next" action was pressed
    AdvanceStep,
    FirstNameChanged(String),
    LastNameChanged(String),
    EmailChanged(String),
    PhoneChanged(String),
    PurposePicked(&'static str),
    FindingChanged(String),
    AgreementToggled(bool),
    /// Manual camera start, also the retry after a device error
    StartCamera,
    /// Arm the 3-2-1 countdown
    StartCapture,
    /// One second of countdown elapsed
    CountdownTick,
    /// Time to refresh the live preview frame
    PreviewTick,
    /// Discard the still and go back to the live preview
    RetakePhoto,
    /// Post the finished draft to the backend
    SubmitVisitor,
    /// The backend answered (or the request failed outright)
    SubmitFinished(Result<SubmitResponse, String>),
}

impl KioskApp {
    /// Create a new instance of the application
    pub fn new() -> (Self, Task<Message>) {
        let app = KioskApp {
            wizard: WizardState::new(),
            draft: VisitorDraft::default(),
            camera: CameraController::new(SystemCamera::new()),
            client: BackendClient::default(),
            preview: None,
            captured: None,
            submitting: false,
            status: String::from("Ready"),
        };
        (app, Task::none())
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::AdvanceStep => {
                self.advance();
                Task::none()
            }
            Message::FirstNameChanged(value) => {
                self.draft.first_name = value;
                Task::none()
            }
            Message::LastNameChanged(value) => {
                self.draft.last_name = value;
                Task::none()
            }
            Message::EmailChanged(value) => {
                self.draft.email = value;
                Task::none()
            }
            Message::PhoneChanged(value) => {
                self.draft.phone = value;
                Task::none()
            }
            Message::PurposePicked(purpose) => {
                self.draft.purpose = purpose.to_string();
                Task::none()
            }
            Message::FindingChanged(value) => {
                self.draft.finding = value;
                Task::none()
            }
            Message::AgreementToggled(agreed) => {
                self.draft.agreed = agreed;
                Task::none()
            }
            Message::StartCamera => {
                self.start_camera();
                Task::none()
            }
            Message::StartCapture => {
                self.camera.begin_countdown();
                Task::none()
            }
            Message::CountdownTick => {
                match self.camera.tick() {
                    Ok(Tick::Captured(photo)) => {
                        self.captured = Some(Handle::from_bytes(photo.png.clone()));
                        self.draft.photo = Some(photo);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        eprintln!("⚠️  Capture failed: {}", e);
                        notify_warning(NOTICE_TITLE, &e.to_string());
                    }
                }
                Task::none()
            }
            Message::PreviewTick => {
                if let Some(frame) = self.camera.preview_frame() {
                    self.preview = Some(Handle::from_rgba(frame.width, frame.height, frame.rgba));
                }
                Task::none()
            }
            Message::RetakePhoto => {
                self.draft.photo = None;
                self.captured = None;
                if let Err(e) = self.camera.retake() {
                    eprintln!("⚠️  {}", e);
                    notify_warning(NOTICE_TITLE, &e.to_string());
                }
                Task::none()
            }
            Message::SubmitVisitor => self.submit(),
            Message::SubmitFinished(result) => {
                self.submitting = false;
                match result {
                    Ok(response) if response.success => {
                        println!("✅ Visitor registered");
                        if let Some(link) = &response.pdf_download_link {
                            println!("🖨️  Badge ready at {}", link);
                        }
                        notify_info(NOTICE_TITLE, "Welcome! You are checked in.");
                        self.reset();
                    }
                    Ok(response) => {
                        // The server rejected the submission; show its
                        // message verbatim and leave everything as entered.
                        let reason = response
                            .error
                            .unwrap_or_else(|| String::from("Unknown error"));
                        self.status = String::from("Submission failed");
                        notify_warning(NOTICE_TITLE, &format!("Error: {}", reason));
                    }
                    Err(detail) => {
                        eprintln!("❌ Submission failed: {}", detail);
                        self.status = String::from("Submission failed");
                        notify_warning(NOTICE_TITLE, "Something went wrong!");
                    }
                }
                Task::none()
            }
        }
    }

    /// Timers: the live preview refresh and the capture countdown.
    /// Neither runs outside the photo step's active phases.
    pub fn subscription(&self) -> Subscription<Message> {
        let preview = time::every(Duration::from_millis(100)).map(|_| Message::PreviewTick);
        match self.camera.phase() {
            CameraPhase::Live => preview,
            CameraPhase::CountingDown(_) => Subscription::batch([
                preview,
                time::every(Duration::from_secs(1)).map(|_| Message::CountdownTick),
            ]),
            CameraPhase::Idle | CameraPhase::Captured => Subscription::none(),
        }
    }

    /// Build the user interface
    pub fn view(&self) -> Element<Message> {
        let panel = match self.wizard.step() {
            Step::SignIn => self.sign_in_panel(),
            Step::Name => self.name_panel(),
            Step::Contact => self.contact_panel(),
            Step::Agreement => self.agreement_panel(),
            Step::Photo => self.photo_panel(),
            Step::Welcome => self.welcome_panel(),
        };

        let content = column![
            text(format!(
                "Step {} of {}",
                self.wizard.step().number(),
                Step::COUNT
            ))
            .size(16),
            panel,
            text(&self.status).size(14),
        ]
        .spacing(30)
        .padding(40)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Run the current step's gate and move forward on success.
    /// Reaching the photo step is what turns the camera on.
    fn advance(&mut self) {
        match self.wizard.advance(&self.draft) {
            Ok(Step::Photo) => self.start_camera(),
            Ok(_) => {}
            Err(e) => notify_warning(NOTICE_TITLE, &e.to_string()),
        }
    }

    fn start_camera(&mut self) {
        if let Err(e) = self.camera.start() {
            eprintln!("⚠️  {}", e);
            notify_warning(NOTICE_TITLE, &e.to_string());
        }
    }

    fn submit(&mut self) -> Task<Message> {
        if self.submitting {
            return Task::none();
        }
        match self.draft.payload() {
            Some(request) => {
                self.submitting = true;
                self.status = String::from("Submitting your check-in...");
                let client = self.client.clone();
                Task::perform(
                    async move {
                        client
                            .submit_visitor(request)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::SubmitFinished,
                )
            }
            // The photo gate makes this unreachable in practice.
            None => {
                notify_warning(NOTICE_TITLE, &ValidationError::PhotoMissing.to_string());
                Task::none()
            }
        }
    }

    /// The "full reload": back to the first panel with a clean draft
    /// and the camera off.
    fn reset(&mut self) {
        self.camera.shutdown();
        self.draft.reset();
        self.wizard.reset();
        self.preview = None;
        self.captured = None;
        self.status = String::from("Ready");
    }

    fn sign_in_panel(&self) -> Element<Message> {
        column![
            text("Welcome!").size(48),
            text("Please check in for your visit.").size(20),
            button(text("Sign In").size(24))
                .on_press(Message::AdvanceStep)
                .padding(15),
        ]
        .spacing(20)
        .align_x(Alignment::Center)
        .into()
    }

    fn name_panel(&self) -> Element<Message> {
        column![
            text("What is your name?").size(32),
            text_input("First name", &self.draft.first_name)
                .on_input(Message::FirstNameChanged)
                .padding(10)
                .size(20)
                .width(Length::Fixed(360.0)),
            text_input("Last name", &self.draft.last_name)
                .on_input(Message::LastNameChanged)
                .padding(10)
                .size(20)
                .width(Length::Fixed(360.0)),
            button(text("Next").size(20))
                .on_press(Message::AdvanceStep)
                .padding(10),
        ]
        .spacing(20)
        .align_x(Alignment::Center)
        .into()
    }

    fn contact_panel(&self) -> Element<Message> {
        let selected = PURPOSES
            .iter()
            .copied()
            .find(|p| *p == self.draft.purpose);

        column![
            text("How can we reach you?").size(32),
            text_input("Email address", &self.draft.email)
                .on_input(Message::EmailChanged)
                .padding(10)
                .size(20)
                .width(Length::Fixed(360.0)),
            text_input("Phone (10 digits)", &self.draft.phone)
                .on_input(Message::PhoneChanged)
                .padding(10)
                .size(20)
                .width(Length::Fixed(360.0)),
            pick_list(PURPOSES, selected, Message::PurposePicked)
                .placeholder("Purpose of visit")
                .padding(10)
                .width(Length::Fixed(360.0)),
            text_input("Who are you here to see?", &self.draft.finding)
                .on_input(Message::FindingChanged)
                .padding(10)
                .size(20)
                .width(Length::Fixed(360.0)),
            button(text("Next").size(20))
                .on_press(Message::AdvanceStep)
                .padding(10),
        ]
        .spacing(20)
        .align_x(Alignment::Center)
        .into()
    }

    fn agreement_panel(&self) -> Element<Message> {
        column![
            text("Visitor Agreement").size(32),
            container(
                text(
                    "I agree to follow all site safety rules, to remain with \
                     my host while on the premises, and to keep confidential \
                     any business information I may see or hear during my \
                     visit."
                )
                .size(18)
            )
            .padding(20)
            .width(Length::Fixed(480.0)),
            checkbox(
                "I agree to the Visitor Agreement & Confidentiality Form",
                self.draft.agreed
            )
            .on_toggle(Message::AgreementToggled)
            .size(20),
            button(text("Next").size(20))
                .on_press(Message::AdvanceStep)
                .padding(10),
        ]
        .spacing(20)
        .align_x(Alignment::Center)
        .into()
    }

    fn photo_panel(&self) -> Element<Message> {
        let phase = self.camera.phase();

        // The frozen still replaces the live preview once captured.
        let viewport: Element<Message> = if let Some(handle) = &self.captured {
            iced::widget::image(handle.clone())
                .width(Length::Fixed(480.0))
                .into()
        } else if let Some(handle) = &self.preview {
            iced::widget::image(handle.clone())
                .width(Length::Fixed(480.0))
                .into()
        } else {
            container(text("Camera is off").size(20))
                .center_x(Length::Fixed(480.0))
                .center_y(Length::Fixed(320.0))
                .into()
        };

        let viewport: Element<Message> = if let CameraPhase::CountingDown(digit) = phase {
            stack![viewport, center(text(digit.to_string()).size(120))].into()
        } else {
            viewport
        };

        let controls: Element<Message> = match phase {
            CameraPhase::Idle => button(text("Start Camera").size(20))
                .on_press(Message::StartCamera)
                .padding(10)
                .into(),
            CameraPhase::Live => button(text("Take Photo").size(20))
                .on_press(Message::StartCapture)
                .padding(10)
                .into(),
            CameraPhase::CountingDown(_) => text("Hold still...").size(20).into(),
            CameraPhase::Captured => row![
                button(text("Retake").size(20))
                    .on_press(Message::RetakePhoto)
                    .padding(10),
                button(text("Looks Good").size(20))
                    .on_press(Message::AdvanceStep)
                    .padding(10),
            ]
            .spacing(20)
            .into(),
        };

        column![text("Time for your badge photo").size(32), viewport, controls]
            .spacing(20)
            .align_x(Alignment::Center)
            .into()
    }

    fn welcome_panel(&self) -> Element<Message> {
        let summary = column![
            text(format!(
                "Welcome, {} {}!",
                self.draft.first_name.trim(),
                self.draft.last_name.trim()
            ))
            .size(36),
            text(format!("Purpose of visit: {}", self.draft.purpose)).size(18),
            text(format!("You are here to see: {}", self.draft.finding.trim())).size(18),
        ]
        .spacing(10)
        .align_x(Alignment::Center);

        let photo: Element<Message> = match &self.captured {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fixed(240.0))
                .into(),
            None => text("").into(),
        };

        column![
            summary,
            photo,
            button(text("Finish").size(24))
                .on_press_maybe((!self.submitting).then_some(Message::SubmitVisitor))
                .padding(15),
        ]
        .spacing(20)
        .align_x(Alignment::Center)
        .into()
    }
}
