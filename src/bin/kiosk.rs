use visitor_kiosk::ui::kiosk::KioskApp;

fn main() -> iced::Result {
    iced::application("Visitor Check-In", KioskApp::update, KioskApp::view)
        .subscription(KioskApp::subscription)
        .theme(KioskApp::theme)
        .window_size((1024.0, 768.0))
        .centered()
        .run_with(KioskApp::new)
}
