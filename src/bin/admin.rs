use visitor_kiosk::ui::admin::AdminApp;

fn main() -> iced::Result {
    iced::application("Visitor Log", AdminApp::update, AdminApp::view)
        .theme(AdminApp::theme)
        .window_size((1040.0, 720.0))
        .centered()
        .run_with(AdminApp::new)
}
