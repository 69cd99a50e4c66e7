use glam::Vec2;
use tilebrawl::input::{InputEvent, KeyCode, MouseButton};
use tilebrawl::render::{Color, DrawCall, RecordingSurface};
use tilebrawl::scene::{Scene, SceneExit};
use tilebrawl::title::TitleScreen;

fn drawn() -> (TitleScreen, RecordingSurface) {
    let mut title = TitleScreen::new("tilebrawl").unwrap();
    let mut surface = RecordingSurface::new(256.0, 256.0);
    title.draw(&mut surface, 16.0);
    (title, surface)
}

#[test]
fn caption_is_centred_over_backdrop() {
    let (title, surface) = drawn();
    assert_eq!(surface.calls.first(), Some(&DrawCall::Fill(Color::SKY_BLUE)));
    assert_eq!(surface.texts(), vec!["tilebrawl"]);

    let rect = title.caption().unwrap().rect();
    assert_eq!(rect.min + rect.size * 0.5, Vec2::new(128.0, 128.0));
}

#[test]
fn hover_highlights_caption() {
    let (mut title, _) = drawn();
    assert_eq!(title.caption().unwrap().color(), Color::BLACK);

    title.handle(&InputEvent::MouseMove(Vec2::new(128.0, 128.0)));
    assert_eq!(title.caption().unwrap().color(), Color::WHITE);

    title.handle(&InputEvent::MouseMove(Vec2::new(4.0, 4.0)));
    assert_eq!(title.caption().unwrap().color(), Color::BLACK);
    assert_eq!(title.exit(), None);
}

#[test]
fn click_on_caption_starts() {
    let (mut title, _) = drawn();
    title.handle(&InputEvent::MouseButton { button: MouseButton::Left, pos: Vec2::new(4.0, 4.0) });
    assert_eq!(title.exit(), None);

    title.handle(&InputEvent::MouseButton { button: MouseButton::Left, pos: Vec2::new(130.0, 126.0) });
    assert_eq!(title.exit(), Some(SceneExit::StartGame));
}

#[test]
fn enter_highlights_then_starts_on_release() {
    let (mut title, _) = drawn();
    title.handle(&InputEvent::KeyDown(KeyCode::Enter));
    assert_eq!(title.caption().unwrap().color(), Color::WHITE);
    assert_eq!(title.exit(), None);

    title.handle(&InputEvent::KeyUp(KeyCode::Enter));
    assert_eq!(title.exit(), Some(SceneExit::StartGame));
}

#[test]
fn escape_and_quit_leave() {
    let (mut title, _) = drawn();
    title.handle(&InputEvent::KeyDown(KeyCode::Escape));
    assert_eq!(title.exit(), Some(SceneExit::Quit));

    let (mut title, _) = drawn();
    title.handle(&InputEvent::Quit);
    assert_eq!(title.exit(), Some(SceneExit::Quit));
}

#[test]
fn caption_available_before_first_draw() {
    let title = TitleScreen::new("42").unwrap();
    let caption = title.caption().unwrap();
    assert_eq!(caption.text(), "42");
    assert_eq!(caption.color(), Color::BLACK);
}
