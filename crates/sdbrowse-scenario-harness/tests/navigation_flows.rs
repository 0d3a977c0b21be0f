use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;
use sdbrowse_scenario_harness::ScenarioHarness;
use sdbrowse_ui::mock_storage::MockStorage;
use sdbrowse_ui::{
    ConfigBuilder, ConfigError, NavButton, Notice, Phase, Renderer, DISPLAY_HEIGHT, ENTRY_CAPACITY,
};

fn setup_library() -> MockStorage {
    let mut fs = MockStorage::empty();
    fs.add_directory("/books");
    fs.add_file("/notes.txt");
    fs.add_directory("/photos");
    for i in 0..7 {
        fs.add_file(&format!("/books/book{}.txt", i));
    }
    fs.add_directory("/books/archive");
    fs
}

fn booted(fs: MockStorage) -> ScenarioHarness {
    let mut harness = ScenarioHarness::with_defaults(fs);
    harness.boot().expect("boot should succeed");
    harness
}

fn row_is_inverted(harness: &ScenarioHarness, row: usize) -> bool {
    harness
        .display()
        .pixel(Point::new(0, Renderer::row_top(row)))
        == Some(BinaryColor::On)
}

#[test]
fn browse_into_directory_scroll_and_back() {
    let mut harness = booted(setup_library());
    assert_eq!(harness.model().entry_count(), 3);
    assert!(row_is_inverted(&harness, 0));

    // Root -> /books
    assert!(harness.press(NavButton::Enter));
    assert_eq!(harness.model().current_path(), "/books");
    assert_eq!(harness.model().entry_count(), 8);

    // Walk past the bottom of the five-row window
    for _ in 0..6 {
        assert!(harness.press(NavButton::Scroll));
    }
    assert_eq!(harness.model().selection_index(), 6);
    assert_eq!(harness.model().scroll_offset(), 2);
    assert!(row_is_inverted(&harness, 4));
    assert!(!row_is_inverted(&harness, 0));

    // Back to root resets the selection
    assert!(harness.press(NavButton::Back));
    assert_eq!(harness.model().current_path(), "/");
    assert_eq!(harness.model().selection_index(), 0);

    // Back at root stays put without touching storage
    let reads = harness.storage().read_log().len();
    assert!(harness.press(NavButton::Back));
    assert_eq!(harness.storage().read_log().len(), reads);
    assert_eq!(harness.phase(), Phase::Browsing);
}

#[test]
fn scroll_wraps_to_top() {
    let mut fs = MockStorage::empty();
    for i in 0..7 {
        fs.add_file(&format!("/f{}.txt", i));
    }
    let mut harness = booted(fs);

    for _ in 0..6 {
        assert!(harness.press(NavButton::Scroll));
    }
    assert_eq!(harness.model().scroll_offset(), 2);

    assert!(harness.press(NavButton::Scroll));
    assert_eq!(harness.model().selection_index(), 0);
    assert_eq!(harness.model().scroll_offset(), 0);
    assert!(row_is_inverted(&harness, 0));
}

#[test]
fn enter_on_file_shows_notice_then_list() {
    let mut harness = booted(setup_library());
    assert!(harness.press(NavButton::Scroll));

    let before = harness.now_ms();
    assert!(harness.press(NavButton::Enter));
    assert!(harness.now_ms() - before >= 1_500);

    assert_eq!(
        harness.controller().last_notice(),
        Some((Notice::FileSelected, "notes.txt"))
    );
    assert_eq!(harness.model().selection_index(), 1);
    assert_eq!(harness.model().current_path(), "/");
    // List is back on screen, second row highlighted
    assert!(row_is_inverted(&harness, 1));
}

#[test]
fn unreadable_directory_shows_open_failed() {
    let mut fs = setup_library();
    fs.make_unreadable("/photos");
    let mut harness = booted(fs);
    assert!(harness.press(NavButton::Scroll));
    assert!(harness.press(NavButton::Scroll));
    let before = harness.model().clone();

    assert!(harness.press(NavButton::Enter));

    assert_eq!(harness.model(), &before);
    assert_eq!(
        harness.controller().last_notice(),
        Some((Notice::OpenFailed, "photos"))
    );
}

#[test]
fn long_hold_moves_once() {
    let mut harness = booted(setup_library());
    assert!(harness.hold(NavButton::Scroll, 3_000));
    assert_eq!(harness.idle(1_000), 0);
    assert_eq!(harness.model().selection_index(), 1);
}

#[test]
fn oversized_directory_keeps_first_entries() {
    let mut fs = MockStorage::empty();
    for i in 0..60 {
        fs.add_file(&format!("/item{:02}.dat", i));
    }
    let mut harness = booted(fs);

    assert_eq!(harness.model().entry_count(), ENTRY_CAPACITY);
    let last = &harness.model().entries()[ENTRY_CAPACITY - 1];
    assert_eq!(last.name(), "item49.dat");
}

#[test]
fn extension_filter_hides_other_files() {
    let mut fs = MockStorage::empty();
    fs.add_file("/song.MP3");
    fs.add_file("/cover.jpg");
    fs.add_directory("/albums");
    fs.add_file("/albums/one.mp3");
    let config = ConfigBuilder::new()
        .extension_filter("mp3")
        .build()
        .unwrap();
    let mut harness = ScenarioHarness::new(fs, config);
    harness.boot().unwrap();

    let names: Vec<&str> = harness
        .model()
        .entries()
        .iter()
        .map(|entry| entry.name())
        .collect();
    assert_eq!(names, ["song.MP3", "albums"]);
}

#[test]
fn card_removed_mid_session_falls_back_to_root() {
    let mut harness = booted(setup_library());
    assert!(harness.press(NavButton::Enter));
    assert_eq!(harness.model().current_path(), "/books");

    harness.storage_mut().fail_reads_after(0);
    assert!(harness.press(NavButton::Back));

    assert_eq!(harness.model().current_path(), "/");
    assert_eq!(harness.model().entry_count(), 0);
    assert_eq!(harness.phase(), Phase::Browsing);
}

#[test]
fn selection_stays_on_panel_through_long_list() {
    assert_eq!(
        ConfigBuilder::new().visible_rows(8).build(),
        Err(ConfigError::VisibleRowsExceedPanel { rows: 8, max: 5 })
    );

    let mut fs = MockStorage::empty();
    for i in 0..12 {
        fs.add_file(&format!("/f{:02}.txt", i));
    }
    let config = ConfigBuilder::new()
        .visible_rows(Renderer::rows_fitting(DISPLAY_HEIGHT))
        .build()
        .unwrap();
    let mut harness = ScenarioHarness::new(fs, config);
    harness.boot().unwrap();
    let rows = harness.controller().config().visible_rows;

    for _ in 0..7 {
        assert!(harness.press(NavButton::Scroll));
        let window_row = harness.model().selection_index() - harness.model().scroll_offset();
        assert!(window_row < rows);
        let bottom = Renderer::row_top(window_row) + Renderer::ROW_HEIGHT as i32;
        assert!(bottom <= DISPLAY_HEIGHT as i32);
        assert!(row_is_inverted(&harness, window_row));
    }
    assert_eq!(harness.model().selection_index(), 7);
    assert_eq!(harness.model().scroll_offset(), 3);
}
