use super::*;
use crate::backend::MemoryBackend;
use crate::notify::NotificationMsg;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

fn bytes(n: usize) -> Vec<u8> {
    (0..n).map(|i| i as u8).collect()
}

async fn viewer(size: usize, rows: usize) -> (Arc<MemoryBackend>, Model) {
    let backend = Arc::new(MemoryBackend::new());
    let index = backend.open_bytes("test.bin", bytes(size)).await;
    let config = Config::new().with_rows(rows);
    let model = Model::new(index, size as u64, backend.clone(), config);
    (backend, model)
}

fn key(code: KeyCode) -> Msg {
    Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    })
}

async fn load_page(model: &mut Model) {
    let msg = model.fetch_page().await.expect("page message");
    let text = model.update(msg).expect("text refresh");
    let text_msg = text.await.expect("text message");
    model.update(text_msg);
}

fn plain(view: &str) -> String {
    lipgloss_extras::lipgloss::strip_ansi(view)
}

#[tokio::test]
async fn starts_at_file_start_with_fetch_pending() {
    let (_backend, model) = viewer(1000, 2).await;
    assert_eq!(model.window_start(), 0);
    assert_eq!(model.cursor(), 0);
    assert!(model.page().is_empty());
    assert!(model.page_is_stale());
    assert!(model.fetch_pending());
    assert!(!model.focused());
}

#[tokio::test]
async fn page_load_fills_buffer_and_text() {
    let (_backend, mut model) = viewer(1000, 2).await;
    load_page(&mut model).await;

    assert_eq!(model.page().len(), 32);
    assert_eq!(model.page()[5], 5);
    assert_eq!(model.page_start(), Some(0));
    assert!(!model.page_is_stale());
    assert!(model.inspector().text().is_some());
}

#[tokio::test]
async fn keys_are_ignored_while_unfocused() {
    let (_backend, mut model) = viewer(1000, 2).await;
    assert!(model.update(key(KeyCode::Right)).is_none());
    assert!(model.update(Box::new(WheelMsg { delta_y: 1 })).is_none());
    assert_eq!(model.nav_state(), NavState::default());
}

#[tokio::test]
async fn focus_change_requests_position_decode() {
    let (_backend, mut model) = viewer(1000, 2).await;
    model.focus();

    let cmd = model.update(key(KeyCode::Right)).expect("inspect");
    assert_eq!(model.cursor(), 1);
    let msg = cmd.await.expect("position message");
    assert!(model.owns(&msg));
    model.update(msg);
    assert_eq!(model.inspector().data_offset(), Some(1));
    assert_eq!(model.inspector().data().expect("data").value_le_u8, "1");
}

#[tokio::test]
async fn arrow_right_across_a_page_advances_one_page() {
    let (_backend, mut model) = viewer(1000, 2).await;
    model.focus();
    for _ in 0..32 {
        model.update(key(KeyCode::Right));
    }
    assert_eq!(model.cursor_offset(), 32);
    assert_eq!(model.window_start(), 16);
    assert_eq!(model.cursor(), 16);
    assert!(model.fetch_pending());
}

#[tokio::test]
async fn down_from_last_cell_clamps_to_max_window_start() {
    let (_backend, mut model) = viewer(40, 2).await;
    model.focus();

    model.update(key(KeyCode::PageDown));
    assert_eq!(model.cursor(), 31);

    model.update(key(KeyCode::Down));
    assert_eq!(model.window_start(), 8);
    assert_eq!(model.cursor_offset(), 39);

    assert!(model.update(key(KeyCode::Down)).is_none());
    assert_eq!(model.window_start(), 8);
}

#[tokio::test]
async fn wheel_moves_window_only() {
    let (_backend, mut model) = viewer(1000, 2).await;
    model.focus();
    model.update(key(KeyCode::Right));

    model.update(Box::new(WheelMsg { delta_y: 1 }));
    assert_eq!(model.window_start(), 16);
    assert_eq!(model.cursor(), 1);

    model.update(Box::new(WheelMsg { delta_y: -1 }));
    model.update(Box::new(WheelMsg { delta_y: -1 }));
    assert_eq!(model.window_start(), 0);

    model.mouse_wheel_enabled = false;
    assert!(model.update(Box::new(WheelMsg { delta_y: 1 })).is_none());
    assert_eq!(model.window_start(), 0);
}

#[tokio::test]
async fn stale_page_responses_are_discarded() {
    let (_backend, mut model) = viewer(1000, 2).await;
    let first = model.fetch_page();
    model.set_window_start(16);
    let second = model.fetch_page();

    let second_msg = second.await.expect("second");
    let first_msg = first.await.expect("first");
    assert!(model.update(second_msg).is_some());
    assert!(model.update(first_msg).is_none());

    assert_eq!(model.page_start(), Some(16));
    assert_eq!(model.page()[0], 16);
}

#[tokio::test]
async fn read_failure_keeps_page_and_notifies() {
    let (backend, mut model) = viewer(1000, 2).await;
    load_page(&mut model).await;

    backend.set_fail_reads(true).await;
    model.set_window_start(64);
    let msg = model.fetch_page().await.expect("page message");
    let cmd = model.update(msg).expect("notification");

    assert!(model.read_error());
    assert_eq!(model.page_start(), Some(0));
    assert_eq!(model.page()[1], 1);
    assert!(model.page_is_stale());

    let note = cmd.await.expect("notification message");
    let note = note.downcast_ref::<NotificationMsg>().expect("notification");
    assert_eq!(note.level, Level::Error);
    assert!(plain(&model.view()).contains("read failed"));

    backend.set_fail_reads(false).await;
    load_page(&mut model).await;
    assert!(!model.read_error());
    assert_eq!(model.page()[0], 64);
}

#[tokio::test]
async fn malformed_payload_is_an_empty_page() {
    let (_backend, mut model) = viewer(1000, 2).await;
    let _ = model.fetch_page();
    let msg: Msg = Box::new(PageLoadedMsg {
        id: model.id(),
        seq: 1,
        window_start: 0,
        result: Ok(FileReadResult {
            file_index: model.file_index(),
            file_data: "%%%".to_string(),
        }),
    });
    model.update(msg);
    assert!(model.page().is_empty());
    assert!(!model.read_error());
    assert_eq!(model.page_start(), Some(0));
}

#[tokio::test]
async fn slider_input_is_clamped() {
    let (_backend, mut model) = viewer(1000, 2).await;
    model.set_window_start(5000);
    assert_eq!(model.window_start(), 968);
    assert_eq!(model.scroll_percent(), 1.0);

    model.set_window_start(5);
    assert_eq!(model.window_start(), 5);

    model.set_window_start(0);
    assert_eq!(model.scroll_percent(), 0.0);
}

#[tokio::test]
async fn short_file_has_no_scroll_range() {
    let (_backend, mut model) = viewer(20, 2).await;
    model.focus();
    assert_eq!(model.scroll_percent(), 1.0);
    model.update(key(KeyCode::PageDown));
    assert_eq!(model.cursor(), 19);
    assert!(model.update(key(KeyCode::Right)).is_none());
    assert_eq!(model.window_start(), 0);
}

#[tokio::test]
async fn empty_file_ignores_input() {
    let (_backend, mut model) = viewer(0, 2).await;
    model.focus();
    assert!(model.update(key(KeyCode::Right)).is_none());
    assert!(model.update(Box::new(WheelMsg { delta_y: 1 })).is_none());
    assert!(model.set_window_start(100).is_none());
    let view = plain(&model.view());
    assert!(view.contains("00000000"));
}

#[tokio::test]
async fn hex_digits_edit_the_focused_cell() {
    let (_backend, mut model) = viewer(1000, 2).await;
    load_page(&mut model).await;
    model.focus();

    model.update(key(KeyCode::Char('a')));
    assert_eq!(model.pending_edit(), Some("a"));
    assert!(plain(&model.view()).contains("a_"));

    model.update(key(KeyCode::Char('B')));
    assert_eq!(model.pending_edit(), None);
    assert_eq!(model.page()[0], 0xab);

    model.update(key(KeyCode::Char('1')));
    model.update(key(KeyCode::Backspace));
    assert_eq!(model.pending_edit(), None);

    model.update(key(KeyCode::Char('x')));
    assert_eq!(model.page()[0], 0xab);
}

#[tokio::test]
async fn moving_the_cursor_drops_a_partial_edit() {
    let (_backend, mut model) = viewer(1000, 2).await;
    model.focus();
    model.update(key(KeyCode::Char('4')));
    model.update(key(KeyCode::Right));
    assert_eq!(model.pending_edit(), None);
}

#[tokio::test]
async fn inspector_toggles_route_through_viewport() {
    let (_backend, mut model) = viewer(1000, 2).await;
    model.focus();
    model.update(key(KeyCode::Char('m')));
    assert_eq!(model.inspector().mode, format::CharacterMode::Utf8);
    model.update(key(KeyCode::Char('i')));
    assert_eq!(model.inspector().endian, format::Endian::Big);
    assert_eq!(model.pending_edit(), None);
}

#[tokio::test]
async fn released_focus_is_restored_after_idle() {
    let backend = Arc::new(MemoryBackend::new());
    let index = backend.open_bytes("idle.bin", bytes(100)).await;
    let config = Config::new()
        .with_rows(2)
        .with_idle_timeout(Duration::ZERO)
        .with_poll_interval(Duration::from_millis(1));
    let mut model = Model::new(index, 100, backend, config);
    model.focus();

    model.release_cell_focus();
    assert!(!model.has_cell_focus());
    assert!(model.update(key(KeyCode::Right)).is_none());
    assert_eq!(model.cursor(), 0);

    let tick = model.idle.init().await.expect("idle tick");
    assert!(model.owns(&tick));
    assert!(model.update(tick).is_some());
    assert!(model.has_cell_focus());
}

#[tokio::test]
async fn fetch_fires_once_scrolling_settles() {
    let backend = Arc::new(MemoryBackend::new());
    let index = backend.open_bytes("fetch.bin", bytes(1000)).await;
    let config = Config::new()
        .with_rows(2)
        .with_fetch_debounce(Duration::ZERO)
        .with_poll_interval(Duration::from_millis(1));
    let mut model = Model::new(index, 1000, backend, config);

    let tick = model.fetch.init().await.expect("fetch tick");
    assert!(model.update(tick).is_some());
    assert!(!model.fetch_pending());
    assert_eq!(model.requests.latest(RequestKind::Page), 1);
}

#[tokio::test]
async fn owns_only_its_own_messages() {
    let (_backend, model) = viewer(1000, 2).await;
    let (_other_backend, other) = viewer(1000, 2).await;

    let mine: Msg = Box::new(PageLoadedMsg {
        id: model.id(),
        seq: 1,
        window_start: 0,
        result: Err(BackendError::Io("x".into())),
    });
    assert!(model.owns(&mine));
    assert!(!other.owns(&mine));
    assert!(!model.owns(&key(KeyCode::Up)));
}

#[tokio::test]
async fn view_renders_offsets_cells_and_text() {
    let backend = Arc::new(MemoryBackend::new());
    let mut data = bytes(64);
    data[16..21].copy_from_slice(b"hello");
    let index = backend.open_bytes("v.bin", data).await;
    let mut model = Model::new(index, 64, backend, Config::new().with_rows(2));
    load_page(&mut model).await;

    let view = plain(&model.view());
    assert!(view.contains("00000000 00 01 02 03"));
    assert!(view.contains("00000010 68 65 6C 6C 6F"));
    assert!(view.contains("hello"));

    model.hex_upper_case = false;
    assert!(plain(&model.view()).contains("68 65 6c 6c 6f"));
}

#[tokio::test]
async fn seed_shows_first_page_until_a_fetch_lands() {
    let (backend, mut model) = viewer(1000, 2).await;
    let seed = backend
        .read_file_current_pos(model.file_index())
        .await
        .expect("seed");
    let text = model.seed(&seed).expect("text refresh");
    assert_eq!(model.page().len(), 32);
    assert_eq!(model.page_start(), Some(0));

    model.update(text.await.expect("text message"));
    assert_eq!(model.inspector().text_start(), Some(0));

    model.set_window_start(16);
    load_page(&mut model).await;
    assert!(model.seed(&seed).is_none());
    assert_eq!(model.page_start(), Some(16));
}

#[tokio::test]
async fn text_from_a_superseded_read_is_dropped() {
    let (_backend, mut model) = viewer(1000, 2).await;
    let page = model.fetch_page().await.expect("page message");
    let early_text = model.update(page).expect("text refresh");

    // A newer read moves the backend before the early text decode runs.
    model.set_window_start(64);
    let newer_page = model.fetch_page().await.expect("newer page");
    let early_text = early_text.await.expect("text message");

    assert!(model.update(early_text).is_none());
    assert!(model.inspector().text().is_none());
    assert!(!plain(&model.view()).contains('@'));

    let text = model.update(newer_page).expect("text refresh");
    model.update(text.await.expect("text message"));
    assert_eq!(model.inspector().text_start(), Some(64));
    assert!(plain(&model.view()).contains("@ABCDEFGHIJKLMNO"));
}

#[tokio::test]
async fn text_column_is_blank_until_text_for_the_page_arrives() {
    let (_backend, mut model) = viewer(1000, 2).await;
    load_page(&mut model).await;
    assert_eq!(model.inspector().text_start(), Some(0));

    model.set_window_start(64);
    let page = model.fetch_page().await.expect("page message");
    let text = model.update(page).expect("text refresh");
    assert_eq!(model.page_start(), Some(64));
    assert_eq!(model.inspector().text_start(), Some(0));

    let view = plain(&model.view());
    assert!(view.contains("00000040 40 41 42"));
    assert!(!view.contains("@ABC"));
    assert!(!view.contains("...."));

    model.update(text.await.expect("text message"));
    assert!(plain(&model.view()).contains("@ABCDEFGHIJKLMNO"));
}

#[tokio::test]
async fn wide_text_cells_keep_rows_aligned() {
    let backend = Arc::new(MemoryBackend::new());
    let index = backend.open_bytes("w.bin", b"AB".repeat(16)).await;
    let mut model = Model::new(index, 32, backend, Config::new().with_rows(2));
    model.inspector_mut().mode = format::CharacterMode::Utf16;
    load_page(&mut model).await;

    let view = plain(&model.view());
    for line in view.lines().skip(1).take(2) {
        let (_, text) = line.split_at(8 + 16 * 3 + 2);
        assert_eq!(UnicodeWidthStr::width(text), 16);
        assert!(text.chars().all(|c| c == '.'));
    }
}
