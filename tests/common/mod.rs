//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use linebuf::editable::{CursorPosition, EditSession};
use linebuf::{EditorEvent, LineEnding};

pub fn pos(line: usize, column: usize) -> CursorPosition {
    CursorPosition::new(line, column)
}

/// Create a session over `text` (LF-joined) with the caret at line/column
pub fn test_session(text: &str, line: usize, column: usize) -> EditSession {
    let mut session = EditSession::with_text(text);
    session.set_line_ending(LineEnding::Lf);
    session
        .set_cursor_position(line as isize, column as isize, true)
        .expect("clamped positions are always accepted");
    session
}

/// Create a session with a selection from anchor to head.
/// The caret will be at the head position.
pub fn test_session_with_selection(
    text: &str,
    anchor_line: usize,
    anchor_col: usize,
    head_line: usize,
    head_col: usize,
) -> EditSession {
    let mut session = test_session(text, head_line, head_col);
    session.set_selection(pos(anchor_line, anchor_col), pos(head_line, head_col));
    session
}

/// Lines of the session as owned strings, for easy comparisons
pub fn lines(session: &EditSession) -> Vec<String> {
    session.lines().to_vec()
}

/// Every event the session raises from now on
pub fn record_events(session: &mut EditSession) -> Rc<RefCell<Vec<EditorEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session.subscribe(move |event| sink.borrow_mut().push(*event));
    events
}

/// Run `edit`, then check that undo restores the text and caret and that redo
/// reapplies the edit exactly
pub fn assert_undo_round_trip(session: &mut EditSession, edit: impl FnOnce(&mut EditSession)) {
    let before_text = session.text();
    let before_cursor = session.cursor_position();

    edit(session);
    let after_text = session.text();
    let after_cursor = session.cursor_position();

    assert!(session.undo(), "nothing to undo after edit");
    assert_eq!(session.text(), before_text, "undo did not restore text");
    assert_eq!(
        session.cursor_position(),
        before_cursor,
        "undo did not restore cursor"
    );

    assert!(session.redo(), "nothing to redo after undo");
    assert_eq!(session.text(), after_text, "redo did not reapply text");
    assert_eq!(
        session.cursor_position(),
        after_cursor,
        "redo did not restore cursor"
    );
}
