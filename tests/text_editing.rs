//! Text editing tests - insertion, deletion, line operations and search/replace

mod common;

use common::{lines, pos, record_events, test_session, test_session_with_selection};
use linebuf::editable::{EditSession, LineDirection};
use linebuf::{EditError, EditorEvent, EditorSettings, LineEnding};

// ========================================================================
// Insertion
// ========================================================================

#[test]
fn test_insert_at_caret() {
    let mut session = test_session("helo", 0, 2);
    assert!(session.insert_text("l"));
    assert_eq!(session.text(), "hello");
    assert_eq!(session.cursor_position(), pos(0, 3));
}

#[test]
fn test_insert_unicode() {
    let mut session = test_session("日本", 0, 1);
    session.insert_char('é');
    assert_eq!(session.text(), "日é本");
    assert_eq!(session.cursor_position(), pos(0, 2));
}

#[test]
fn test_insert_empty_text_is_noop() {
    let mut session = test_session("abc", 0, 1);
    assert!(!session.insert_text(""));
    assert!(!session.can_undo());
}

#[test]
fn test_insert_text_with_crlf() {
    let mut session = test_session("ab", 0, 1);
    session.insert_text("1\r\n2\r3");
    assert_eq!(lines(&session), vec!["a1", "2", "3b"]);
}

// ========================================================================
// Newline
// ========================================================================

#[test]
fn test_newline_in_empty_document() {
    let mut session = test_session("", 0, 0);
    assert!(session.insert_newline());
    assert_eq!(lines(&session), vec!["", ""]);
    assert_eq!(session.cursor_position(), pos(1, 0));
}

#[test]
fn test_newline_splits_line() {
    let mut session = test_session("hello world", 0, 5);
    session.insert_newline();
    assert_eq!(lines(&session), vec!["hello", " world"]);
    assert_eq!(session.cursor_position(), pos(1, 0));
}

#[test]
fn test_newline_repeats_tab_indent() {
    let mut session = test_session("\tfoo", 0, 4);
    session.insert_newline();
    assert_eq!(lines(&session), vec!["\tfoo", "\t"]);
    assert_eq!(session.cursor_position(), pos(1, 1));
}

#[test]
fn test_newline_indent_skips_blank_lines() {
    let mut session = test_session("    foo\n", 1, 0);
    session.insert_newline();
    assert_eq!(lines(&session), vec!["    foo", "", "    "]);
}

#[test]
fn test_newline_without_auto_indent() {
    let mut session = EditSession::new(EditorSettings {
        auto_indent: false,
        ..EditorSettings::default()
    });
    session.load_text("    foo").unwrap();
    session.move_line_end(false);
    session.insert_newline();
    assert_eq!(session.lines(), &["    foo", ""]);
}

#[test]
fn test_newline_replaces_selection() {
    let mut session = test_session_with_selection("hello world", 0, 5, 0, 6);
    session.insert_newline();
    assert_eq!(lines(&session), vec!["hello", "world"]);
    assert_eq!(session.cursor_position(), pos(1, 0));
}

// ========================================================================
// Deletion
// ========================================================================

#[test]
fn test_backspace() {
    let mut session = test_session("hello", 0, 5);
    assert!(session.delete_backward(false));
    assert_eq!(session.text(), "hell");
    assert_eq!(session.cursor_position(), pos(0, 4));
}

#[test]
fn test_backspace_at_document_start() {
    let mut session = test_session("hello", 0, 0);
    assert!(!session.delete_backward(false));
    assert_eq!(session.text(), "hello");
}

#[test]
fn test_delete_at_document_end() {
    let mut session = test_session("hello", 0, 5);
    assert!(!session.delete_forward(false, false));
}

#[test]
fn test_word_delete_punctuation_is_single_step() {
    let mut session = test_session("foo.bar", 0, 4);
    session.delete_backward(true);
    assert_eq!(session.text(), "foobar");
}

#[test]
fn test_word_delete_whitespace_run() {
    let mut session = test_session("foo    bar", 0, 3);
    session.delete_forward(true, false);
    assert_eq!(session.text(), "foobar");
}

#[test]
fn test_line_mode_ignores_selection() {
    let mut session = test_session_with_selection("one\ntwo\nthree", 2, 0, 1, 1);
    session.delete_forward(false, true);
    assert_eq!(lines(&session), vec!["one", "three"]);
}

// ========================================================================
// Line operations
// ========================================================================

#[test]
fn test_set_line_text() {
    let mut session = test_session("a\nb\nc", 0, 0);
    assert!(session.set_line_text(1, "x\ny"));
    assert_eq!(lines(&session), vec!["a", "x", "y", "c"]);
    assert!(!session.set_line_text(9, "nope"));
}

#[test]
fn test_add_line() {
    let mut session = test_session("a\nb", 1, 1);
    assert!(session.add_line(0, "z"));
    assert_eq!(lines(&session), vec!["z", "a", "b"]);
    assert_eq!(session.cursor_position(), pos(2, 1));

    assert!(session.add_line(3, "end"));
    assert_eq!(lines(&session), vec!["z", "a", "b", "end"]);
    assert!(!session.add_line(9, "nope"));
}

#[test]
fn test_delete_line() {
    let mut session = test_session("a\nb\nc", 2, 1);
    assert!(session.delete_line(1));
    assert_eq!(lines(&session), vec!["a", "c"]);
    assert_eq!(session.cursor_position(), pos(1, 1));
    assert!(!session.delete_line(5));
}

#[test]
fn test_delete_last_remaining_line() {
    let mut session = test_session("only", 0, 3);
    assert!(session.delete_line(0));
    assert_eq!(lines(&session), vec![""]);
    assert_eq!(session.cursor_position(), pos(0, 0));
}

#[test]
fn test_duplicate_line() {
    let mut session = test_session("abc\ndef", 0, 2);
    assert!(session.duplicate_line(0));
    assert_eq!(lines(&session), vec!["abc", "abc", "def"]);
    assert_eq!(session.cursor_position(), pos(1, 2));
    assert!(!session.duplicate_line(3));
}

#[test]
fn test_move_line() {
    let mut session = test_session("a\nb\nc", 1, 0);
    assert!(session.move_line(LineDirection::Up));
    assert_eq!(lines(&session), vec!["b", "a", "c"]);
    assert_eq!(session.cursor_position(), pos(0, 0));
    assert!(!session.move_line(LineDirection::Up));

    session.move_document_end(false);
    assert!(!session.move_line(LineDirection::Down));
}

#[test]
fn test_move_line_rejected_with_selection() {
    let mut session = test_session_with_selection("a\nb\nc", 1, 0, 1, 1);
    assert!(!session.move_line(LineDirection::Down));
    assert_eq!(session.text(), "a\nb\nc");
}

// ========================================================================
// Tab / outdent
// ========================================================================

#[test]
fn test_tab_inserts_spaces() {
    let mut session = test_session("x", 0, 0);
    assert!(session.insert_tab());
    assert_eq!(session.text(), "    x");
    assert_eq!(session.cursor_position(), pos(0, 4));
}

#[test]
fn test_tab_inserts_tab_in_tab_document() {
    let mut session = test_session("\ta\n\tb", 0, 1);
    session.insert_tab();
    assert_eq!(session.line(0), "\t\ta");
}

#[test]
fn test_tab_indents_selected_lines() {
    let mut session = test_session_with_selection("ab\ncd\nef", 0, 1, 1, 1);
    session.insert_tab();
    assert_eq!(lines(&session), vec!["    ab", "    cd", "ef"]);
    assert_eq!(session.selected_text(), "    ab\n    cd");
}

#[test]
fn test_outdent() {
    let mut session = test_session("    a\n        x", 1, 8);
    assert!(session.outdent());
    assert_eq!(session.line(1), "    x");
    assert_eq!(session.cursor_position(), pos(1, 4));

    let mut session = test_session("x", 0, 0);
    assert!(!session.outdent());
}

// ========================================================================
// Replace all
// ========================================================================

#[test]
fn test_replace_all_case_insensitive() {
    let mut session = test_session("foo bar\nFoo food", 0, 0);
    assert_eq!(session.replace_all("foo", "baz", false, false), Ok(3));
    assert_eq!(lines(&session), vec!["baz bar", "baz bazd"]);
}

#[test]
fn test_replace_all_whole_word() {
    let mut session = test_session("foo bar\nFoo food", 0, 0);
    assert_eq!(session.replace_all("foo", "baz", false, true), Ok(2));
    assert_eq!(lines(&session), vec!["baz bar", "baz food"]);
}

#[test]
fn test_replace_all_match_case() {
    let mut session = test_session("foo bar\nFoo food", 0, 0);
    assert_eq!(session.replace_all("foo", "baz", true, false), Ok(2));
    assert_eq!(lines(&session), vec!["baz bar", "Foo bazd"]);
}

#[test]
fn test_replace_all_literal_text() {
    let mut session = test_session("axb a.b", 0, 0);
    assert_eq!(session.replace_all("a.b", "$0", true, false), Ok(1));
    assert_eq!(session.text(), "axb $0");
}

#[test]
fn test_replace_all_with_line_break() {
    let mut session = test_session("a-b", 0, 0);
    assert_eq!(session.replace_all("-", "\n", true, false), Ok(1));
    assert_eq!(lines(&session), vec!["a", "b"]);
}

#[test]
fn test_replace_all_rejects_empty_terms() {
    let mut session = test_session("abc", 0, 0);
    assert!(matches!(
        session.replace_all("", "x", true, false),
        Err(EditError::InvalidInput(_))
    ));
    assert!(matches!(
        session.replace_all("a", "", true, false),
        Err(EditError::InvalidInput(_))
    ));
}

#[test]
fn test_replace_all_without_matches() {
    let mut session = test_session("abc", 0, 0);
    assert_eq!(session.replace_all("zzz", "x", true, false), Ok(0));
    assert!(!session.can_undo());
}

// ========================================================================
// Limits and read-only
// ========================================================================

#[test]
fn test_read_only_session() {
    let mut session = test_session("abc\ndef", 0, 0);
    session.set_read_only(true);
    assert!(!session.insert_text("x"));
    assert!(!session.insert_newline());
    assert!(!session.delete_forward(false, true));
    assert!(!session.duplicate_line(0));
    assert!(!session.move_line(LineDirection::Down));
    assert_eq!(session.replace_all("abc", "x", true, false), Ok(0));
    assert_eq!(session.text(), "abc\ndef");
}

#[test]
fn test_max_characters_blocks_growth() {
    let mut session = EditSession::new(EditorSettings {
        max_characters: Some(10),
        ..EditorSettings::default()
    });
    session.load_text("12345").unwrap();
    session.move_line_end(false);
    assert!(session.insert_text("67890"));
    assert!(!session.insert_char('x'));
    assert!(!session.insert_newline());

    // Shrinking edits are still allowed
    session.select_all();
    assert!(session.insert_text("short"));
    assert_eq!(session.text(), "short");
}

#[test]
fn test_max_characters_covers_line_operations() {
    let mut session = EditSession::new(EditorSettings {
        max_characters: Some(10),
        ..EditorSettings::default()
    });
    session.load_text("ab\ncdef").unwrap();
    assert_eq!(session.character_count(), 7);

    assert!(!session.insert_text("xyzw"));
    assert!(!session.duplicate_line(1));
    assert!(!session.add_line(0, "more text here"));
    assert!(!session.set_line_text(0, "a much longer replacement line"));

    session.set_selection(pos(0, 0), pos(1, 2));
    assert!(!session.insert_tab());
    session.clear_selection();

    assert_eq!(
        session.replace_all("a", "aaaaaa", true, false),
        Err(EditError::TooLarge {
            requested: 12,
            limit: 10
        })
    );
    assert_eq!(session.text(), "ab\ncdef");
    assert!(!session.can_undo());

    // Edits that stay within the limit still go through
    assert!(session.duplicate_line(0));
    assert!(session.set_line_text(2, "c"));
    assert_eq!(session.text(), "ab\nab\nc");
}

#[test]
fn test_max_characters_counts_auto_indent_and_rewrites() {
    let mut session = EditSession::new(EditorSettings {
        max_characters: Some(8),
        default_line_ending: LineEnding::Lf,
        ..EditorSettings::default()
    });
    session.load_text("    ab").unwrap();
    session.move_line_end(false);
    // One line break alone would fit, the repeated indent does not
    assert!(!session.insert_newline());
    assert_eq!(session.text(), "    ab");

    session.load_text("\tab").unwrap();
    assert_eq!(
        session.rewrite_indentation(8, true),
        Err(EditError::TooLarge {
            requested: 10,
            limit: 8
        })
    );
    assert_eq!(session.text(), "\tab");
    assert!(!session.settings().use_spaces);
}

#[test]
fn test_load_rejects_oversized_text() {
    let mut session = EditSession::new(EditorSettings {
        max_characters: Some(4),
        ..EditorSettings::default()
    });
    session.load_text("abcd").unwrap();
    let err = session.load_text("ab\r\ncd").unwrap_err();
    assert_eq!(err, EditError::TooLarge { requested: 6, limit: 4 });
    assert_eq!(session.text(), "abcd");
}

// ========================================================================
// Counting
// ========================================================================

#[test]
fn test_word_count() {
    assert_eq!(EditSession::with_text("  Hello   World  ").word_count(), 2);
    assert_eq!(EditSession::with_text("\n\n").word_count(), 0);
    assert_eq!(EditSession::with_text("Hello\nWorld\tTabbed").word_count(), 3);
}

// ========================================================================
// Notifications
// ========================================================================

#[test]
fn test_text_changed_precedes_selection_changed() {
    let mut session = test_session("abc", 0, 3);
    let events = record_events(&mut session);
    session.insert_char('d');

    assert_eq!(
        events.borrow().as_slice(),
        &[
            EditorEvent::TextChanged,
            EditorEvent::SelectionChanged {
                line: 0,
                column: 4,
                selection_start: 4,
                selection_length: 0,
            },
        ]
    );
}

#[test]
fn test_navigation_only_raises_selection_changed() {
    let mut session = test_session("abc\ndef", 0, 0);
    let events = record_events(&mut session);
    session.move_down(true);

    assert_eq!(
        events.borrow().as_slice(),
        &[EditorEvent::SelectionChanged {
            line: 1,
            column: 0,
            selection_start: 0,
            selection_length: 4,
        }]
    );
}

#[test]
fn test_rejected_edit_raises_nothing() {
    let mut session = test_session("abc", 0, 0);
    session.set_read_only(true);
    let events = record_events(&mut session);
    session.insert_char('x');
    assert!(events.borrow().is_empty());
}

#[test]
fn test_unsubscribe_stops_events() {
    let mut session = test_session("abc", 0, 0);
    let events = std::rc::Rc::new(std::cell::RefCell::new(0));
    let sink = std::rc::Rc::clone(&events);
    let id = session.subscribe(move |_| *sink.borrow_mut() += 1);

    session.insert_char('x');
    assert!(session.unsubscribe(id));
    session.insert_char('y');
    assert_eq!(*events.borrow(), 2);
}
