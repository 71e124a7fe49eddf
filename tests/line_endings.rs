//! Line ending tests - detection on load, normalization and character counts

mod common;

use linebuf::editable::EditSession;
use linebuf::line_ending::{clean_line_endings, split_lines};
use linebuf::{EditorSettings, LineEnding};

const ENDINGS: [LineEnding; 3] = [LineEnding::Lf, LineEnding::Cr, LineEnding::CrLf];

#[test]
fn test_clean_round_trip_through_cr() {
    let inputs = [
        "plain",
        "a\nb\nc",
        "a\r\nb\rc\nd",
        "\n\r\n\r",
        "trailing\r\n",
        "日本\r語\n",
    ];
    for input in inputs {
        let lf = clean_line_endings(input, LineEnding::Lf);
        let via_cr = clean_line_endings(&clean_line_endings(input, LineEnding::Cr), LineEnding::Lf);
        assert_eq!(via_cr, lf, "input {:?}", input);
    }
}

#[test]
fn test_load_detects_line_ending() {
    let mut session = EditSession::default();

    session.load_text("a\r\nb\nc").unwrap();
    assert_eq!(session.line_ending(), LineEnding::CrLf);
    assert_eq!(session.text(), "a\r\nb\r\nc");

    session.load_text("a\nb\rc").unwrap();
    assert_eq!(session.line_ending(), LineEnding::Lf);
    assert_eq!(session.text(), "a\nb\nc");

    session.load_text("a\rb").unwrap();
    assert_eq!(session.line_ending(), LineEnding::Cr);
}

#[test]
fn test_text_without_breaks_uses_default_ending() {
    let mut session = EditSession::default();
    session.load_text("single").unwrap();
    assert_eq!(session.line_ending(), LineEnding::CrLf);

    let mut session = EditSession::new(EditorSettings {
        default_line_ending: LineEnding::Lf,
        ..EditorSettings::default()
    });
    session.load_text("single").unwrap();
    assert_eq!(session.line_ending(), LineEnding::Lf);
}

#[test]
fn test_load_resets_cursor_and_selection() {
    let mut session = EditSession::with_text("abc\ndef");
    session.move_document_end(false);
    session.move_left(true);
    session.load_text("xyz").unwrap();
    assert_eq!(session.cursor_position().line, 0);
    assert_eq!(session.cursor_position().column, 0);
    assert!(!session.has_selection());
}

#[test]
fn test_trailing_break_gives_trailing_empty_line() {
    let session = EditSession::with_text("a\n");
    assert_eq!(session.lines(), &["a", ""]);
    assert_eq!(session.text(), "a\n");
}

#[test]
fn test_load_lines_splits_embedded_breaks() {
    let mut session = EditSession::with_text("x\ny");
    session
        .load_lines(vec!["a\r\nb".to_string(), "c".to_string()])
        .unwrap();
    assert_eq!(session.lines(), &["a", "b", "c"]);
    assert_eq!(session.line_ending(), LineEnding::Lf);
}

#[test]
fn test_set_line_ending_changes_output() {
    let mut session = EditSession::with_text("a\nb");
    session.set_line_ending(LineEnding::Cr);
    assert_eq!(session.text(), "a\rb");
}

#[test]
fn test_character_count_matches_text_length() {
    let docs = ["", "a", "a\nb", "\n\n\n", "日本語\nabc\r\n", "tab\there\r\n\r\n"];
    for doc in docs {
        let mut session = EditSession::with_text(doc);
        for ending in ENDINGS {
            session.set_line_ending(ending);
            assert_eq!(
                session.character_count(),
                session.text().chars().count(),
                "doc {:?} with {:?}",
                doc,
                ending
            );
        }
    }
}

#[test]
fn test_split_lines_never_empty() {
    assert_eq!(split_lines(""), vec![String::new()]);
    assert_eq!(EditSession::with_text("").line_count(), 1);
}
