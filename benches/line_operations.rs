//! Benchmarks for line store and edit session operations
//!
//! Run with: cargo bench line_operations

use linebuf::editable::{EditSession, LineBuffer, TextBuffer};
use linebuf::line_ending::{split_lines, LineEnding};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn document(lines: usize) -> String {
    "foo bar baz\n".repeat(lines)
}

// ============================================================================
// Ingestion
// ============================================================================

#[divan::bench(args = [1000, 10_000, 100_000])]
fn split_lines_mixed(n: usize) {
    let text = "alpha\r\nbeta\ngamma\r".repeat(n / 3);
    divan::black_box(split_lines(divan::black_box(&text)));
}

#[divan::bench]
fn load_text_10k_lines(bencher: divan::Bencher) {
    let text = document(10_000);
    bencher.bench_local(|| {
        let mut session = EditSession::default();
        let _ = session.load_text(divan::black_box(&text));
        session
    });
}

#[divan::bench]
fn join_text_10k_lines(bencher: divan::Bencher) {
    let session = EditSession::with_text(&document(10_000));
    bencher.bench_local(|| divan::black_box(session.text()));
}

// ============================================================================
// Line store
// ============================================================================

#[divan::bench]
fn insert_range_middle_10k_lines() {
    let mut buffer = LineBuffer::from_text(&document(10_000));
    let lines = vec!["inserted".to_string(); 100];
    buffer.insert_range(5000, divan::black_box(lines));
}

#[divan::bench]
fn remove_range_middle_10k_lines() {
    let mut buffer = LineBuffer::from_text(&document(10_000));
    buffer.remove_range(divan::black_box(5000), 100);
}

#[divan::bench]
fn longest_line_10k_lines(bencher: divan::Bencher) {
    let mut buffer = LineBuffer::from_text(&document(10_000));
    bencher.bench_local(|| {
        // Invalidate the cached index
        buffer.replace_range(0, 0, Vec::new());
        divan::black_box(buffer.longest_line())
    });
}

#[divan::bench]
fn lines_as_string_middle(bencher: divan::Bencher) {
    let buffer = LineBuffer::from_text(&document(10_000));
    bencher.bench_local(|| divan::black_box(buffer.lines_as_string(4000, 2000, LineEnding::CrLf)));
}

// ============================================================================
// Editing with undo
// ============================================================================

#[divan::bench(args = [10, 100, 1000])]
fn type_characters(n: usize) {
    let mut session = EditSession::with_text(&document(1000));
    for _ in 0..n {
        session.insert_char(divan::black_box('x'));
    }
}

/// Keystroke cost should not grow with document length
#[divan::bench(args = [1000, 100_000, 400_000])]
fn type_at_end_of_large_document(bencher: divan::Bencher, lines: usize) {
    let mut session = EditSession::with_text(&document(lines));
    session.move_document_end(false);
    session.subscribe(|event| {
        divan::black_box(event);
    });
    bencher.bench_local(|| session.insert_char(divan::black_box('x')));
}

#[divan::bench]
fn replace_multi_line_selection(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| {
            let mut session = EditSession::with_text(&document(10_000));
            session.set_selection_from_absolute(12 * 100 + 4, 12 * 5000);
            session
        })
        .bench_local_values(|mut session| {
            session.insert_text(divan::black_box("replacement\ntext"));
            session
        });
}

#[divan::bench]
fn undo_redo_cycle(bencher: divan::Bencher) {
    let mut session = EditSession::with_text(&document(1000));
    session.set_selection_from_absolute(0, 12 * 500);
    session.insert_text("x");
    bencher.bench_local(|| {
        session.undo();
        session.redo();
    });
}

#[divan::bench]
fn replace_all_10k_lines(bencher: divan::Bencher) {
    bencher
        .with_inputs(|| EditSession::with_text(&document(10_000)))
        .bench_local_values(|mut session| {
            let _ = session.replace_all("bar", "qux", true, true);
            session
        });
}

#[divan::bench]
fn line_count_access() {
    let buffer = LineBuffer::from_text(&document(10_000));
    divan::black_box(buffer.line_count());
    divan::black_box(buffer.line(5000));
}
