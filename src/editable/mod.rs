//! Line-oriented text editing core.
//!
//! The document is an ordered list of lines stored without terminators. All
//! edits flow through [`EditSession`], which keeps the caret, selection and
//! undo history consistent with the text.
//!
//! # Architecture
//!
//! The core components are:
//!
//! - [`TextBuffer`]: Read-only view shared by navigation and selection code
//! - [`LineBuffer`]: The line store (backed by `Vec<String>`)
//! - [`Cursor`] / [`CursorPosition`]: Caret and navigation arithmetic
//! - [`TextSelection`]: Anchor/caret pair plus the shape-aware replace/remove
//! - [`UndoRedoLog`]: Line-range deltas with grouping
//! - [`EditSession`]: Main state container tying the above together
//! - [`EditCommand`]: Every editing action as a value
//!
//! # Example
//!
//! ```
//! use linebuf::editable::EditSession;
//!
//! let mut session = EditSession::with_text("hello");
//! session.move_line_end(false);
//! session.insert_char('!');
//! assert_eq!(session.text(), "hello!");
//!
//! session.undo();
//! assert_eq!(session.text(), "hello");
//! ```

mod buffer;
mod cursor;
mod events;
mod history;
pub mod indent;
mod messages;
pub mod selection;
mod state;

// Re-export main types
pub use buffer::{LineBuffer, TextBuffer};
pub use cursor::{step_count_left, step_count_right, Cursor, CursorPosition};
pub use events::{EditorEvent, EventBus, SubscriptionId};
pub use history::{SelectionState, UndoRedoItem, UndoRedoLog};
pub use indent::IndentStyle;
pub use messages::{EditCommand, MoveTarget};
pub use selection::TextSelection;
pub use state::{EditSession, LineDirection};
