//! Core flashcard library used by the backend.
//!
//! Provides:
//! - Segmenter turning mixed Greek / English / Russian study text into cards
//! - Duplicate query building and matching
//! - Note field layout for exported cards
//! - Shared types (CardDraft, CardPatch, Outcome)

pub mod duplicates;
pub mod note;
pub mod segment;
pub mod types;

pub use duplicates::{escape_search_term, find_notes_query, mark_duplicates};
pub use note::{audio_filename, NoteFields, NOTE_TAGS};
pub use segment::{is_script_char, normalize_lines, segment, split_line, LineSplit};
pub use types::{CardDraft, CardPatch, Outcome};
