pub mod anki;
pub mod audio;
pub mod cards;
pub mod explain;
pub mod settings;
