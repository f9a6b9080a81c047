//! Visual previews of a generated palette.

pub mod png;
pub mod terminal;
