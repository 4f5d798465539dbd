pub mod line;

pub use line::{normalize_line, parse_line};
