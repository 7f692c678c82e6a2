//! Text-backed implementation of the markup capability.

mod document;
mod tags;

pub use document::{BUST_ATTRIBUTE, HtmlDocument};
