pub mod golden_corpus;
pub mod perf_fixtures;
pub mod tags;

mod entities;
mod locate;
mod stack;
mod tokenizer;
mod types;

pub use crate::locate::{
    ID_ATTR, LocateConfig, LocateError, LocatedElement, Locator, LocatorStats, MARKER_ATTR,
    locate, locate_with_config,
};
pub use crate::tags::{VOID_ELEMENTS, is_void_element};
pub use crate::tokenizer::{LexError, Tokenizer, TokenizerConfig, tokenize};
pub use crate::types::{Attribute, Span, Token};
