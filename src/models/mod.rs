pub mod haiku;
pub mod lexicon;
pub mod post;
pub mod syllable;
pub mod token;

pub use haiku::*;
pub use lexicon::*;
pub use post::*;
pub use syllable::*;
pub use token::*;
