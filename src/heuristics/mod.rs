pub mod guess;
pub mod letters;
pub mod numbers;
pub mod screening;
pub mod token_clean;

pub use guess::*;
pub use letters::*;
pub use numbers::*;
pub use screening::*;
pub use token_clean::*;
