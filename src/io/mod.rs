pub mod input;
pub mod output;
pub mod resources;

pub use input::*;
pub use output::*;
pub use resources::*;
