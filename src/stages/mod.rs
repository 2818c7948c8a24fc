pub mod stage0_normalize;
pub mod stage1_syllables;
pub mod stage2_segment;
pub mod stage3_rank;

pub use stage0_normalize::*;
pub use stage1_syllables::*;
pub use stage2_segment::*;
pub use stage3_rank::*;
