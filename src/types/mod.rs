pub mod sample;
pub mod score;

pub use sample::AccelSample;
pub use score::PunchScore;
