pub mod stats;

pub use stats::round_to;
