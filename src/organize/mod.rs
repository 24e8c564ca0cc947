pub mod format;
pub mod planner;
pub mod tree;

pub use planner::OutputTarget;
