pub mod construction;
pub mod exhaustive;
pub mod kmeans;
pub mod strategy;
pub mod two_opt;
