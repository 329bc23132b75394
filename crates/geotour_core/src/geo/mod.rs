pub mod centroid;
pub mod geometry;
