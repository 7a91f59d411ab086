pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod pose;
pub mod skeleton;
pub mod tracker;
