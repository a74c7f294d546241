pub mod api;
pub mod booking;
pub mod cli;
pub mod core;
pub mod graph;
pub mod jobs;
pub mod view;
