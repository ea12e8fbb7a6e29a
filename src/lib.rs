pub mod classifier;
pub mod config;
pub mod detection;
pub mod web;
