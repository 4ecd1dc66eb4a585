pub mod app;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod filter;
pub mod markers;
pub mod output;

#[cfg(test)]
mod tests;
