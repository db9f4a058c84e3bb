pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod output;
pub mod roster;
pub mod runner;
pub mod search;
pub mod session;
pub mod utils;

#[cfg(test)]
mod tests;
