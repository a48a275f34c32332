//! Integration tests for the f1-telget fetcher

mod batch_flow;
mod cli_binary;
mod config_integration;
mod test_utils;
