//! Taiwan market sentiment aggregator library.
//!
//! Scrapes the PTT Stock board, resolves recent podcast episodes, classifies
//! both with an LLM (falling back to keyword heuristics), retrieves the CNN
//! Fear & Greed index and serves the results as JSON and a small dashboard.

#![allow(clippy::needless_raw_string_hashes)]

pub mod aggregator;
pub mod classifier;
pub mod components;
pub mod config;
pub mod constants;
pub mod fear_greed;
pub mod fetcher;
pub mod llm;
pub mod models;
pub mod podcast;
pub mod ptt;
pub mod web;
