//! PhishGuard - heuristic phishing email scorer
//!
//! Scores email text from 0 to 100 against a fixed table of phishing
//! heuristics and explains every point it adds. Everything runs locally.
//!
//! - [`engine`] - the scoring engine and its rule table
//! - [`history`] - capped history, aggregate stats and their persistence
//! - [`compare`] - side-by-side scoring of two emails
//! - [`reporters`] - text, markdown, json, csv output

pub mod cli;
pub mod compare;
pub mod config;
pub mod engine;
pub mod history;
pub mod models;
pub mod recommend;
pub mod reporters;
