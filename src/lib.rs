//! trend-report: Aggregate hot-topic feeds into merged daily reports
//!
//! The engine consumes normalized news items and keyword groupings produced
//! by external collectors, folds them into a canonical report model that
//! accumulates across same-day runs (persisted in a round-trippable flat
//! text grammar), and renders text, JSON, and email-HTML artifacts plus
//! per-destination chat messages from that one model.

pub mod builder;
pub mod cli;
pub mod codec;
pub mod config;
pub mod domain;
pub mod merge;
pub mod rank;
pub mod render;
pub mod utils;
