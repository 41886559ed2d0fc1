//! PaperSim Core — simulation engine for a paper-trading sandbox.
//!
//! This crate contains the deterministic heart of the simulator:
//! - Domain types (trades, manual orders, portfolio state, OHLC candles)
//! - Synthetic price path generation (seeded random walks)
//! - Stateless indicator functions (moving average, RSI, Bollinger, momentum)
//! - The five-strategy evaluator shared by the backtester and the live bot
//! - The tick-by-tick backtest loop and its performance report
//! - The live paper-trading bot with a cooperative start/stop/reset scheduler
//! - A manual limit/market order book with idempotent fills
//!
//! Everything here is single-threaded, in-memory, and deterministic given a
//! seed. There is no network, no persistence, and no real order routing.

pub mod bot;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod orders;
pub mod rng;
pub mod strategy;
