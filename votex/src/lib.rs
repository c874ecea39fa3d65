// Votex: vote for a candidate by sending a zero-value transaction from a
// connected wallet.

pub mod app;
pub mod ballot;
pub mod config;
pub mod protocol;
pub mod tui;
pub mod wallet;
