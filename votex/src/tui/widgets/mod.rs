// TUI widget modules for each screen panel.

pub mod candidate_card;
pub mod quit_confirm;
pub mod receipts;
pub mod title_bar;
