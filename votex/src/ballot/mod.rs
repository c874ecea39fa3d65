// Candidates, vote submission and the local tally.

pub mod candidate;
pub mod state;

pub use candidate::{encode_vote_data, Candidate};
pub use state::{build_vote_request, Ballot, Tally, VoteOutcome, VoteReceipt};
