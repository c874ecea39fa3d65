// The two candidates on the ballot and the vote payload they encode.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Candidate {
    Trump,
    Biden,
}

impl Candidate {
    /// Ballot order, left to right.
    pub const ALL: [Candidate; 2] = [Candidate::Trump, Candidate::Biden];

    /// Short identifier used in payloads and logs.
    pub fn id(self) -> &'static str {
        match self {
            Candidate::Trump => "trump",
            Candidate::Biden => "biden",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Candidate::Trump => "Donald Trump",
            Candidate::Biden => "Joe Biden",
        }
    }

    /// Label on the card's vote button.
    pub fn button_label(self) -> &'static str {
        match self {
            Candidate::Trump => "Vote Trump",
            Candidate::Biden => "Vote Biden",
        }
    }

    /// Text drawn in place of a portrait.
    pub fn initials(self) -> &'static str {
        match self {
            Candidate::Trump => "DT",
            Candidate::Biden => "JB",
        }
    }

    /// Human-readable marker carried in the transaction payload.
    pub fn vote_message(self) -> String {
        format!("Vote for {}", self.id())
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// `0x`-prefixed hex of the UTF-8 vote message, the form wallets expect for
/// transaction `data`.
pub fn encode_vote_data(candidate: Candidate) -> String {
    format!("0x{}", hex::encode(candidate.vote_message()))
}
