//! Jury tally and verdict.
//!
//! Majority is computed over votes actually cast, not over the eligible
//! jury. A strict agree majority upholds the proposal, a strict disagree
//! majority rejects it, and a tie (including no votes at all) is settled by
//! the configured [`TieBreakRule`].

use oracle_store::VoteRecord;
use oracle_types::FinalOutcome;
use serde::{Deserialize, Serialize};

/// How an exact tie between agree and disagree votes is resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakRule {
    /// The proposal stands unless a strict majority rejects it.
    #[default]
    UpholdProposal,
    /// The proposal stands only if a strict majority agrees.
    RejectProposal,
}

/// Current vote counts for a disputed proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub agree: u64,
    pub disagree: u64,
}

/// The jury's decision on a proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Upheld,
    Rejected,
}

impl Tally {
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a VoteRecord>) -> Self {
        votes.into_iter().fold(Self::default(), |mut tally, vote| {
            if vote.agree {
                tally.agree += 1;
            } else {
                tally.disagree += 1;
            }
            tally
        })
    }

    pub fn total(&self) -> u64 {
        self.agree + self.disagree
    }

    pub fn verdict(&self, tie_break: TieBreakRule) -> Verdict {
        use std::cmp::Ordering;
        match self.agree.cmp(&self.disagree) {
            Ordering::Greater => Verdict::Upheld,
            Ordering::Less => Verdict::Rejected,
            Ordering::Equal => match tie_break {
                TieBreakRule::UpholdProposal => Verdict::Upheld,
                TieBreakRule::RejectProposal => Verdict::Rejected,
            },
        }
    }

    /// The terminal outcome for a disputed proposal of `proposed_value`.
    pub fn outcome(&self, proposed_value: u64, tie_break: TieBreakRule) -> FinalOutcome {
        match self.verdict(tie_break) {
            Verdict::Upheld => FinalOutcome::Resolved {
                value: proposed_value,
            },
            Verdict::Rejected => FinalOutcome::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oracle_types::{EventId, Principal, Timestamp};

    fn vote(voter: &str, agree: bool) -> VoteRecord {
        VoteRecord {
            event_id: EventId::new("e1"),
            voter: Principal::new(voter),
            agree,
            cast_at: Timestamp::new(10),
        }
    }

    #[test]
    fn counts_votes() {
        let votes = [vote("a", true), vote("b", true), vote("c", false)];
        let tally = Tally::from_votes(&votes);
        assert_eq!(tally, Tally { agree: 2, disagree: 1 });
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn strict_majorities_decide() {
        let agree = Tally { agree: 2, disagree: 1 };
        let disagree = Tally { agree: 1, disagree: 2 };
        for rule in [TieBreakRule::UpholdProposal, TieBreakRule::RejectProposal] {
            assert_eq!(agree.outcome(62, rule), FinalOutcome::Resolved { value: 62 });
            assert_eq!(disagree.outcome(62, rule), FinalOutcome::Rejected);
        }
    }

    #[test]
    fn ties_follow_rule() {
        let tie = Tally { agree: 2, disagree: 2 };
        assert_eq!(tie.verdict(TieBreakRule::UpholdProposal), Verdict::Upheld);
        assert_eq!(tie.verdict(TieBreakRule::RejectProposal), Verdict::Rejected);

        let empty = Tally::default();
        assert_eq!(empty.outcome(40, TieBreakRule::default()), FinalOutcome::Resolved { value: 40 });
        assert_eq!(empty.outcome(40, TieBreakRule::RejectProposal), FinalOutcome::Rejected);
    }
}
