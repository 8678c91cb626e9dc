//! Swappable authorization policy, evaluated on every restricted call.

use oracle_types::Principal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Operations whose callers may be restricted.
///
/// Submitting, proposing and disputing are open to any attested principal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    CreateEvent,
    Finalize,
    CastVote,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateEvent => "create_event",
            Self::Finalize => "finalize",
            Self::CastVote => "cast_vote",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a caller may perform an action.
pub trait AuthorizationPolicy {
    fn is_allowed(&self, action: Action, caller: &Principal) -> bool;
}

/// Who may perform one action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AccessRule {
    /// Any caller.
    #[default]
    Open,
    /// Only the listed principals.
    Restricted { members: BTreeSet<Principal> },
}

impl AccessRule {
    pub fn restricted<I, P>(members: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Principal>,
    {
        Self::Restricted {
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows(&self, caller: &Principal) -> bool {
        match self {
            Self::Open => true,
            Self::Restricted { members } => members.contains(caller),
        }
    }
}

/// One [`AccessRule`] per restricted action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RolePolicy {
    pub create: AccessRule,
    pub finalize: AccessRule,
    pub jury: AccessRule,
}

impl RolePolicy {
    /// Everything open.
    pub fn open() -> Self {
        Self::default()
    }
}

impl AuthorizationPolicy for RolePolicy {
    fn is_allowed(&self, action: Action, caller: &Principal) -> bool {
        let rule = match action {
            Action::CreateEvent => &self.create,
            Action::Finalize => &self.finalize,
            Action::CastVote => &self.jury,
        };
        rule.allows(caller)
    }
}
