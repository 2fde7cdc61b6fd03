use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::TypesError;

/// One past the highest rule code. Valid punishable rules are `1..MAX_RULE`.
pub const MAX_RULE: u8 = 5;

/// A category of client misbehavior that can get an account penalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rule {
    /// Not a rule violation. Used for accounts in good standing.
    NoRule = 0,
    /// Failed to respond with a valid preimage for an order during epoch processing.
    PreimageReveal = 1,
    /// Did not follow through on a swap negotiation step.
    FailureToAct = 2,
    /// Cancellation rate exceeded the allowed threshold.
    CancellationRate = 3,
    /// Swap transactions paid fees below the required rate.
    LowFees = 4,
}

impl Rule {
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether an account can be penalized for breaking this rule.
    pub fn is_punishable(self) -> bool {
        self != Rule::NoRule
    }

    pub fn description(self) -> &'static str {
        match self {
            Rule::NoRule => "no rules have been broken",
            Rule::PreimageReveal => "failed to respond with a valid preimage for an order during epoch processing",
            Rule::FailureToAct => "did not follow through on a swap negotiation step",
            Rule::CancellationRate => "cancellation rate dropped below the acceptable level",
            Rule::LowFees => "did not pay transaction mining fees at the requisite level",
        }
    }
}

impl TryFrom<u8> for Rule {
    type Error = TypesError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Rule::NoRule),
            1 => Ok(Rule::PreimageReveal),
            2 => Ok(Rule::FailureToAct),
            3 => Ok(Rule::CancellationRate),
            4 => Ok(Rule::LowFees),
            other => Err(TypesError::UnknownRule(other)),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Rule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Rule::try_from(code).map_err(serde::de::Error::custom)
    }
}
