//! Per-role tool loop.
//!
//! A consumer turn is free text plus requested tool calls. A turn without
//! tool calls ends the session and its text becomes the role's report.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RouterError;
use crate::router::CapabilityProfile;
use crate::toolkit::{ToolCall, ToolOutput, Toolkit};

/// Free-text marker some consumers emit alongside their final decision.
pub const FINAL_PROPOSAL_MARKER: &str = "FINAL TRANSACTION PROPOSAL";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeDecision {
    Buy,
    Hold,
    Sell,
}

impl fmt::Display for TradeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
        })
    }
}

pub fn contains_final_proposal(text: &str) -> bool {
    text.contains(FINAL_PROPOSAL_MARKER)
}

/// Decision following the last marker, e.g. `FINAL TRANSACTION PROPOSAL: **BUY**`.
pub fn parse_final_proposal(text: &str) -> Option<TradeDecision> {
    let (_, rest) = text.rsplit_once(FINAL_PROPOSAL_MARKER)?;
    let word: String = rest
        .trim_start_matches(|c: char| c == ':' || c == '*' || c.is_whitespace())
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();
    match word.to_ascii_uppercase().as_str() {
        "BUY" => Some(TradeDecision::Buy),
        "HOLD" => Some(TradeDecision::Hold),
        "SELL" => Some(TradeDecision::Sell),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerTurn {
    pub text: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl ConsumerTurn {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            text: String::new(),
            tool_calls,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleReport {
    /// State key such as `onchain_report`.
    pub key: &'static str,
    pub text: String,
    /// Set when the text carries the final-proposal marker.
    pub proposal: Option<TradeDecision>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Continue(Vec<ToolOutput>),
    Final(RoleReport),
}

pub struct RoleSession {
    profile: CapabilityProfile,
    rounds: usize,
    report: Option<RoleReport>,
}

impl RoleSession {
    pub fn new(profile: CapabilityProfile) -> Self {
        Self {
            profile,
            rounds: 0,
            report: None,
        }
    }

    pub fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    /// Tool rounds executed so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn report(&self) -> Option<&RoleReport> {
        self.report.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.report.is_some()
    }

    /// Feed one consumer turn. Calls run in request order; the first
    /// contract violation aborts the turn.
    pub async fn observe(&mut self, toolkit: &Toolkit, turn: ConsumerTurn) -> Result<TurnOutcome, RouterError> {
        if self.is_finished() {
            return Err(RouterError::SessionFinished);
        }

        if turn.tool_calls.is_empty() {
            let report = RoleReport {
                key: self.profile.role.report_key(self.profile.mode),
                proposal: parse_final_proposal(&turn.text),
                text: turn.text,
            };
            info!(
                "{} analyst finished for {} after {} tool rounds",
                self.profile.role, self.profile.asset, self.rounds
            );
            self.report = Some(report.clone());
            return Ok(TurnOutcome::Final(report));
        }

        if contains_final_proposal(&turn.text) {
            debug!("Final proposal marker present alongside tool calls; continuing");
        }

        let mut outputs = Vec::with_capacity(turn.tool_calls.len());
        for call in &turn.tool_calls {
            outputs.push(toolkit.dispatch(&self.profile, call).await?);
        }
        self.rounds += 1;
        Ok(TurnOutcome::Continue(outputs))
    }
}
