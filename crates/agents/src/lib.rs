//! Chainlens Agents Crate
//!
//! Routes analyst roles to the operations they may call and executes those
//! operations against the market-intel hub.
//!
//! - [`router`]: pure selection of a [`CapabilityProfile`] from mode, role and asset
//! - [`toolkit`]: argument decoding and text rendering for each operation
//! - [`session`]: the per-role loop that ends on a turn without tool calls

pub mod error;
pub mod router;
pub mod session;
pub mod toolkit;

pub use error::RouterError;
pub use router::{select_operations, AnalystRole, CapabilityProfile, Operation, OperatingMode};
pub use session::{
    contains_final_proposal, parse_final_proposal, ConsumerTurn, RoleReport, RoleSession,
    TradeDecision, TurnOutcome, FINAL_PROPOSAL_MARKER,
};
pub use toolkit::{ToolCall, ToolOutput, Toolkit};
