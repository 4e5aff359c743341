//! Optional observability helpers for gateway operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `nms_gateway.op` with the `op` (entity
//!   family) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `nms_gateway_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operation families observed by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Credential exchange against the token endpoint.
	TokenExchange,
	/// Activity status polling.
	ActivityPoll,
	/// Venue operations.
	Venue,
	/// AP group operations.
	ApGroup,
	/// Access point operations.
	AccessPoint,
	/// Directory-server profile operations.
	DirectoryProfile,
	/// Administrator role operations.
	AdminRole,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::TokenExchange => "token_exchange",
			OpKind::ActivityPoll => "activity_poll",
			OpKind::Venue => "venue",
			OpKind::ApGroup => "ap_group",
			OpKind::AccessPoint => "access_point",
			OpKind::DirectoryProfile => "directory_profile",
			OpKind::AdminRole => "admin_role",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a gateway helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
