//! Asynchronous-operation tracking: the activity prober and the bounded poll loop.
//!
//! Mutating backend calls return an optional tracking identifier; the backend then
//! executes the operation asynchronously. Two endpoint families report completion with
//! incompatible vocabularies: one gates on a completion-timestamp field with
//! `SUCCESS`/`INPROGRESS` statuses, the other uses an explicit `COMPLETED`/`FAILED`
//! enumeration and no timestamp signal. [`Poller`] hides both behind a single state
//! machine parametrized by [`StatusPolicy`], so call sites select a policy instead of
//! duplicating the loop.

// self
use crate::{
	_prelude::*,
	auth::CredentialRecord,
	backend::BackendDescriptor,
	error::{ApiError, ProtocolError},
	http::{ApiRequest, ApiTransport, Method, Sleeper},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

const STATUS_SUCCESS: &str = "SUCCESS";
const STATUS_INPROGRESS: &str = "INPROGRESS";
const STATUS_COMPLETED: &str = "COMPLETED";
const STATUS_FAILED: &str = "FAILED";

/// Polled status snapshot of a tracked backend operation.
///
/// Fetched fresh on every poll attempt; never cached locally. Unknown fields are
/// ignored so either endpoint family's payload deserializes into the same record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityRecord {
	/// Raw status value as reported by the backend.
	pub status: String,
	/// Completion timestamp, present once timestamp-gated operations finish.
	pub end_datetime: Option<String>,
	/// Structured error payload attached to failed operations.
	pub error: Option<serde_json::Value>,
	/// Human-readable progress or failure message.
	pub message: Option<String>,
}

/// Terminal-condition vocabulary used by an endpoint family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
	/// Terminal once `endDatetime` is present; `SUCCESS` means success, anything else
	/// failure. A status outside `SUCCESS`/`INPROGRESS` is failure even while the
	/// timestamp is still absent.
	EndDatetimeGated,
	/// Terminal iff the status reads `COMPLETED` (success) or `FAILED` (failure); every
	/// other value counts as still in progress.
	StatusGated,
}
impl StatusPolicy {
	/// Evaluates one fetched record under this policy.
	pub fn evaluate(self, record: &ActivityRecord) -> StatusDisposition {
		match self {
			StatusPolicy::EndDatetimeGated =>
				if record.end_datetime.is_some() {
					if record.status == STATUS_SUCCESS {
						StatusDisposition::Success
					} else {
						StatusDisposition::Failure
					}
				} else if record.status == STATUS_SUCCESS || record.status == STATUS_INPROGRESS {
					StatusDisposition::InFlight
				} else {
					StatusDisposition::Failure
				},
			StatusPolicy::StatusGated => match record.status.as_str() {
				STATUS_COMPLETED => StatusDisposition::Success,
				STATUS_FAILED => StatusDisposition::Failure,
				_ => StatusDisposition::InFlight,
			},
		}
	}
}

/// Per-attempt verdict produced by [`StatusPolicy::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusDisposition {
	/// Operation finished successfully.
	Success,
	/// Operation finished and failed.
	Failure,
	/// Operation is still running; poll again.
	InFlight,
}

/// Attempt budget and cadence for one poll loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
	/// Maximum number of status fetches before giving up.
	pub max_attempts: u32,
	/// Suspension between consecutive fetches.
	pub interval: Duration,
}
impl PollSettings {
	/// Default fetch budget.
	pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
	/// Default suspension between fetches.
	pub const DEFAULT_INTERVAL: Duration = Duration::milliseconds(2_000);

	/// Overrides the fetch budget.
	pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
		self.max_attempts = max_attempts;

		self
	}

	/// Overrides the suspension between fetches.
	pub fn with_interval(mut self, interval: Duration) -> Self {
		self.interval = interval;

		self
	}
}
impl Default for PollSettings {
	fn default() -> Self {
		Self { max_attempts: Self::DEFAULT_MAX_ATTEMPTS, interval: Self::DEFAULT_INTERVAL }
	}
}

/// Terminal result of tracking one asynchronous operation.
///
/// A timed-out poll is a value, not an error: the backend operation may still complete
/// after the budget runs out, so callers should report the ambiguity rather than claim
/// a definitive failure.
#[derive(Debug)]
pub enum PollOutcome {
	/// Operation completed successfully; `record` is `None` when the backend answered
	/// synchronously and no polling happened.
	Completed {
		/// Last fetched record, if any polling happened.
		record: Option<ActivityRecord>,
	},
	/// Operation reached a terminal failure state.
	Failed {
		/// The record that reported the failure.
		record: ActivityRecord,
	},
	/// The attempt budget ran out before a terminal state was observed.
	TimedOut {
		/// Last successfully fetched record, if any.
		last_record: Option<ActivityRecord>,
		/// Last fetch failure, if the final attempts could not reach the backend.
		last_error: Option<Error>,
	},
}
impl PollOutcome {
	/// Returns `true` for successful completion.
	pub fn is_completed(&self) -> bool {
		matches!(self, Self::Completed { .. })
	}

	/// Returns `true` for terminal failure.
	pub fn is_failed(&self) -> bool {
		matches!(self, Self::Failed { .. })
	}

	/// Returns `true` when the budget was exhausted without a terminal state.
	pub fn is_timed_out(&self) -> bool {
		matches!(self, Self::TimedOut { .. })
	}

	/// Returns the last-seen activity record, if any.
	pub fn last_record(&self) -> Option<&ActivityRecord> {
		match self {
			Self::Completed { record } => record.as_ref(),
			Self::Failed { record } => Some(record),
			Self::TimedOut { last_record, .. } => last_record.as_ref(),
		}
	}

	/// Renders a human-readable summary for protocol and route handlers.
	pub fn message(&self) -> String {
		match self {
			Self::Completed { record: None } => "Operation completed synchronously.".into(),
			Self::Completed { record: Some(_) } => "Operation completed successfully.".into(),
			Self::Failed { record } => match record.message.as_deref() {
				Some(detail) => format!("Operation failed: {detail}."),
				None => "Operation failed.".into(),
			},
			Self::TimedOut { last_error, .. } => match last_error {
				Some(err) => format!(
					"Activity status is unknown; the polling budget was exhausted ({err})."
				),
				None => "Activity status is unknown; the polling budget was exhausted.".into(),
			},
		}
	}
}

/// Fetches the current status of one asynchronous backend operation.
pub struct ActivityProber<T>
where
	T: ?Sized + ApiTransport,
{
	transport: Arc<T>,
	descriptor: BackendDescriptor,
}
impl<T> ActivityProber<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a prober for the provided transport and descriptor.
	pub fn new(transport: impl Into<Arc<T>>, descriptor: BackendDescriptor) -> Self {
		Self { transport: transport.into(), descriptor }
	}

	/// Fetches the activity record for a tracking identifier.
	///
	/// No retry happens here; a failed fetch is reported to the poll loop as one failed
	/// attempt, never as a final outcome.
	pub async fn fetch(
		&self,
		credential: &CredentialRecord,
		request_id: &str,
	) -> Result<ActivityRecord> {
		let url = self.descriptor.endpoint(&format!("/activities/{request_id}"))?;
		let request = ApiRequest::new(Method::Get, url).with_bearer(credential.token.clone());
		let response = self.transport.execute(request).await?;

		if !response.is_success() {
			return Err(ApiError::from_response(response.status, response.body_text()).into());
		}

		response.decode()
	}
}
impl<T> Clone for ActivityProber<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self { transport: self.transport.clone(), descriptor: self.descriptor.clone() }
	}
}

/// Bounded poll loop converting "operation accepted, tracking id X" into a terminal
/// [`PollOutcome`].
pub struct Poller<T>
where
	T: ?Sized + ApiTransport,
{
	prober: ActivityProber<T>,
	sleeper: Arc<dyn Sleeper>,
}
impl<T> Poller<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a poller around the provided prober and sleeper.
	pub fn new(prober: ActivityProber<T>, sleeper: Arc<dyn Sleeper>) -> Self {
		Self { prober, sleeper }
	}

	/// Tracks an operation whose tracking identifier may legitimately be absent.
	///
	/// A missing identifier means the backend completed the operation synchronously, so
	/// the loop short-circuits to success without a single fetch. Individual fetch
	/// failures are absorbed; only budget exhaustion surfaces them, embedded in the
	/// timeout outcome.
	pub async fn track(
		&self,
		credential: &CredentialRecord,
		request_id: Option<&str>,
		policy: StatusPolicy,
		settings: PollSettings,
	) -> PollOutcome {
		const KIND: OpKind = OpKind::ActivityPoll;

		let Some(request_id) = request_id else {
			return PollOutcome::Completed { record: None };
		};
		let span = OpSpan::new(KIND, "track");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let outcome = span
			.instrument(async move {
				let mut last_record = None;
				let mut last_error = None;

				for attempt in 1..=settings.max_attempts {
					match self.prober.fetch(credential, request_id).await {
						Ok(record) => match policy.evaluate(&record) {
							StatusDisposition::Success =>
								return PollOutcome::Completed { record: Some(record) },
							StatusDisposition::Failure =>
								return PollOutcome::Failed { record },
							StatusDisposition::InFlight => last_record = Some(record),
						},
						Err(err) => last_error = Some(err),
					}

					if attempt < settings.max_attempts {
						self.sleeper.sleep(settings.interval).await;
					}
				}

				PollOutcome::TimedOut { last_record, last_error }
			})
			.await;

		match &outcome {
			PollOutcome::Completed { .. } => obs::record_op_outcome(KIND, OpOutcome::Success),
			_ => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		outcome
	}

	/// Tracks an operation documented to always be asynchronous.
	///
	/// A missing tracking identifier here is a hard protocol error, never a silent
	/// success.
	pub async fn track_required(
		&self,
		credential: &CredentialRecord,
		request_id: Option<&str>,
		operation: &'static str,
		policy: StatusPolicy,
		settings: PollSettings,
	) -> Result<PollOutcome> {
		if request_id.is_none() {
			return Err(ProtocolError::MissingTrackingId { operation }.into());
		}

		Ok(self.track(credential, request_id, policy, settings).await)
	}
}
impl<T> Clone for Poller<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self { prober: self.prober.clone(), sleeper: self.sleeper.clone() }
	}
}
