// self
use crate::obs::{AuthFlow, AuthOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_auth_outcome(flow: AuthFlow, outcome: AuthOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"session_gate_auth_total",
			"flow" => flow.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (flow, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_auth_outcome_noop_without_metrics() {
		record_auth_outcome(AuthFlow::Login, AuthOutcome::Failure);
	}
}
