use serde::Serialize;

use pronto_storage::{calls, leads};

use crate::{LeadService, ServiceResult};

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
	pub total_calls: i64,
	pub completed_calls: i64,
	/// Completed over total, 0.0 when no calls exist.
	pub completion_rate: f64,
	/// Mean duration of completed calls in seconds, 0.0 when none completed.
	pub average_duration_secs: f64,
	pub leads_by_quality: LeadQualityCounts,
}

#[derive(Debug, Default, Serialize)]
pub struct LeadQualityCounts {
	pub hot: i64,
	pub warm: i64,
	pub cold: i64,
	pub unqualified: i64,
}

impl LeadService {
	pub async fn analytics_summary(&self) -> ServiceResult<AnalyticsSummary> {
		let (total_calls, completed_calls, average_duration) =
			calls::completion_stats(&self.db).await?;
		let completion_rate =
			if total_calls == 0 { 0.0 } else { completed_calls as f64 / total_calls as f64 };
		let mut leads_by_quality = LeadQualityCounts::default();

		for (quality, count) in leads::quality_breakdown(&self.db).await? {
			match quality.as_str() {
				"HOT" => leads_by_quality.hot = count,
				"WARM" => leads_by_quality.warm = count,
				"COLD" => leads_by_quality.cold = count,
				"UNQUALIFIED" => leads_by_quality.unqualified = count,
				other => {
					tracing::warn!(quality = other, "Skipping unexpected lead quality bucket.");
				},
			}
		}

		Ok(AnalyticsSummary {
			total_calls,
			completed_calls,
			completion_rate,
			average_duration_secs: average_duration.unwrap_or(0.0),
			leads_by_quality,
		})
	}
}
