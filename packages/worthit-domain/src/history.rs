use serde::Serialize;

use crate::catalog::HistoryPoint;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriceStats {
	pub low_cents: i64,
	/// Mean price, rounded half away from zero.
	pub average_cents: i64,
	pub high_cents: i64,
}

pub fn price_stats(history: &[HistoryPoint]) -> Option<PriceStats> {
	let low_cents = history.iter().map(|point| point.price_cents).min()?;
	let high_cents = history.iter().map(|point| point.price_cents).max()?;
	let sum: i64 = history.iter().map(|point| point.price_cents).sum();
	let average_cents = (sum as f64 / history.len() as f64).round() as i64;

	Some(PriceStats { low_cents, average_cents, high_cents })
}

/// The `limit` cheapest points, cheapest first; equal prices keep chronological order.
pub fn lowest_points(history: &[HistoryPoint], limit: usize) -> Vec<HistoryPoint> {
	let mut sorted = history.to_vec();

	sorted.sort_by_key(|point| point.price_cents);
	sorted.truncate(limit);

	sorted
}
