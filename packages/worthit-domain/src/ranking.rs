//! Client-side ordering of the page of items returned by the catalog.

use std::cmp::Ordering;

use crate::{catalog::ProductListItem, filters::Sort};

/// Fills absent value scores from raw attributes, then orders the page by `sort`.
///
/// The sort is stable, so ties and `relevance` keep the server order. Items that cannot be
/// ranked on the active key (unscored, no offer, no discount) go last.
pub fn rank_page(items: &mut [ProductListItem], sort: Sort) {
	for item in items.iter_mut() {
		if item.value_score.is_none() {
			item.value_score = item.computed_value_score();
		}
	}

	match sort {
		Sort::ValueDesc => items.sort_by(|left, right| desc(left.value_score, right.value_score)),
		Sort::PriceAsc =>
			items.sort_by(|left, right| asc(left.effective_price(), right.effective_price())),
		Sort::PriceDesc =>
			items.sort_by(|left, right| desc(left.effective_price(), right.effective_price())),
		Sort::DiscountDesc =>
			items.sort_by(|left, right| desc(discount(left), discount(right))),
		Sort::Relevance => {},
	}
}

fn discount(item: &ProductListItem) -> Option<f64> {
	item.best_offer.as_ref().and_then(|offer| offer.discount_pct)
}

fn asc(left: Option<f64>, right: Option<f64>) -> Ordering {
	match (left, right) {
		(Some(left), Some(right)) => left.total_cmp(&right),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

fn desc(left: Option<f64>, right: Option<f64>) -> Ordering {
	match (left, right) {
		(Some(left), Some(right)) => right.total_cmp(&left),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}
