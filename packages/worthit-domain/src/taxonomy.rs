//! Static per-vertical taxonomy registry.
//!
//! Exactly one descriptor exists per vertical key. Historical duplicates (`pharma` and
//! `pharmaceuticals`) are collapsed onto the `pharmaceuticals` entry; `pharma` is accepted as an
//! alias when parsing.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Vertical {
	#[default]
	Tech,
	HomeAppliances,
	Pharmaceuticals,
	Supplements,
	Beauty,
	PetGoods,
}
impl Vertical {
	pub const ALL: [Self; 6] = [
		Self::Tech,
		Self::HomeAppliances,
		Self::Pharmaceuticals,
		Self::Supplements,
		Self::Beauty,
		Self::PetGoods,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Tech => "tech",
			Self::HomeAppliances => "home-appliances",
			Self::Pharmaceuticals => "pharmaceuticals",
			Self::Supplements => "supplements",
			Self::Beauty => "beauty",
			Self::PetGoods => "pet-goods",
		}
	}

	/// Parses a vertical key. Unknown keys yield `None`; callers pick the fallback.
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"tech" => Some(Self::Tech),
			"home-appliances" => Some(Self::HomeAppliances),
			"pharmaceuticals" | "pharma" => Some(Self::Pharmaceuticals),
			"supplements" => Some(Self::Supplements),
			"beauty" => Some(Self::Beauty),
			"pet-goods" => Some(Self::PetGoods),
			_ => None,
		}
	}

	/// Parses a vertical key, falling back to the default vertical.
	pub fn parse_or_default(raw: &str) -> Self {
		Self::parse(raw).unwrap_or_default()
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Tech => "Technology",
			Self::HomeAppliances => "Home & Appliances",
			Self::Pharmaceuticals => "Pharmaceuticals",
			Self::Supplements => "Supplements",
			Self::Beauty => "Beauty",
			Self::PetGoods => "Pet Goods",
		}
	}

	pub fn taxonomy(self) -> &'static VerticalTaxonomy {
		taxonomy(self)
	}
}
impl fmt::Display for Vertical {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl Serialize for Vertical {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(self.as_str())
	}
}
impl<'de> Deserialize<'de> for Vertical {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Ok(Self::parse_or_default(&raw))
	}
}

#[derive(Debug)]
pub struct VerticalTaxonomy {
	pub vertical: Vertical,
	pub categories: &'static [&'static str],
	pub retailers: &'static [&'static str],
	pub value_score_categories: &'static [&'static str],
}
impl VerticalTaxonomy {
	pub fn has_category(&self, category: &str) -> bool {
		self.categories.contains(&category)
	}

	pub fn has_retailer(&self, retailer: &str) -> bool {
		self.retailers.contains(&retailer)
	}

	pub fn supports_value_scoring(&self) -> bool {
		!self.value_score_categories.is_empty()
	}
}

static TECH: VerticalTaxonomy = VerticalTaxonomy {
	vertical: Vertical::Tech,
	categories: &["laptops", "phones", "monitors"],
	retailers: &["pb-tech", "jb-hi-fi", "noel-leeming", "harvey-norman", "apple"],
	value_score_categories: &["laptops", "phones", "monitors"],
};

static HOME_APPLIANCES: VerticalTaxonomy = VerticalTaxonomy {
	vertical: Vertical::HomeAppliances,
	categories: &["fridges", "washing-machines", "dishwashers", "appliances"],
	retailers: &[
		"noel-leeming",
		"harvey-norman",
		"farmers",
		"heathcotes",
		"mighty-ape",
		"the-warehouse",
	],
	value_score_categories: &["fridges", "washing-machines", "dishwashers"],
};

static PHARMACEUTICALS: VerticalTaxonomy = VerticalTaxonomy {
	vertical: Vertical::Pharmaceuticals,
	categories: &["otc", "supplements"],
	retailers: &[
		"chemist-warehouse",
		"bargain-chemist",
		"life-pharmacy",
		"mighty-ape",
		"the-warehouse",
	],
	value_score_categories: &[],
};

static SUPPLEMENTS: VerticalTaxonomy = VerticalTaxonomy {
	vertical: Vertical::Supplements,
	categories: &["protein", "pre-workout", "vitamins", "other"],
	retailers: &["supplements-co-nz", "chemist-warehouse", "bargain-chemist", "mighty-ape"],
	value_score_categories: &["protein"],
};

static BEAUTY: VerticalTaxonomy = VerticalTaxonomy {
	vertical: Vertical::Beauty,
	categories: &["skincare", "makeup"],
	retailers: &["mecca", "sephora", "farmers", "mighty-ape", "the-warehouse"],
	value_score_categories: &[],
};

static PET_GOODS: VerticalTaxonomy = VerticalTaxonomy {
	vertical: Vertical::PetGoods,
	categories: &["pet-food", "treats", "flea-tick", "grooming", "toys", "bedding", "pet-supplies"],
	retailers: &["animates", "petdirect", "pet-co-nz"],
	value_score_categories: &[],
};

pub fn taxonomy(vertical: Vertical) -> &'static VerticalTaxonomy {
	match vertical {
		Vertical::Tech => &TECH,
		Vertical::HomeAppliances => &HOME_APPLIANCES,
		Vertical::Pharmaceuticals => &PHARMACEUTICALS,
		Vertical::Supplements => &SUPPLEMENTS,
		Vertical::Beauty => &BEAUTY,
		Vertical::PetGoods => &PET_GOODS,
	}
}

/// Whether a "best value" sort is meaningful.
///
/// With a category selected the category itself must be value-scored; with no category the
/// vertical must value-score at least one of its categories. Categories match the way the scorer
/// keys them: trimmed and case-insensitive.
pub fn supports_value_sort(vertical: Vertical, category: &str) -> bool {
	let taxonomy = taxonomy(vertical);
	let category = category.trim().to_ascii_lowercase();

	if category.is_empty() {
		return taxonomy.supports_value_scoring();
	}

	taxonomy.value_score_categories.contains(&category.as_str())
}

/// Finds the vertical that owns a category id.
pub fn vertical_for_category(category: &str) -> Option<Vertical> {
	let category = category.trim().to_ascii_lowercase();

	Vertical::ALL.into_iter().find(|vertical| taxonomy(*vertical).has_category(&category))
}
