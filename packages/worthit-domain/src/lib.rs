pub mod attributes;
pub mod catalog;
pub mod filters;
pub mod history;
pub mod normalize;
pub mod ranking;
pub mod scoring;
pub mod taxonomy;

pub use attributes::{AttributeValue, Attributes};
pub use catalog::{
	ComparePrice, CurrentPrice, HistoryPoint, LookupProduct, LookupResponse, MetaResponse, Offer,
	ProductDetail, ProductListItem, ProductsResponse, RetailerRef, StoreInfo,
};
pub use filters::{FiltersPatch, ProductFilters, Sort};
pub use scoring::{ValueScoreInput, compute_value_score};
pub use taxonomy::{Vertical, VerticalTaxonomy, supports_value_sort};
