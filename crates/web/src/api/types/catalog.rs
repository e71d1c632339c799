//! Products, stores and the catalog taxonomy.

use quitq_core::{BrandId, CategoryId, CityId, GenderId, Price, ProductId, StoreId, SubcategoryId, UserId};
use serde::{Deserialize, Serialize};

/// A product listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub product_description: Option<String>,
    pub price: Option<Price>,
    pub quantity: Option<i32>,
    /// Path relative to the asset base URL (e.g. `/images/p1.png`).
    pub product_image: Option<String>,
    pub category_id: Option<CategoryId>,
    pub sub_category_id: Option<SubcategoryId>,
    pub brand_id: Option<BrandId>,
    pub store_id: Option<StoreId>,
    pub store_name: Option<String>,
}

impl Product {
    /// Display name, or a placeholder when the backend sent none.
    #[must_use]
    pub fn name(&self) -> &str {
        self.product_name.as_deref().unwrap_or("Unnamed product")
    }

    /// Whether any stock remains.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.quantity.is_some_and(|q| q > 0)
    }
}

/// A seller's store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub store_id: StoreId,
    pub store_name: Option<String>,
    pub store_description: Option<String>,
    pub city_id: Option<CityId>,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub sub_category_id: SubcategoryId,
    pub sub_category_name: Option<String>,
    pub category_id: Option<CategoryId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub brand_id: BrandId,
    pub brand_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gender {
    pub gender_id: GenderId,
    pub gender_name: Option<String>,
}

/// Body of `POST /api/products/filter`. Unset criteria are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<BrandId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Price>,
}

impl ProductFilter {
    /// Whether no criterion is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.brand_id.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }
}
