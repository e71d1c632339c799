//! `multipart/form-data` bodies for product and store uploads.

use quitq_core::{BrandId, CategoryId, CityId, StoreId, SubcategoryId, UserId};
use reqwest::multipart::{Form, Part};

use crate::api::ApiError;

/// An uploaded file forwarded to the backend unchanged.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    fn into_part(self) -> Result<Part, ApiError> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.content_type {
            Some(mime) => Ok(part.mime_str(&mime)?),
            None => Ok(part),
        }
    }
}

/// Fields of the seller product form.
#[derive(Debug, Clone)]
pub struct ProductUpload {
    pub product_name: String,
    /// Forwarded as typed, the backend parses it.
    pub price: String,
    pub quantity: String,
    pub category_id: CategoryId,
    pub sub_category_id: Option<SubcategoryId>,
    pub brand_id: BrandId,
    pub store_id: StoreId,
    pub image: Option<FileUpload>,
}

impl ProductUpload {
    /// Build the multipart body for `POST /api/products` or
    /// `PUT /api/products/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the image content type is not a valid MIME
    /// type.
    pub fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new()
            .text("productName", self.product_name)
            .text("price", self.price)
            .text("quantity", self.quantity)
            .text("categoryId", self.category_id.to_string())
            .text("brandId", self.brand_id.to_string())
            .text("storeId", self.store_id.to_string());
        if let Some(sub) = self.sub_category_id {
            form = form.text("subCategoryId", sub.to_string());
        }
        if let Some(image) = self.image {
            form = form.part("productImageFile", image.into_part()?);
        }
        Ok(form)
    }
}

/// Fields of the admin store form.
#[derive(Debug, Clone)]
pub struct StoreUpload {
    pub store_name: String,
    pub store_description: String,
    pub city_id: CityId,
    /// Owning seller.
    pub user_id: Option<UserId>,
    pub logo: Option<FileUpload>,
}

impl StoreUpload {
    /// Build the multipart body for `POST /api/stores`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the logo content type is not a valid MIME
    /// type.
    pub fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new()
            .text("storeName", self.store_name)
            .text("storeDescription", self.store_description)
            .text("cityId", self.city_id.to_string());
        if let Some(user_id) = self.user_id {
            form = form.text("userId", user_id.to_string());
        }
        if let Some(logo) = self.logo {
            form = form.part("storeLogoFile", logo.into_part()?);
        }
        Ok(form)
    }
}
