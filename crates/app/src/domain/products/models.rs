//! Product models.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hemline::pricing::final_unit_price;

/// Aggregate star rating shown with the product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average stars, 0 to 5.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub rate: Decimal,

    /// Number of ratings behind the average.
    #[serde(default)]
    pub count: u32,
}

/// One customer review on a product document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Reviewer's account id; deletion is restricted to it.
    pub uid: String,

    /// Display name shown with the review.
    #[serde(default)]
    pub name: String,

    /// Avatar URL, possibly empty.
    #[serde(default)]
    pub photo: String,

    /// Stars given, 1 to 5.
    pub rating: u8,

    /// Submission time; together with the uid this identifies the review.
    pub created_at: Timestamp,

    /// The review body.
    pub text: String,
}

/// A catalog entry.
///
/// `final_price` is denormalized from `original_price` and
/// `discount_percent` whenever the admin surface writes the document, so
/// listing and filtering never re-derive it. Reviews live inline on the
/// document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Display title.
    pub title: String,

    /// Long-form description.
    #[serde(default)]
    pub description: String,

    /// Catalog category used by browsing filters.
    #[serde(default)]
    pub category: String,

    /// Price before discount.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_price: Option<Decimal>,

    /// Percentage taken off the original price.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_percent: Option<Decimal>,

    /// Sellable price derived from the two fields above.
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,

    /// Image URLs, first one shown on cards and carried into cart lines.
    #[serde(default)]
    pub images: Vec<String>,

    /// Available sizes; empty for products without a size dimension.
    #[serde(default)]
    pub sizes: Vec<String>,

    /// Aggregate rating.
    #[serde(default)]
    pub rating: Rating,

    /// Customer reviews, oldest first.
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// First catalog image, used for cards and cart-line snapshots.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Fields the admin surface supplies when creating or replacing a catalog
/// entry. The sellable price is derived, never supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub category: String,
    pub original_price: Option<Decimal>,
    pub discount_percent: Option<Decimal>,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub rating: Rating,
}

impl NewProduct {
    /// Builds the catalog document, deriving the sellable price and starting
    /// with the given reviews (empty for a new entry).
    pub(crate) fn into_product(self, reviews: Vec<Review>) -> Product {
        let final_price = final_unit_price(self.original_price, self.discount_percent);

        Product {
            title: self.title,
            description: self.description,
            category: self.category,
            original_price: self.original_price,
            discount_percent: self.discount_percent,
            final_price,
            images: self.images,
            sizes: self.sizes,
            rating: self.rating,
            reviews,
        }
    }
}

/// A new review as submitted by a signed-in customer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    /// Display name; blank falls back to "Anonymous".
    pub name: String,

    /// Avatar URL, possibly empty.
    pub photo: String,

    /// Stars given, 1 to 5.
    pub rating: u8,

    /// The review body.
    pub text: String,
}

/// A catalog entry together with its document id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
    /// Document id.
    pub product_id: String,

    /// The entry itself.
    pub product: Product,
}
