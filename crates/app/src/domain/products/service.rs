//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;
use uuid::Uuid;

use crate::{
    auth::AuthContext,
    domain::products::{
        errors::ProductsServiceError,
        models::{NewProduct, NewReview, Product, Review, StoredProduct},
    },
    store::ProductStore,
};

fn require_admin(auth: &AuthContext) -> Result<(), ProductsServiceError> {
    if auth.is_admin {
        Ok(())
    } else {
        Err(ProductsServiceError::Forbidden)
    }
}

#[derive(Clone)]
pub struct StoreProductsService {
    products: Arc<dyn ProductStore>,
}

impl StoreProductsService {
    #[must_use]
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    async fn require_product(&self, product_id: &str) -> Result<Product, ProductsServiceError> {
        self.products
            .get_product(product_id)
            .await?
            .ok_or(ProductsServiceError::NotFound)
    }
}

#[async_trait]
impl ProductsService for StoreProductsService {
    async fn list_products(&self) -> Result<Vec<StoredProduct>, ProductsServiceError> {
        Ok(self.products.list_products().await?)
    }

    async fn get_product(&self, product_id: &str) -> Result<Product, ProductsServiceError> {
        self.require_product(product_id).await
    }

    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, auth, product),
        fields(user_id = %auth.user_id),
        err
    )]
    async fn create_product(
        &self,
        auth: &AuthContext,
        product: NewProduct,
    ) -> Result<StoredProduct, ProductsServiceError> {
        require_admin(auth)?;

        let product_id = Uuid::now_v7().to_string();
        let product = product.into_product(Vec::new());

        self.products.put_product(&product_id, &product).await?;

        info!(%product_id, "created product");

        Ok(StoredProduct {
            product_id,
            product,
        })
    }

    #[tracing::instrument(
        name = "products.service.update_product",
        skip(self, auth, update),
        fields(user_id = %auth.user_id),
        err
    )]
    async fn update_product(
        &self,
        auth: &AuthContext,
        product_id: &str,
        update: NewProduct,
    ) -> Result<Product, ProductsServiceError> {
        require_admin(auth)?;

        // Reviews belong to customers, not the admin form; carry them over.
        let existing = self.require_product(product_id).await?;
        let updated = update.into_product(existing.reviews);

        self.products.put_product(product_id, &updated).await?;

        Ok(updated)
    }

    async fn delete_product(
        &self,
        auth: &AuthContext,
        product_id: &str,
    ) -> Result<(), ProductsServiceError> {
        require_admin(auth)?;

        self.require_product(product_id).await?;
        self.products.delete_product(product_id).await?;

        info!(product_id, "deleted product");

        Ok(())
    }

    async fn add_review(
        &self,
        auth: &AuthContext,
        product_id: &str,
        review: NewReview,
    ) -> Result<Review, ProductsServiceError> {
        if review.text.trim().is_empty() {
            return Err(ProductsServiceError::EmptyReview);
        }

        if !(1..=5).contains(&review.rating) {
            return Err(ProductsServiceError::InvalidRating);
        }

        let mut product = self.require_product(product_id).await?;

        let name = if review.name.trim().is_empty() {
            "Anonymous".to_string()
        } else {
            review.name
        };

        let review = Review {
            uid: auth.user_id.clone(),
            name,
            photo: review.photo,
            rating: review.rating,
            created_at: Timestamp::now(),
            text: review.text,
        };

        product.reviews.push(review.clone());

        self.products.put_product(product_id, &product).await?;

        Ok(review)
    }

    async fn delete_review(
        &self,
        auth: &AuthContext,
        product_id: &str,
        created_at: Timestamp,
    ) -> Result<(), ProductsServiceError> {
        let mut product = self.require_product(product_id).await?;

        // A review is identified by (created_at, uid); only the author's own
        // entry goes away.
        product
            .reviews
            .retain(|review| review.created_at != created_at || review.uid != auth.user_id);

        self.products.put_product(product_id, &product).await?;

        Ok(())
    }
}

/// Catalog reads for everyone, catalog writes for admins, review capture for
/// signed-in customers.
#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// The whole catalog.
    async fn list_products(&self) -> Result<Vec<StoredProduct>, ProductsServiceError>;

    /// Retrieves one catalog entry.
    async fn get_product(&self, product_id: &str) -> Result<Product, ProductsServiceError>;

    /// Creates a catalog entry under a fresh id, deriving its sellable
    /// price. Admin only.
    async fn create_product(
        &self,
        auth: &AuthContext,
        product: NewProduct,
    ) -> Result<StoredProduct, ProductsServiceError>;

    /// Replaces a catalog entry's admin-owned fields, re-deriving the
    /// sellable price and preserving customer reviews. Admin only.
    async fn update_product(
        &self,
        auth: &AuthContext,
        product_id: &str,
        update: NewProduct,
    ) -> Result<Product, ProductsServiceError>;

    /// Removes a catalog entry. Admin only.
    async fn delete_product(
        &self,
        auth: &AuthContext,
        product_id: &str,
    ) -> Result<(), ProductsServiceError>;

    /// Appends a review to a product. Requires a signed-in caller; text must
    /// be non-blank and the rating between 1 and 5.
    async fn add_review(
        &self,
        auth: &AuthContext,
        product_id: &str,
        review: NewReview,
    ) -> Result<Review, ProductsServiceError>;

    /// Removes the caller's own review identified by its creation time.
    async fn delete_review(
        &self,
        auth: &AuthContext,
        product_id: &str,
        created_at: Timestamp,
    ) -> Result<(), ProductsServiceError>;
}
