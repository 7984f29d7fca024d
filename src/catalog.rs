use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ProductConfig;

/// A marketed offer with an associated guide document and call-to-action URL.
#[derive(Debug, Clone)]
pub struct Product {
    pub name: String,
    pub ebook_filename: String,
    pub offer_url: String,
}

/// Slug + display name pair for the product listing endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub slug: String,
    pub name: String,
}

/// Static slug -> product mapping, loaded once at startup and read-only
/// thereafter.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: BTreeMap<String, Product>,
}

impl ProductCatalog {
    pub fn from_config(products: &[ProductConfig]) -> Self {
        let products = products
            .iter()
            .map(|p| {
                (
                    p.slug.clone(),
                    Product {
                        name: p.name.clone(),
                        ebook_filename: p.ebook_filename.clone(),
                        offer_url: p.offer_url.clone(),
                    },
                )
            })
            .collect();

        Self { products }
    }

    pub fn get(&self, slug: &str) -> Option<&Product> {
        self.products.get(slug)
    }

    pub fn slugs(&self) -> Vec<String> {
        self.products.keys().cloned().collect()
    }

    pub fn list(&self) -> Vec<ProductSummary> {
        self.products
            .iter()
            .map(|(slug, product)| ProductSummary {
                slug: slug.clone(),
                name: product.name.clone(),
            })
            .collect()
    }
}
