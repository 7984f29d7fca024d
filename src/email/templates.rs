use std::path::PathBuf;
use tracing::warn;

use crate::catalog::Product;

/// Per-product email template resolution.
///
/// Templates live at `<templates_dir>/<slug>/email.html` and are read from
/// disk on every request so operators can edit them without a restart. When
/// no template exists the built-in default is used; that path only touches
/// in-memory data and cannot fail.
pub struct TemplateResolver {
    templates_dir: PathBuf,
}

impl TemplateResolver {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// Render the guide email body for one submission. Placeholders
    /// {{NAME}}, {{PRODUCT_NAME}} and {{OFFER_URL}} are replaced with
    /// literal values; templates are trusted operator input.
    pub async fn resolve(&self, product_slug: &str, product: &Product, name: &str) -> String {
        let template_path = self.templates_dir.join(product_slug).join("email.html");

        match tokio::fs::read_to_string(&template_path).await {
            Ok(template) => template
                .replace("{{NAME}}", name)
                .replace("{{PRODUCT_NAME}}", &product.name)
                .replace("{{OFFER_URL}}", &product.offer_url),
            Err(_) => {
                warn!(
                    "Custom template not found for {}, using default",
                    product_slug
                );
                Self::default_template(product, name)
            }
        }
    }

    /// Built-in fallback template
    fn default_template(product: &Product, name: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
    <h1 style="color: #6a1b9a;">Hi {name}!</h1>
    <p>Thank you for your interest in <strong>{product_name}</strong>!</p>
    <p>Your free guide is attached to this email.</p>
    <div style="text-align: center; margin: 30px 0;">
      <a href="{offer_url}" style="background: #6a1b9a; color: white; padding: 15px 30px; text-decoration: none; border-radius: 5px; display: inline-block;">
        Claim Your Exclusive Offer
      </a>
    </div>
    <p>To your success,<br><strong>The {product_name} Team</strong></p>
  </div>
</body>
</html>
"#,
            product_name = product.name,
            offer_url = product.offer_url,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product {
            name: "Mitolyn".to_string(),
            ebook_filename: "mitolyn-guide.pdf".to_string(),
            offer_url: "https://mitolyn.com/welcome/".to_string(),
        }
    }

    #[tokio::test]
    async fn fallback_contains_name_and_offer_url() {
        let tmp = tempfile::tempdir().unwrap();
        let resolver = TemplateResolver::new(tmp.path());

        let html = resolver.resolve("mitolyn", &product(), "Jane").await;

        assert!(html.contains("Hi Jane!"));
        assert!(html.contains("Mitolyn"));
        assert!(html.contains("https://mitolyn.com/welcome/"));
    }

    #[tokio::test]
    async fn custom_template_placeholders_are_substituted() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("mitolyn");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("email.html"),
            "<p>{{NAME}} / {{PRODUCT_NAME}} / {{OFFER_URL}} / {{NAME}}</p>",
        )
        .await
        .unwrap();
        let resolver = TemplateResolver::new(tmp.path());

        let html = resolver.resolve("mitolyn", &product(), "Jane").await;

        assert_eq!(
            html,
            "<p>Jane / Mitolyn / https://mitolyn.com/welcome/ / Jane</p>"
        );
    }

    #[tokio::test]
    async fn template_is_read_on_every_request() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("mitolyn");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let template_file = dir.join("email.html");
        tokio::fs::write(&template_file, "first {{NAME}}").await.unwrap();
        let resolver = TemplateResolver::new(tmp.path());

        assert_eq!(resolver.resolve("mitolyn", &product(), "Jane").await, "first Jane");

        tokio::fs::write(&template_file, "second {{NAME}}").await.unwrap();
        assert_eq!(resolver.resolve("mitolyn", &product(), "Jane").await, "second Jane");
    }
}
