pub mod health;
pub mod submit;

pub use health::{health_check, list_products, not_found};
pub use submit::submit_email;
