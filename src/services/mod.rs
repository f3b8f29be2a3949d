pub mod auth_service;
pub mod notifier;
pub mod product_service;
