//pour les requêtes et réponses structurées
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{category, product};
use crate::utils::reorder::Keyed;

// Body de POST /auth/recover-token
#[derive(Debug, Deserialize, Validate)]
pub struct EmailDto {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

// Body de PUT /auth/new-password
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordDto {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    #[validate(length(min = 8, message = "Password must have at least 8 characters"))]
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
}

impl From<category::Model> for CategoryDto {
    fn from(category: category::Model) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub img_url: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub categories: Vec<CategoryDto>,
}

impl ProductDto {
    pub fn from_entity(product: product::Model, categories: Vec<category::Model>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            img_url: product.img_url,
            date: product.date,
            categories: categories.into_iter().map(CategoryDto::from).collect(),
        }
    }
}

impl Keyed for ProductDto {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

// Résultat de la requête légère (id + colonnes de tri seulement)
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ProductProjection {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

impl Keyed for ProductProjection {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

// Page au format Spring (content + métadonnées)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u64,
    pub size: u64,
}

impl<T> PageDto<T> {
    pub fn new(content: Vec<T>, total_elements: u64, number: u64, size: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            total_elements.div_ceil(size)
        };

        Self {
            content,
            total_elements,
            total_pages,
            number,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_password_dto_uses_camel_case() {
        let dto: NewPasswordDto =
            serde_json::from_str(r#"{"token":"abc","newPassword":"12345678"}"#).unwrap();
        assert_eq!(dto.token, "abc");
        assert_eq!(dto.new_password, "12345678");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_new_password_dto_rejects_short_password() {
        let dto = NewPasswordDto {
            token: "abc".to_string(),
            new_password: "1234".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password"));
    }

    #[test]
    fn test_email_dto_rejects_invalid_email() {
        let dto = EmailDto { email: "not-an-email".to_string() };
        assert!(dto.validate().is_err());

        let dto = EmailDto { email: "maria@gmail.com".to_string() };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_page_dto_rounds_total_pages_up() {
        let page = PageDto::new(vec![1, 2], 25, 2, 12);
        assert_eq!(page.total_pages, 3);

        let empty: PageDto<i32> = PageDto::new(vec![], 0, 0, 12);
        assert_eq!(empty.total_pages, 0);
    }
}
