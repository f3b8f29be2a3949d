use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::repositories::{PageRequest, ProductFilter, ProductSort, SortField};
use crate::services::product_service::ProductService;

const DEFAULT_PAGE_SIZE: u64 = 12;
const MAX_PAGE_SIZE: u64 = 100;

// Paramètres de GET /products?categoryId=1,3&name=pc&page=0&size=12&sort=name,asc
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category_id: Option<String>,
    pub name: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort: Option<String>,
}

impl ProductQuery {
    pub fn into_request(self) -> AppResult<(ProductFilter, PageRequest)> {
        let category_ids = match self.category_id.as_deref() {
            Some(raw) => parse_category_ids(raw)?,
            None => Vec::new(),
        };

        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(AppError::BadRequest(format!(
                "size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        // OFFSET = page * size doit tenir dans un BIGINT
        let page = self.page.unwrap_or(0);
        if page
            .checked_mul(size)
            .is_none_or(|offset| offset > i64::MAX as u64)
        {
            return Err(AppError::BadRequest(format!("page out of range: {}", page)));
        }

        let sort = match self.sort.as_deref() {
            Some(raw) => parse_sort(raw)?,
            None => ProductSort::default(),
        };

        Ok((
            ProductFilter {
                category_ids,
                name: self.name.unwrap_or_default().trim().to_string(),
            },
            PageRequest {
                page,
                size,
                sort,
            },
        ))
    }
}

/// "1,3" → [1, 3] ; "" ou "0" → aucune catégorie (= toutes)
fn parse_category_ids(raw: &str) -> AppResult<Vec<i64>> {
    let mut ids = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id: i64 = part
            .parse()
            .map_err(|_| AppError::BadRequest(format!("Invalid categoryId: {}", part)))?;
        if id != 0 && !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// "name" | "price,desc" | "id,asc"
fn parse_sort(raw: &str) -> AppResult<ProductSort> {
    let mut parts = raw.split(',').map(str::trim);

    let field = match parts.next().unwrap_or_default() {
        "id" => SortField::Id,
        "name" => SortField::Name,
        "price" => SortField::Price,
        other => return Err(AppError::BadRequest(format!("Invalid sort field: {}", other))),
    };

    let descending = match parts.next().map(|d| d.to_ascii_lowercase()).as_deref() {
        None | Some("asc") => false,
        Some("desc") => true,
        Some(other) => {
            return Err(AppError::BadRequest(format!("Invalid sort direction: {}", other)));
        }
    };

    Ok(ProductSort { field, descending })
}

/// GET /products - Catalogue paginé (PUBLIC)
#[get("")]
pub async fn find_all_paged(
    query: web::Query<ProductQuery>,
    products: web::Data<ProductService>,
) -> Result<HttpResponse, AppError> {
    let (filter, page) = query.into_inner().into_request()?;

    let result = products.find_all_paged(&filter, &page).await?;

    Ok(HttpResponse::Ok().json(result))
}

pub fn products_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .service(find_all_paged)
    );
}
