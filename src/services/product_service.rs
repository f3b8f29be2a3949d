use std::sync::Arc;

use crate::error::AppResult;
use crate::models::dto::{PageDto, ProductDto};
use crate::repositories::{PageRequest, ProductFilter, ProductQuerySource};
use crate::utils::reorder;

pub struct ProductService {
    source: Arc<dyn ProductQuerySource>,
}

impl ProductService {
    pub fn new(source: Arc<dyn ProductQuerySource>) -> Self {
        Self { source }
    }

    /// Liste paginée en deux requêtes :
    ///   1. projection (ids dans le bon ordre) + total
    ///   2. produits complets avec catégories pour ces ids
    /// puis remise dans l'ordre de la projection
    pub async fn find_all_paged(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> AppResult<PageDto<ProductDto>> {
        let projection = self.source.fetch_ordered_projection(filter, page).await?;

        if projection.items.is_empty() {
            return Ok(PageDto::new(Vec::new(), projection.total_elements, page.page, page.size));
        }

        let ids: Vec<i64> = projection.items.iter().map(|p| p.id).collect();
        let unordered = self.source.fetch_full_by_ids(&ids).await?;
        let content = reorder::replace(&projection.items, unordered)?;

        Ok(PageDto::new(content, projection.total_elements, page.page, page.size))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::error::AppError;
    use crate::repositories::memory::MemoryProductSource;
    use crate::repositories::{ProductSort, SortField};

    fn page(page: u64, size: u64, field: SortField, descending: bool) -> PageRequest {
        PageRequest {
            page,
            size,
            sort: ProductSort { field, descending },
        }
    }

    fn ids(page: &PageDto<ProductDto>) -> Vec<i64> {
        page.content.iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn test_page_keeps_projection_order() {
        let service = ProductService::new(Arc::new(MemoryProductSource::new(catalog())));

        let result = service
            .find_all_paged(&ProductFilter::default(), &page(0, 3, SortField::Name, false))
            .await
            .unwrap();

        // Macbook Pro, PC Gamer, PC Gamer X (la source renvoie l'inverse)
        assert_eq!(ids(&result), vec![2, 3, 5]);
        assert_eq!(result.total_elements, 5);
        assert_eq!(result.total_pages, 2);
        assert_eq!(result.content[0].categories[0].id, 3);
    }

    #[tokio::test]
    async fn test_price_descending_second_page() {
        let service = ProductService::new(Arc::new(MemoryProductSource::new(catalog())));

        let result = service
            .find_all_paged(&ProductFilter::default(), &page(1, 2, SortField::Price, true))
            .await
            .unwrap();

        assert_eq!(ids(&result), vec![2, 3]);
        assert_eq!(result.number, 1);
    }

    #[tokio::test]
    async fn test_filters_by_name_and_category() {
        let service = ProductService::new(Arc::new(MemoryProductSource::new(catalog())));
        let filter = ProductFilter {
            category_ids: vec![3],
            name: "pc".to_string(),
        };

        let result = service
            .find_all_paged(&filter, &page(0, 12, SortField::Id, false))
            .await
            .unwrap();

        assert_eq!(ids(&result), vec![3, 5]);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let service = ProductService::new(Arc::new(MemoryProductSource::new(catalog())));

        let result = service
            .find_all_paged(&ProductFilter::default(), &page(9, 12, SortField::Name, false))
            .await
            .unwrap();

        assert!(result.content.is_empty());
        assert_eq!(result.total_elements, 5);
    }

    #[tokio::test]
    async fn test_missing_full_record_aborts() {
        let source = MemoryProductSource::new(catalog()).dropping(3);
        let service = ProductService::new(Arc::new(source));

        let result = service
            .find_all_paged(&ProductFilter::default(), &page(0, 12, SortField::Id, false))
            .await;

        assert!(matches!(result, Err(AppError::ContractViolation { .. })));
    }
}
