use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, JoinType, LikeExpr, Order};
use sea_orm::*;

use crate::error::AppResult;
use crate::models::dto::{ProductDto, ProductProjection};
use crate::models::{category, product, product_category};
use crate::repositories::{
    PageRequest, ProductFilter, ProductQuerySource, ProjectionPage, SortField,
};

pub struct SeaOrmProductRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Motif LIKE '%name%' : '%', '_' et '\' sont pris littéralement
fn contains_pattern(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 2);
    pattern.push('%');
    for c in name.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn sort_column(field: SortField) -> product::Column {
    match field {
        SortField::Id => product::Column::Id,
        SortField::Name => product::Column::Name,
        SortField::Price => product::Column::Price,
    }
}

#[async_trait]
impl ProductQuerySource for SeaOrmProductRepository {
    async fn fetch_ordered_projection(
        &self,
        filter: &ProductFilter,
        page: &PageRequest,
    ) -> AppResult<ProjectionPage> {
        // SELECT DISTINCT id, name, price : pas de jointure en éventail ici
        let mut query = product::Entity::find()
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Name)
            .column(product::Column::Price)
            .distinct();

        if !filter.name.is_empty() {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col((product::Entity, product::Column::Name))))
                    .like(LikeExpr::new(contains_pattern(&filter.name)).escape('\\')),
            );
        }

        if !filter.category_ids.is_empty() {
            query = query
                .join(JoinType::InnerJoin, product::Relation::ProductCategory.def())
                .filter(product_category::Column::CategoryId.is_in(filter.category_ids.iter().copied()));
        }

        let order = if page.sort.descending { Order::Desc } else { Order::Asc };
        query = query.order_by(sort_column(page.sort.field), order.clone());
        if page.sort.field != SortField::Id {
            // départage stable entre pages
            query = query.order_by(product::Column::Id, order);
        }

        let paginator = query
            .into_model::<ProductProjection>()
            .paginate(self.db.as_ref(), page.size);

        let total_elements = paginator.num_items().await?;
        let items = paginator.fetch_page(page.page).await?;

        Ok(ProjectionPage {
            items,
            total_elements,
        })
    }

    async fn fetch_full_by_ids(&self, ids: &[i64]) -> AppResult<Vec<ProductDto>> {
        // Chargement des catégories en une seule requête (JOIN)
        let rows = product::Entity::find()
            .filter(product::Column::Id.is_in(ids.iter().copied()))
            .find_with_related(category::Entity)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(product, categories)| ProductDto::from_entity(product, categories))
            .collect())
    }
}
