use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait, sea_query::Expr,
};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::NewMovie,
    ranking,
};

pub const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Ascending by rating with unrated movies first; equal ratings fall back to id.
    pub async fn list_all(&self) -> AppResult<Vec<movie::Model>> {
        let movies = movie::Entity::find()
            .order_by_asc(movie::Column::Rating)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create(&self, new: NewMovie) -> AppResult<movie::Model> {
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(new.title.clone()),
            year: Set(new.year),
            description: Set(new.description.map(bounded_description)),
            rating: Set(None),
            ranking: Set(None),
            review: Set(None),
            img_url: Set(new.img_url),
        };

        match model.insert(&self.db).await {
            Ok(created) => Ok(created),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(AppError::DuplicateTitle(new.title))
                },
                _ => Err(err.into()),
            },
        }
    }

    /// Returns `false` when no movie has this id.
    pub async fn update(&self, id: i32, rating: f64, review: String) -> AppResult<bool> {
        let res = movie::Entity::update_many()
            .col_expr(movie::Column::Rating, Expr::value(rating))
            .col_expr(movie::Column::Review, Expr::value(review))
            .filter(movie::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }

    /// Returns `false` when no movie has this id.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    /// Writes `ranking` for every movie of an ascending listing in one transaction.
    pub async fn recompute_rankings(&self, movies: &[movie::Model]) -> AppResult<()> {
        let txn = self.db.begin().await?;

        for (id, rank) in ranking::assignments(movies) {
            movie::Entity::update_many()
                .col_expr(movie::Column::Ranking, Expr::value(rank))
                .filter(movie::Column::Id.eq(id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}

fn bounded_description(description: String) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_CHARS {
        description
    } else {
        description.chars().take(MAX_DESCRIPTION_CHARS).collect()
    }
}
