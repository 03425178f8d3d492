use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::NewMovie,
};

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewMovie) -> AppResult<i32> {
        if new.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }

        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(new.title.clone()),
            year: Set(new.year),
            description: Set(new.description),
            rating: Set(new.rating),
            review: Set(new.review),
            img_url: Set(new.img_url),
        };

        match movie::Entity::insert(model).exec(&self.db).await {
            Ok(inserted) => Ok(inserted.last_insert_id),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(AppError::DuplicateTitle(new.title))
                },
                _ => Err(err.into()),
            },
        }
    }

    /// Full collection, ascending by rating with ties in insertion order.
    pub async fn all(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .order_by_asc(movie::Column::Rating)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn by_id(&self, id: i32) -> AppResult<movie::Model> {
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no movie with id {id}")))
    }

    pub async fn by_title(&self, title: &str) -> AppResult<movie::Model> {
        movie::Entity::find()
            .filter(movie::Column::Title.eq(title))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no movie titled {title:?}")))
    }

    pub async fn update_review(&self, id: i32, rating: f64, review: String) -> AppResult<()> {
        let mut model = self.by_id(id).await?.into_active_model();
        model.rating = Set(rating);
        model.review = Set(review);
        model.update(&self.db).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("no movie with id {id}")));
        }
        Ok(())
    }
}
