use tracing::debug;

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::{MovieCandidate, NewMovie, RankedMovie, ReviewForm},
    store::MovieStore,
    tmdb::TmdbClient,
};

/// The stored collection, ascending by rating, each record annotated with its
/// rank. The highest-rated record lands at rank 1.
pub async fn list_ranked(store: &MovieStore) -> AppResult<Vec<RankedMovie>> {
    let movies = store.all().await?;
    let count = movies.len();

    Ok(movies
        .into_iter()
        .enumerate()
        .map(|(index, movie)| RankedMovie::new(movie, (count - index) as u32))
        .collect())
}

pub async fn search(tmdb: &TmdbClient, query: &str) -> AppResult<Vec<MovieCandidate>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("movie title is required".to_string()));
    }

    let candidates = tmdb.search(query).await?;
    debug!(query = %query, candidates = candidates.len(), "searched catalog");
    Ok(candidates)
}

/// Fetch details for the chosen catalog entry and stage it unrated. The new
/// id is resolved by title, keeping the add flow a create-then-lookup pair.
pub async fn stage_from_selection(
    store: &MovieStore,
    tmdb: &TmdbClient,
    external_id: i32,
) -> AppResult<i32> {
    let details = tmdb.movie_details(external_id).await?;
    debug!(external_id, title = %details.title, "staging movie from catalog");

    store
        .create(NewMovie {
            title: details.title.clone(),
            year: details.year,
            description: details.description,
            rating: 0.0,
            review: String::new(),
            img_url: details.img_url,
        })
        .await?;

    Ok(store.by_title(&details.title).await?.id)
}

pub async fn current(store: &MovieStore, id: i32) -> AppResult<movie::Model> {
    store.by_id(id).await
}

pub async fn rate(store: &MovieStore, id: i32, form: ReviewForm) -> AppResult<()> {
    let rating: f64 = form.rating.trim().parse().map_err(|_| {
        AppError::Validation(format!("rating must be a number, got {:?}", form.rating))
    })?;

    store.update_review(id, rating, form.review).await
}

pub async fn remove(store: &MovieStore, id: i32) -> AppResult<()> {
    store.delete(id).await
}
