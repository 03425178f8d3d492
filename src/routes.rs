use std::sync::Arc;

use axum::{
    Json,
    extract::{Form, Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::{
    AppState, collection,
    entities::movie,
    error::{AppError, AppResult},
    models::{MovieCandidate, RankedMovie, ReviewForm, SearchForm},
};

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    id: Option<i32>,
}

pub async fn home(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<RankedMovie>>> {
    Ok(Json(collection::list_ranked(&state.store).await?))
}

pub async fn add_form() -> Json<Vec<MovieCandidate>> {
    // no search submitted yet, the client renders an empty picker
    Json(Vec::new())
}

pub async fn add_search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> AppResult<Json<Vec<MovieCandidate>>> {
    Ok(Json(collection::search(&state.tmdb, &form.title).await?))
}

pub async fn add_from_list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> AppResult<Redirect> {
    let external_id = query
        .id
        .ok_or_else(|| AppError::Validation("id query parameter is required".to_string()))?;

    let movie_id = collection::stage_from_selection(&state.store, &state.tmdb, external_id).await?;
    Ok(Redirect::to(&format!("/edit?id={movie_id}")))
}

pub async fn edit_view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> AppResult<Json<movie::Model>> {
    let id = query.id.ok_or_else(|| AppError::NotFound("no movie id given".to_string()))?;
    Ok(Json(collection::current(&state.store, id).await?))
}

pub async fn edit_submit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
    Form(form): Form<ReviewForm>,
) -> AppResult<Redirect> {
    let id = query.id.ok_or_else(|| AppError::NotFound("no movie id given".to_string()))?;
    collection::rate(&state.store, id, form).await?;
    Ok(Redirect::to("/"))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IdQuery>,
) -> AppResult<Redirect> {
    let id = query.id.ok_or_else(|| AppError::NotFound("no movie id given".to_string()))?;
    collection::remove(&state.store, id).await?;
    Ok(Redirect::to("/"))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;
    use tower::ServiceExt;

    use super::*;
    use crate::{models::NewMovie, store::MovieStore, tmdb::TmdbClient};

    async fn test_app() -> (Router, Arc<AppState>) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let tmdb = TmdbClient::new(
            reqwest::Client::new(),
            String::new(),
            "http://127.0.0.1:9".to_string(),
            "https://image.tmdb.org/t/p/original".to_string(),
        );

        let state = Arc::new(AppState { store: MovieStore::new(db), tmdb: Arc::new(tmdb) });
        (crate::router(state.clone()), state)
    }

    async fn seed(state: &AppState, title: &str, rating: f64) -> i32 {
        state
            .store
            .create(NewMovie {
                title: title.to_string(),
                year: 2021,
                description: "A movie.".to_string(),
                rating,
                review: String::new(),
                img_url: "https://image.tmdb.org/t/p/original/x.jpg".to_string(),
            })
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn home_returns_the_ranked_collection() {
        let (app, state) = test_app().await;
        seed(&state, "Alien", 3.0).await;
        seed(&state, "Dune", 9.0).await;

        let response =
            app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body[0]["title"], "Alien");
        assert_eq!(body[0]["ranking"], 2);
        assert_eq!(body[1]["title"], "Dune");
        assert_eq!(body[1]["ranking"], 1);
    }

    #[tokio::test]
    async fn add_form_returns_an_empty_candidate_list() {
        let (app, _state) = test_app().await;

        let response =
            app.oneshot(Request::builder().uri("/add").body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn add_search_rejects_a_blank_title() {
        let (app, _state) = test_app().await;

        let request = Request::builder()
            .method("POST")
            .uri("/add")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("title=++"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn edit_view_returns_the_current_record() {
        let (app, state) = test_app().await;
        let id = seed(&state, "Dune", 0.0).await;

        let request =
            Request::builder().uri(format!("/edit?id={id}")).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["title"], "Dune");
        assert_eq!(body["rating"], 0.0);
        assert_eq!(body["review"], "");
    }

    #[tokio::test]
    async fn edit_view_unknown_id_is_404() {
        let (app, _state) = test_app().await;

        let request = Request::builder().uri("/edit?id=42").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_submit_persists_and_redirects_home() {
        let (app, state) = test_app().await;
        let id = seed(&state, "Dune", 0.0).await;

        let request = Request::builder()
            .method("POST")
            .uri(format!("/edit?id={id}"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("rating=8.5&review=Sandy."))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let updated = state.store.by_id(id).await.unwrap();
        assert_eq!(updated.rating, 8.5);
        assert_eq!(updated.review, "Sandy.");
    }

    #[tokio::test]
    async fn edit_submit_rejects_a_non_numeric_rating() {
        let (app, state) = test_app().await;
        let id = seed(&state, "Dune", 5.5).await;

        let request = Request::builder()
            .method("POST")
            .uri(format!("/edit?id={id}"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("rating=seven&review=nope"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.store.by_id(id).await.unwrap().rating, 5.5);
    }

    #[tokio::test]
    async fn delete_redirects_home_and_removes_the_record() {
        let (app, state) = test_app().await;
        let id = seed(&state, "Dune", 0.0).await;

        let request =
            Request::builder().uri(format!("/delete?id={id}")).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let request = Request::builder().uri(format!("/delete?id={id}")).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
