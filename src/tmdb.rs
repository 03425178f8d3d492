use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{MovieCandidate, MovieDetails},
};

pub struct TmdbClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    image_base_url: String,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        access_token: String,
        base_url: String,
        image_base_url: String,
    ) -> Self {
        // Warn once on app load, requests will still go out and fail upstream
        if access_token.trim().is_empty() {
            tracing::warn!("no TMDB_ACCESS_TOKEN provided, catalog requests will be rejected");
        }
        Self { client, access_token, base_url, image_base_url }
    }

    pub async fn search(&self, query: &str) -> AppResult<Vec<MovieCandidate>> {
        let url = format!("{}/search/movie", self.base_url.trim_end_matches('/'));

        let resp: SearchResponse = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("query", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp.results)
    }

    pub async fn movie_details(&self, external_id: i32) -> AppResult<MovieDetails> {
        let url = format!("{}/movie/{}", self.base_url.trim_end_matches('/'), external_id);

        let resp: DetailsResponse = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        normalize(resp, &self.image_base_url)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<MovieCandidate>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    poster_path: Option<String>,
}

fn normalize(resp: DetailsResponse, image_base_url: &str) -> AppResult<MovieDetails> {
    let year = release_year(resp.release_date.as_deref().unwrap_or(""))?;

    let poster_path = resp
        .poster_path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Parse(format!("movie {:?} has no poster path", resp.title)))?;

    Ok(MovieDetails {
        title: resp.title,
        year,
        description: resp.overview.unwrap_or_default(),
        img_url: format!("{}{}", image_base_url.trim_end_matches('/'), poster_path),
    })
}

// "2021-10-20" keeps the prefix before the first dash, "2021" is already bare
fn release_year(date: &str) -> AppResult<i32> {
    date.split('-')
        .next()
        .unwrap_or_default()
        .parse()
        .map_err(|_| AppError::Parse(format!("release date {date:?}")))
}
