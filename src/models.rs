use serde::{Deserialize, Serialize};

use crate::entities::movie;

/// One search hit from the catalog, passed through for the user to pick from.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MovieCandidate {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Catalog details normalized into the store's input shape.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieDetails {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub img_url: String,
}

#[derive(Clone, Debug)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub description: String,
    pub rating: f64,
    pub review: String,
    pub img_url: String,
}

/// A stored movie annotated with its display rank, 1 = highest rated.
#[derive(Clone, Debug, Serialize)]
pub struct RankedMovie {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub description: String,
    pub rating: f64,
    pub ranking: u32,
    pub review: String,
    pub img_url: String,
}

impl RankedMovie {
    pub fn new(movie: movie::Model, ranking: u32) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            year: movie.year,
            description: movie.description,
            rating: movie.rating,
            ranking,
            review: movie.review,
            img_url: movie.img_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub rating: String,
    pub review: String,
}
