use serde::Deserialize;

/// Fields captured from the metadata service when a movie is added.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub img_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddRequest {
    #[serde(default)]
    pub movie_title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub new_rating: String,
    #[serde(default)]
    pub new_review: String,
}

/// `?id=` as sent by the browser; blank and missing are treated alike.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    pub fn raw(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn local_id(&self) -> Option<i32> {
        self.raw()?.parse().ok()
    }
}

/// Parses a user-entered rating; any finite decimal is accepted.
pub fn parse_rating(raw: &str) -> Result<f64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Enter a rating, e.g. 7.5");
    }
    let rating: f64 = raw.parse().map_err(|_| "Rating must be a number, e.g. 7.5")?;
    if !rating.is_finite() {
        return Err("Rating must be a number, e.g. 7.5");
    }
    Ok(rating)
}
