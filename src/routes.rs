use std::sync::Arc;

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

use crate::{
    AppState,
    error::{AppError, AppResult},
    flash,
    models::{AddRequest, EditRequest, IdQuery, parse_rating},
    ranking, templates,
};

const MISSING_MOVIE_NOTICE: &str = "That movie is not in your collection any more.";

pub async fn list(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    let movies = state.store.list_all().await?;
    if state.config.persist_rankings {
        state.store.recompute_rankings(&movies).await?;
    }
    debug!(count = movies.len(), "listing collection");

    let ranked = ranking::rank(movies);
    let (jar, notice) = flash::take(jar);
    Ok((jar, Html(templates::catalog_page(&ranked, notice.as_deref()))).into_response())
}

pub async fn add_form(jar: CookieJar) -> Response {
    let (jar, notice) = flash::take(jar);
    (jar, Html(templates::add_page("", None, notice.as_deref()))).into_response()
}

pub async fn add_search(
    State(state): State<Arc<AppState>>,
    Form(req): Form<AddRequest>,
) -> AppResult<Response> {
    let title = req.movie_title.trim();

    if title.is_empty() {
        let body = templates::add_page("", Some("Enter a movie title to search for."), None);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
    }

    let candidates = state.tmdb.search_by_title(title).await?;
    Ok(Html(templates::select_page(title, &candidates)).into_response())
}

pub async fn find(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(q): Query<IdQuery>,
) -> AppResult<Response> {
    let Some(raw) = q.raw() else {
        let jar = flash::set(jar, "Search for a title, then pick a movie from the results.");
        return Ok((jar, Redirect::to("/add")).into_response());
    };

    let external_id: i64 = raw
        .parse()
        .map_err(|_| AppError::Validation(format!("\"{raw}\" is not a valid movie id.")))?;

    let details = state
        .tmdb
        .fetch_details_by_id(external_id)
        .await
        .map_err(|source| AppError::MetadataAt {
            source,
            retry: format!("/find?id={external_id}"),
        })?;
    let created = state.store.create(details.into()).await?;
    info!(id = created.id, external_id = external_id, title = %created.title, "movie added");

    Ok(Redirect::to(&format!("/edit?id={}", created.id)).into_response())
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(q): Query<IdQuery>,
) -> AppResult<Response> {
    let Some(id) = q.local_id() else {
        return Ok(missing_movie(jar));
    };
    let Some(movie) = state.store.get_by_id(id).await? else {
        return Ok(missing_movie(jar));
    };

    let rating = movie.rating.map(|r| r.to_string()).unwrap_or_default();
    let review = movie.review.clone().unwrap_or_default();
    Ok(Html(templates::edit_page(&movie, &rating, &review, None)).into_response())
}

pub async fn edit_apply(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(q): Query<IdQuery>,
    Form(req): Form<EditRequest>,
) -> AppResult<Response> {
    let Some(id) = q.local_id() else {
        return Ok(missing_movie(jar));
    };

    let rating = match parse_rating(&req.new_rating) {
        Ok(rating) => rating,
        Err(message) => {
            let Some(movie) = state.store.get_by_id(id).await? else {
                return Ok(missing_movie(jar));
            };
            let body = templates::edit_page(&movie, &req.new_rating, &req.new_review, Some(message));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(body)).into_response());
        },
    };

    if !state.store.update(id, rating, req.new_review.trim().to_string()).await? {
        return Ok(missing_movie(jar));
    }
    info!(id = id, rating = rating, "movie rated");

    Ok(Redirect::to("/").into_response())
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(q): Query<IdQuery>,
) -> AppResult<Response> {
    let Some(id) = q.local_id() else {
        return Ok(missing_movie(jar));
    };
    let Some(movie) = state.store.get_by_id(id).await? else {
        return Ok(missing_movie(jar));
    };

    state.store.delete(movie.id).await?;
    info!(id = movie.id, title = %movie.title, "movie deleted");

    let jar = flash::set(jar, &format!("Removed \"{}\".", movie.title));
    Ok((jar, Redirect::to("/")).into_response())
}

fn missing_movie(jar: CookieJar) -> Response {
    debug!("requested movie does not exist");
    (flash::set(jar, MISSING_MOVIE_NOTICE), Redirect::to("/")).into_response()
}
