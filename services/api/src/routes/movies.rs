//! Movie catalog endpoints

use axum::{
    Extension, Json,
    extract::{
        Multipart, Path, Query, State,
        multipart::{Field, MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};

use auth::SessionContext;
use media::{PosterStore, PosterUpload, UploadError};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        MessageResponse,
        movie::{ListMoviesQuery, Movie},
    },
    state::AppState,
    validation::{current_year, parse_id, validate_list_query, validate_new_movie, validate_patch},
};

const TITLE_FIELD: &str = "title";
const YEAR_FIELD: &str = "publishingYear";
const POSTER_FIELD: &str = "poster";

/// List or search movies, one page at a time
pub async fn list_movies(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ListMoviesQuery>,
) -> ApiResult<impl IntoResponse> {
    let params = validate_list_query(
        query.page.as_deref(),
        query.limit.as_deref(),
        query.search.as_deref(),
    )
    .map_err(ApiError::Validation)?;

    let page = match params.search.as_deref() {
        Some(term) => {
            state
                .catalog
                .search(&session, term, params.page, params.limit)
                .await?
        }
        None => {
            state
                .catalog
                .find_all(&session, params.page, params.limit)
                .await?
        }
    };

    Ok(Json(page))
}

/// Get a movie by ID
pub async fn get_movie(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<Movie>> {
    let id = parse_id(&id).map_err(ApiError::BadRequest)?;
    let movie = state.catalog.find_one(&session, id).await?;
    Ok(Json(movie))
}

/// Create a movie from a multipart form
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let form = MovieForm::read(multipart, &state.posters).await?;

    let mut new_movie = validate_new_movie(
        form.title.as_deref(),
        form.publishing_year.as_deref(),
        current_year(),
    )
    .map_err(ApiError::Validation)?;

    let stored = store_poster(&state.posters, form.poster.as_ref()).await?;
    new_movie.poster = stored.clone();

    match state.catalog.create(&session, &new_movie).await {
        Ok(movie) => Ok((StatusCode::CREATED, Json(movie))),
        Err(e) => {
            discard_poster(&state.posters, stored.as_deref()).await;
            Err(e.into())
        }
    }
}

/// Partially update a movie from a multipart form
///
/// Absent fields keep their stored values. A new poster replaces the old
/// reference; the previous file stays on disk.
pub async fn update_movie(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Movie>> {
    let id = parse_id(&id).map_err(ApiError::BadRequest)?;
    let multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let form = MovieForm::read(multipart, &state.posters).await?;

    let patch = validate_patch(
        form.title.as_deref(),
        form.publishing_year.as_deref(),
        current_year(),
    )
    .map_err(ApiError::Validation)?;

    // Unknown ids must not leave an orphaned file behind
    state.catalog.find_one(&session, id).await?;

    let stored = store_poster(&state.posters, form.poster.as_ref()).await?;

    match state
        .catalog
        .update(&session, id, &patch, stored.as_deref())
        .await
    {
        Ok(movie) => Ok(Json(movie)),
        Err(e) => {
            discard_poster(&state.posters, stored.as_deref()).await;
            Err(e.into())
        }
    }
}

/// Delete a movie
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id).map_err(ApiError::BadRequest)?;
    state.catalog.remove(&session, id).await?;

    Ok(Json(MessageResponse::new(format!(
        "Movie with ID {} deleted successfully",
        id
    ))))
}

/// Text fields and optional poster of a movie form
#[derive(Debug, Default)]
struct MovieForm {
    title: Option<String>,
    publishing_year: Option<String>,
    poster: Option<PosterUpload>,
}

impl MovieForm {
    /// Drain the multipart stream, rejecting an unacceptable poster as soon
    /// as its headers or size give it away
    async fn read(mut multipart: Multipart, posters: &PosterStore) -> ApiResult<Self> {
        let mut form = MovieForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some(TITLE_FIELD) => {
                    form.title = Some(field.text().await.map_err(multipart_error)?);
                }
                Some(YEAR_FIELD) => {
                    form.publishing_year = Some(field.text().await.map_err(multipart_error)?);
                }
                Some(POSTER_FIELD) => {
                    form.poster = read_poster(field, posters).await?;
                }
                _ => {
                    // Unknown fields are drained and ignored
                    field.bytes().await.map_err(multipart_error)?;
                }
            }
        }

        Ok(form)
    }
}

async fn read_poster(mut field: Field<'_>, posters: &PosterStore) -> ApiResult<Option<PosterUpload>> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    // A file input left empty arrives as a nameless, empty part
    let blank_name = file_name.as_deref().is_none_or(str::is_empty);

    let declared = content_type.as_deref().unwrap_or_default();
    if !blank_name && !media::is_accepted_type(declared) {
        return Err(UploadError::UnsupportedType(declared.to_string()).into());
    }

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        data.extend_from_slice(&chunk);
        posters.check_size(data.len())?;
    }

    if data.is_empty() && blank_name {
        return Ok(None);
    }

    let upload = PosterUpload {
        file_name,
        content_type,
        data,
    };
    posters.check(&upload)?;

    Ok(Some(upload))
}

async fn store_poster(
    posters: &PosterStore,
    upload: Option<&PosterUpload>,
) -> ApiResult<Option<String>> {
    match upload {
        Some(upload) => Ok(Some(posters.store(upload).await?)),
        None => Ok(None),
    }
}

async fn discard_poster(posters: &PosterStore, stored: Option<&str>) {
    if let Some(path) = stored {
        if let Err(e) = posters.remove(path).await {
            error!("Failed to discard poster {}: {}", path, e);
        } else {
            info!("Discarded poster {} after failed write", path);
        }
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(err.body_text())
    }
}
