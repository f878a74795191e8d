use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use validator::Validate;

use crate::core::{open_requests, passes_subject_gate, MatchError, Matcher, NoJitter};
use crate::models::{
    ClassRequest, ConfirmMatchRequest, ErrorResponse, HealthResponse, ListMatchesQuery,
    ListMatchesResponse, OpenClassesResponse, RankTutorsRequest, RankTutorsResponse,
    ScoreTutorRequest, ScoreTutorResponse, TutorCandidate,
};
use crate::services::{CacheError, CacheKey, CacheManager, DirectoryClient, DirectoryError, MatchingError, MatchingService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<DirectoryClient>,
    pub cache: Arc<CacheManager>,
    pub matching: Arc<dyn MatchingService>,
    pub matcher: Matcher,
    pub default_limit: u16,
    pub max_limit: u16,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/classes/open", web::get().to(open_classes))
        .route("/matches/rank", web::post().to(rank_tutors))
        .route("/matches/score", web::post().to(score_tutor))
        .route("/matches/confirm", web::post().to(confirm_match))
        .route("/matches", web::get().to(list_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.matching.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// List class requests eligible for matching
///
/// GET /api/v1/classes/open
async fn open_classes(state: web::Data<AppState>) -> impl Responder {
    let classes = match load_classes(&state).await {
        Ok(classes) => classes,
        Err(e) => return directory_error("Failed to fetch class requests", e),
    };

    let total_classes = classes.len();
    let open = open_requests(classes);

    tracing::debug!("{} of {} class requests are open", open.len(), total_classes);

    HttpResponse::Ok().json(OpenClassesResponse {
        total: open.len(),
        classes: open,
    })
}

/// Rank the tutor roster for a class request
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "classId": "string",
///   "limit": 20,
///   "seed": 42
/// }
/// ```
async fn rank_tutors(
    state: web::Data<AppState>,
    req: web::Json<RankTutorsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    // Cap the display limit; the ranking itself is unbounded
    let limit = req.limit.unwrap_or(state.default_limit).min(state.max_limit) as usize;

    tracing::info!("Ranking tutors for class: {}, limit: {}", req.class_id, limit);

    let class = match load_class(&state, &req.class_id).await {
        Ok(class) => class,
        Err(e) => return directory_error("Failed to fetch class request", e),
    };

    if !class.is_open() {
        return error_response(
            StatusCode::CONFLICT,
            "Class not open",
            format!("Class request {} has status '{}'", class.id, class.status.as_str()),
        );
    }

    let tutors = match load_tutors(&state).await {
        Ok(tutors) => tutors,
        Err(e) => return directory_error("Failed to fetch tutors", e),
    };

    let mut jitter = state.matcher.jitter_source(req.seed);
    let mut ranked = match state.matcher.rank_candidates(&class, &tutors, &mut *jitter) {
        Ok(ranked) => ranked,
        Err(e) => return match_error(e),
    };

    let total_matched = ranked.len();
    ranked.truncate(limit);

    tracing::info!(
        "Returning {} tutors for class {} ({} matched of {} candidates)",
        ranked.len(),
        class.id,
        total_matched,
        tutors.len()
    );

    HttpResponse::Ok().json(RankTutorsResponse {
        class_id: class.id,
        matches: ranked,
        total_candidates: tutors.len(),
        total_matched,
    })
}

/// Score a single tutor against a class request
///
/// POST /api/v1/matches/score
async fn score_tutor(
    state: web::Data<AppState>,
    req: web::Json<ScoreTutorRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let class = match load_class(&state, &req.class_id).await {
        Ok(class) => class,
        Err(e) => return directory_error("Failed to fetch class request", e),
    };

    let tutor = match load_tutor(&state, &req.tutor_id).await {
        Ok(tutor) => tutor,
        Err(e) => return directory_error("Failed to fetch tutor", e),
    };

    let mut jitter = state.matcher.jitter_source(req.seed);
    match state.matcher.breakdown(&class, &tutor, &mut *jitter) {
        Ok(breakdown) => HttpResponse::Ok().json(ScoreTutorResponse {
            class_id: class.id,
            tutor_id: tutor.id,
            score: breakdown.total,
            breakdown,
        }),
        Err(e) => match_error(e),
    }
}

/// Confirm a tutor for a class request
///
/// POST /api/v1/matches/confirm
///
/// Request body:
/// ```json
/// {
///   "classId": "string",
///   "tutorId": "string"
/// }
/// ```
///
/// Stores a match record with the jitter-free score. The class request
/// itself is left untouched.
async fn confirm_match(
    state: web::Data<AppState>,
    req: web::Json<ConfirmMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let class = match load_class(&state, &req.class_id).await {
        Ok(class) => class,
        Err(e) => return directory_error("Failed to fetch class request", e),
    };

    if !class.is_open() {
        return error_response(
            StatusCode::CONFLICT,
            "Class not open",
            format!("Class request {} has status '{}'", class.id, class.status.as_str()),
        );
    }

    let tutor = match load_tutor(&state, &req.tutor_id).await {
        Ok(tutor) => tutor,
        Err(e) => return directory_error("Failed to fetch tutor", e),
    };

    if !passes_subject_gate(&tutor, &class) {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Subject mismatch",
            format!("Tutor {} does not teach '{}'", tutor.id, class.subject),
        );
    }

    let mut no_jitter = NoJitter;
    let breakdown = match state.matcher.breakdown(&class, &tutor, &mut no_jitter) {
        Ok(breakdown) => breakdown,
        Err(e) => return match_error(e),
    };

    match state.matching.confirm_match(&class.id, &tutor.id, breakdown.base()).await {
        Ok(record) => {
            tracing::info!(
                "Confirmed match {}: class {} -> tutor {} (score {})",
                record.id,
                record.class_id,
                record.tutor_id,
                record.score
            );

            if let Err(e) = state.cache.delete(&CacheKey::class(&class.id)).await {
                tracing::warn!("Failed to invalidate cache: {}", e);
            }

            HttpResponse::Ok().json(record)
        }
        Err(MatchingError::InvalidInput(message)) => {
            error_response(StatusCode::BAD_REQUEST, "Invalid input", message)
        }
        Err(e) => {
            tracing::error!("Failed to confirm match {} -> {}: {}", class.id, tutor.id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to confirm match", e.to_string())
        }
    }
}

/// List confirmed matches for a class request
///
/// GET /api/v1/matches?classId={classId}
async fn list_matches(
    state: web::Data<AppState>,
    query: web::Query<ListMatchesQuery>,
) -> impl Responder {
    match state.matching.matches_for_class(&query.class_id).await {
        Ok(matches) => HttpResponse::Ok().json(ListMatchesResponse {
            class_id: query.class_id.clone(),
            count: matches.len(),
            matches,
        }),
        Err(e) => {
            tracing::error!("Failed to list matches for {}: {}", query.class_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list matches", e.to_string())
        }
    }
}

/// Read through the cache, falling back to the directory on a miss
async fn cached<T, F, Fut>(cache: &CacheManager, key: &str, fetch: F) -> Result<T, DirectoryError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, DirectoryError>>,
{
    match cache.get::<T>(key).await {
        Ok(value) => return Ok(value),
        Err(CacheError::CacheMiss(_)) => {}
        Err(e) => tracing::warn!("Cache read failed for {}: {}", key, e),
    }

    let value = fetch().await?;

    if let Err(e) = cache.set(key, &value).await {
        tracing::warn!("Cache write failed for {}: {}", key, e);
    }

    Ok(value)
}

async fn load_classes(state: &AppState) -> Result<Vec<ClassRequest>, DirectoryError> {
    cached(&state.cache, &CacheKey::classes(), || state.directory.list_class_requests()).await
}

async fn load_class(state: &AppState, class_id: &str) -> Result<ClassRequest, DirectoryError> {
    cached(&state.cache, &CacheKey::class(class_id), || {
        state.directory.get_class_request(class_id)
    })
    .await
}

async fn load_tutors(state: &AppState) -> Result<Vec<TutorCandidate>, DirectoryError> {
    cached(&state.cache, &CacheKey::tutors(), || state.directory.list_tutors()).await
}

/// Look a tutor up in the roster, asking the directory directly if absent
async fn load_tutor(state: &AppState, tutor_id: &str) -> Result<TutorCandidate, DirectoryError> {
    let roster = load_tutors(state).await?;

    match roster.into_iter().find(|t| t.id == tutor_id) {
        Some(tutor) => Ok(tutor),
        None => state.directory.get_tutor(tutor_id).await,
    }
}

fn error_response(status: StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn directory_error(context: &str, e: DirectoryError) -> HttpResponse {
    match e {
        DirectoryError::NotFound(what) => {
            error_response(StatusCode::NOT_FOUND, "Not found", format!("No such {}", what))
        }
        e => {
            tracing::error!("{}: {}", context, e);
            error_response(StatusCode::BAD_GATEWAY, context, e.to_string())
        }
    }
}

fn match_error(e: MatchError) -> HttpResponse {
    match e {
        MatchError::InvalidInput(message) => {
            error_response(StatusCode::BAD_REQUEST, "Invalid input", message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_directory_not_found_maps_to_404() {
        let response = directory_error("ctx", DirectoryError::NotFound("tutor t1".into()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = directory_error("ctx", DirectoryError::Unauthorized);
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let response = match_error(MatchError::InvalidInput("missing subject".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
