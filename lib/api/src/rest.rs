use crate::context::ServiceContext;
use actix_cors::Cors;
use actix_web::{error, web, App, HttpResponse, HttpServer, Result as ActixResult};
use mixwheel_core::{Error, Track};
use mixwheel_similarity::RecommendOptions;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    query: String,
    #[serde(default = "default_search_limit")]
    limit: usize,
}

fn default_search_limit() -> usize {
    10
}

#[derive(Deserialize)]
struct SimilarGenresQuery {
    #[serde(default = "default_top_k")]
    top_k: usize,
}

fn default_top_k() -> usize {
    10
}

#[derive(Deserialize)]
struct RecommendRequest {
    track: Track,
    #[serde(flatten)]
    options: RecommendOptions,
}

#[derive(Serialize)]
struct SimilarGenre {
    genre: String,
    distance: f64,
    explanation: String,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(context: Arc<ServiceContext>, host: &str, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(context.clone()))
                .configure(routes)
        })
        .bind((host, port))?
        .run()
        .await
    }
}

/// Register every route and the JSON body settings
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        warn!("Rejected request body: {}", message);
        error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "error": message })),
        )
        .into()
    }))
    .route("/", web::get().to(status))
    .route("/search", web::get().to(search_tracks))
    .route("/track/{id}", web::get().to(get_track))
    .route("/recommend", web::post().to(recommend))
    .route("/genres", web::get().to(list_genres))
    .route("/genres/{genre}/similar", web::get().to(similar_genres));
}

fn error_response(err: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        e if e.is_validation() => HttpResponse::BadRequest().json(body),
        Error::GenreNotFound(_) | Error::TrackNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

async fn status() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "mixwheel running"
    })))
}

async fn search_tracks(
    context: web::Data<Arc<ServiceContext>>,
    query: web::Query<SearchQuery>,
) -> ActixResult<HttpResponse> {
    let tracks = context.catalog.search(&query.query, query.limit);
    Ok(HttpResponse::Ok().json(tracks))
}

async fn get_track(
    context: web::Data<Arc<ServiceContext>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();

    match context.catalog.get(&id) {
        Some(track) => Ok(HttpResponse::Ok().json(track)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "error": "Track not found"
        }))),
    }
}

async fn recommend(
    context: web::Data<Arc<ServiceContext>>,
    req: web::Json<RecommendRequest>,
) -> ActixResult<HttpResponse> {
    let RecommendRequest { track, options } = req.into_inner();

    match context.engine.recommend_with_stats(&track, &options) {
        Ok((results, stats)) => {
            debug!(
                "Recommended {} of {} candidates for '{}' (best {:.3}, avg {:.3})",
                stats.results_count, stats.candidates_count, track.id, stats.best_total, stats.avg_total
            );
            Ok(HttpResponse::Ok().json(results))
        }
        Err(e) => {
            warn!("Recommendation for '{}' failed: {}", track.id, e);
            Ok(error_response(&e))
        }
    }
}

async fn list_genres(context: web::Data<Arc<ServiceContext>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(context.catalog.genres()))
}

async fn similar_genres(
    context: web::Data<Arc<ServiceContext>>,
    path: web::Path<String>,
    query: web::Query<SimilarGenresQuery>,
) -> ActixResult<HttpResponse> {
    let genre = path.into_inner();

    match context.genres.similar_genres(&genre, query.top_k) {
        Ok(matches) => {
            let body: Vec<SimilarGenre> = matches
                .into_iter()
                .map(|m| SimilarGenre {
                    genre: m.genre,
                    distance: (m.distance * 1000.0).round() / 1000.0,
                    explanation: m.explanation,
                })
                .collect();
            Ok(HttpResponse::Ok().json(body))
        }
        Err(e) => {
            warn!("Similar genres for '{}' failed: {}", genre, e);
            Ok(error_response(&e))
        }
    }
}
