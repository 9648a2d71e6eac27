use actix_cors::Cors;
use actix_web::{
    delete, get, post, web, App, HttpResponse, HttpServer, Responder, Result as ActixResult,
};
use pipecore::{Pipeline, TemplateDraft};
use pipellm::MistralClient;
use piperuntime::PipelineRunner;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

mod registry;

use registry::TemplateRegistry;

/// Application state shared across handlers
struct AppState {
    runner: PipelineRunner,
    registry: TemplateRegistry,
}

/// Error response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Confirmation response for deletions
#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

/// Health check endpoint
#[get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "pipeserver"
    }))
}

/// Parse and execute a submitted pipeline
///
/// Always responds 200: cycles and execution failures are facts reported in
/// the body, not protocol faults.
#[post("/api/v1/pipelines/parse")]
async fn parse_pipeline(
    data: web::Data<AppState>,
    pipeline: web::Json<Pipeline>,
) -> ActixResult<impl Responder> {
    let pipeline = pipeline.into_inner();
    info!(
        "Parsing pipeline: {} nodes, {} edges",
        pipeline.nodes.len(),
        pipeline.edges.len()
    );

    let response = data.runner.run(&pipeline).await;
    if let Some(err) = &response.error {
        error!("Pipeline run failed: {}", err);
    }

    Ok(HttpResponse::Ok().json(response))
}

/// Register a new node template
#[post("/api/v1/nodes")]
async fn create_node(
    data: web::Data<AppState>,
    draft: web::Json<TemplateDraft>,
) -> ActixResult<impl Responder> {
    match data.registry.create(draft.into_inner()).await {
        Ok(template) => {
            info!("Created node template '{}'", template.node_type);
            Ok(HttpResponse::Created().json(template))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: e.to_string(),
        })),
    }
}

/// List all node templates, newest first
#[get("/api/v1/nodes")]
async fn list_nodes(data: web::Data<AppState>) -> ActixResult<impl Responder> {
    Ok(HttpResponse::Ok().json(data.registry.list().await))
}

/// Get a node template by type
#[get("/api/v1/nodes/{node_type}")]
async fn get_node(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let node_type = path.into_inner();
    match data.registry.get(&node_type).await {
        Ok(template) => Ok(HttpResponse::Ok().json(template)),
        Err(e) => Ok(HttpResponse::NotFound().json(ErrorResponse {
            error: e.to_string(),
        })),
    }
}

/// Delete a node template by type
#[delete("/api/v1/nodes/{node_type}")]
async fn delete_node(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let node_type = path.into_inner();
    match data.registry.delete(&node_type).await {
        Ok(()) => {
            info!("Deleted node template '{}'", node_type);
            Ok(HttpResponse::Ok().json(MessageResponse {
                message: format!("Node '{}' deleted successfully", node_type),
            }))
        }
        Err(e) => Ok(HttpResponse::NotFound().json(ErrorResponse {
            error: e.to_string(),
        })),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚀 Starting pipeline server");

    let completion = Arc::new(MistralClient::from_env());
    let app_state = web::Data::new(AppState {
        runner: PipelineRunner::new(completion),
        registry: TemplateRegistry::new(),
    });

    let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

    info!("🌐 Server starting on http://{}", bind_address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(app_state.clone())
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .service(health_check)
            .service(parse_pipeline)
            .service(create_node)
            .service(list_nodes)
            .service(get_node)
            .service(delete_node)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
