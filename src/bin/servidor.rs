// src/bin/servidor.rs
//
// O backend fino do storefront: sonda de vida, repasse transparente de
// /api/* para o backend de negócio e os arquivos estáticos do site
// (parciais de layout incluídas). As rotas de negócio em si moram no
// colaborador atrás do proxy.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde_json::json;
use std::env;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

#[derive(Clone)]
struct EstadoServidor {
    http: reqwest::Client,
    backend_url: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();
    dotenvy::dotenv().ok();

    let porta = env::var("PORTA").unwrap_or_else(|_| "8080".to_string());
    let backend_url = env::var("BACKEND_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string())
        .trim_end_matches('/')
        .to_string();
    let estaticos = env::var("ESTATICOS_DIR").unwrap_or_else(|_| "frontend".to_string());

    let estado = EstadoServidor {
        http: reqwest::Client::new(),
        backend_url,
    };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/{*caminho}", any(repassar))
        .fallback_service(ServeDir::new(&estaticos))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(estado);

    let addr = format!("0.0.0.0:{porta}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

// Repassa a requisição como veio (método, cabeçalhos, corpo, query) e
// devolve a resposta como chegou. Nenhuma regra de negócio aqui.
async fn repassar(State(estado): State<EstadoServidor>, req: Request) -> Response {
    let caminho = req.uri().path().to_string();
    let query = req
        .uri()
        .query()
        .map(|q| format!("?{q}"))
        .unwrap_or_default();
    let destino = format!("{}{caminho}{query}", estado.backend_url);

    let metodo = req.method().clone();
    let cabecalhos = req.headers().clone();
    let corpo = match axum::body::to_bytes(req.into_body(), 2 * 1024 * 1024).await {
        Ok(corpo) => corpo,
        Err(err) => {
            tracing::error!("Corpo da requisição ilegível: {err}");
            return resposta_de_erro(StatusCode::BAD_REQUEST, "Corpo da requisição ilegível.");
        }
    };

    let repasse = estado
        .http
        .request(metodo, &destino)
        .headers(filtrar_cabecalhos(&cabecalhos));

    let resposta = match repasse.body(corpo).send().await {
        Ok(resposta) => resposta,
        Err(err) => {
            tracing::error!("Backend inalcançável em {destino}: {err}");
            return resposta_de_erro(StatusCode::BAD_GATEWAY, "Backend indisponível no momento.");
        }
    };

    let status = resposta.status();
    let cabecalhos_resposta = resposta.headers().clone();
    let bytes = resposta.bytes().await.unwrap_or_default();

    montar_resposta(status, &cabecalhos_resposta, bytes.to_vec())
}

// Cabeçalhos hop-by-hop (e os que o reqwest recalcula) não atravessam o
// repasse.
fn cabecalho_fica_para_tras(nome: &str) -> bool {
    matches!(
        nome.to_ascii_lowercase().as_str(),
        "host" | "connection" | "content-length" | "transfer-encoding" | "keep-alive" | "upgrade"
    )
}

fn filtrar_cabecalhos(cabecalhos: &HeaderMap) -> HeaderMap {
    let mut filtrados = HeaderMap::new();
    for (nome, valor) in cabecalhos.iter() {
        if cabecalho_fica_para_tras(nome.as_str()) {
            continue;
        }
        filtrados.append(nome.clone(), valor.clone());
    }
    filtrados
}

fn montar_resposta(status: StatusCode, cabecalhos: &HeaderMap, corpo: Vec<u8>) -> Response {
    let mut resposta = Response::new(Body::from(corpo));
    *resposta.status_mut() = status;
    *resposta.headers_mut() = filtrar_cabecalhos(cabecalhos);
    resposta
}

fn resposta_de_erro(status: StatusCode, mensagem: &str) -> Response {
    (status, Json(json!({ "message": mensagem }))).into_response()
}
