// src/api/loja_api.rs

use async_trait::async_trait;
use reqwest::Method;

use crate::api::http::{HttpCliente, RespostaApi};
use crate::common::{AppError, Cancelamento};
use crate::config::AppConfig;
use crate::models::ProdutoPayload;

// As chamadas que o storefront faz ao backend de negócio. É um trait para
// os controladores receberem a dependência na construção — e os testes
// injetarem um catálogo falso em vez de uma rede de verdade.
#[async_trait]
pub trait CatalogoRemoto: Send + Sync {
    // GET /produtos/minha-loja — loja + produtos do vendedor autenticado
    async fn minha_loja(&self, token: &str, cancel: &Cancelamento)
        -> Result<RespostaApi, AppError>;

    // POST /produtos
    async fn criar_produto(
        &self,
        token: &str,
        payload: &ProdutoPayload,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError>;

    // PUT /produtos/:id
    async fn atualizar_produto(
        &self,
        token: &str,
        id: i64,
        payload: &ProdutoPayload,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError>;

    // DELETE /produtos/:id
    async fn remover_produto(
        &self,
        token: &str,
        id: i64,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError>;

    // GET /lojas/:id — vitrine pública
    async fn loja_publica(&self, loja_id: i64, cancel: &Cancelamento)
        -> Result<RespostaApi, AppError>;

    // GET /lojas/:id/produtos — lista pública
    async fn produtos_da_loja(
        &self,
        loja_id: i64,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError>;
}

// Implementação HTTP de verdade, em cima do fetch com prazo e anti-cache.
pub struct ApiLoja {
    http: HttpCliente,
    base: String,
}

impl ApiLoja {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: HttpCliente::new(config.timeout_http),
            base: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, caminho: &str) -> String {
        format!("{}{caminho}", self.base)
    }
}

#[async_trait]
impl CatalogoRemoto for ApiLoja {
    async fn minha_loja(
        &self,
        token: &str,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError> {
        self.http
            .get(&self.url("/produtos/minha-loja"), Some(token), cancel)
            .await
    }

    async fn criar_produto(
        &self,
        token: &str,
        payload: &ProdutoPayload,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError> {
        self.http
            .enviar_json(Method::POST, &self.url("/produtos"), token, Some(payload), cancel)
            .await
    }

    async fn atualizar_produto(
        &self,
        token: &str,
        id: i64,
        payload: &ProdutoPayload,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError> {
        let url = self.url(&format!("/produtos/{id}"));
        self.http
            .enviar_json(Method::PUT, &url, token, Some(payload), cancel)
            .await
    }

    async fn remover_produto(
        &self,
        token: &str,
        id: i64,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError> {
        let url = self.url(&format!("/produtos/{id}"));
        self.http
            .enviar_json::<ProdutoPayload>(Method::DELETE, &url, token, None, cancel)
            .await
    }

    async fn loja_publica(
        &self,
        loja_id: i64,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError> {
        self.http
            .get(&self.url(&format!("/lojas/{loja_id}")), None, cancel)
            .await
    }

    async fn produtos_da_loja(
        &self,
        loja_id: i64,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError> {
        let url = self.url(&format!("/lojas/{loja_id}/produtos"));
        self.http.get(&url, None, cancel).await
    }
}
