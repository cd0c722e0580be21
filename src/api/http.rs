// src/api/http.rs

use reqwest::header::{HeaderMap, CACHE_CONTROL, PRAGMA};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use crate::common::{AppError, Cancelamento, BUILD_ID};

// Resposta já lida e com o corpo interpretado de forma defensiva: JSON
// quando parseia, senão o texto cru embrulhado em {"raw": ...}. Assim quem
// consome nunca precisa tratar corpo ilegível como erro de transporte.
#[derive(Debug, Clone)]
pub struct RespostaApi {
    pub url: String,
    pub status: u16,
    pub ok: bool,
    pub headers: HashMap<String, String>,
    pub corpo: Value,
}

impl RespostaApi {
    // Mensagem estruturada do backend ({"message": "..."}), quando houver.
    pub fn mensagem(&self) -> Option<String> {
        self.corpo
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string())
    }
}

// O "fetch" do console: toda requisição sai com os cabeçalhos anti-cache,
// o carimbo de build e um prazo. Sem retry automático — quem chama decide
// o que fazer com a falha.
pub struct HttpCliente {
    cliente: reqwest::Client,
    timeout_padrao: Duration,
}

impl HttpCliente {
    pub fn new(timeout_padrao: Duration) -> Self {
        // O prazo é aplicado por requisição; o builder fica sem timeout
        // global para os fluxos que pedem um prazo próprio.
        let cliente = reqwest::Client::builder()
            .build()
            .expect("Falha ao montar o cliente HTTP");
        Self { cliente, timeout_padrao }
    }

    fn preparar(&self, req: RequestBuilder, token: Option<&str>, prazo: Duration) -> RequestBuilder {
        let req = req
            .timeout(prazo)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .header("X-Debug-Build", BUILD_ID);
        match token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    // GET com o prazo padrão. `token` presente vira Authorization: Bearer.
    pub async fn get(
        &self,
        url: &str,
        token: Option<&str>,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError> {
        let req = self.preparar(self.cliente.get(url), token, self.timeout_padrao);
        concluir(req, url, cancel).await
    }

    // POST/PUT/DELETE autenticado com corpo JSON opcional.
    pub async fn enviar_json<T: Serialize + ?Sized>(
        &self,
        metodo: Method,
        url: &str,
        token: &str,
        corpo: Option<&T>,
        cancel: &Cancelamento,
    ) -> Result<RespostaApi, AppError> {
        let mut req = self.preparar(
            self.cliente.request(metodo, url),
            Some(token),
            self.timeout_padrao,
        );
        if let Some(corpo) = corpo {
            req = req.json(corpo);
        }
        concluir(req, url, cancel).await
    }

    // GET de texto puro (parciais de layout), com prazo próprio quando
    // informado.
    pub async fn texto(
        &self,
        url: &str,
        prazo: Option<Duration>,
        cancel: &Cancelamento,
    ) -> Result<(u16, String), AppError> {
        let prazo = prazo.unwrap_or(self.timeout_padrao);
        let req = self.preparar(self.cliente.get(url), None, prazo);

        let trabalho = async {
            let resp = req.send().await.map_err(|e| AppError::de_reqwest(e, url))?;
            let status = resp.status().as_u16();
            let texto = resp.text().await.unwrap_or_default();
            Ok((status, texto))
        };

        tokio::select! {
            _ = cancel.aguardar() => Err(AppError::Cancelada),
            resultado = trabalho => resultado,
        }
    }
}

async fn concluir(
    req: RequestBuilder,
    url: &str,
    cancel: &Cancelamento,
) -> Result<RespostaApi, AppError> {
    let trabalho = async {
        let resp = req.send().await.map_err(|e| AppError::de_reqwest(e, url))?;
        let status = resp.status().as_u16();
        let ok = resp.status().is_success();
        let headers = headers_para_mapa(resp.headers());
        // Corpo ilegível degrada para vazio, nunca para erro.
        let texto = resp.text().await.unwrap_or_default();
        Ok(RespostaApi {
            url: url.to_string(),
            status,
            ok,
            headers,
            corpo: ler_corpo_seguro(&texto),
        })
    };

    tokio::select! {
        _ = cancel.aguardar() => Err(AppError::Cancelada),
        resultado = trabalho => resultado,
    }
}

fn headers_para_mapa(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(nome, valor)| {
            valor
                .to_str()
                .ok()
                .map(|v| (nome.as_str().to_string(), v.to_string()))
        })
        .collect()
}

// Corpo vazio vira Null; JSON válido passa direto; qualquer outra coisa é
// preservada crua para o diagnóstico.
pub fn ler_corpo_seguro(texto: &str) -> Value {
    if texto.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(texto).unwrap_or_else(|_| json!({ "raw": texto }))
}
