use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

// Identificador de build carimbado em todo diagnóstico e no cabeçalho
// X-Debug-Build, para casar o relato de um erro com o código que rodava.
pub const BUILD_ID: &str = concat!("seridohub_console_", env!("CARGO_PKG_VERSION"));

// Payload do painel de diagnóstico: o que um atendente precisa para
// entender um erro sem reproduzi-lo (URL, status, cabeçalhos, corpo).
// Distinto da mensagem amigável mostrada ao usuário final.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostico {
    pub onde: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensagem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metodo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers_resposta: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpo_resposta: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_enviado: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dica: Option<String>,
    pub build: &'static str,
    pub quando: DateTime<Utc>,
}

impl Diagnostico {
    pub fn novo(onde: impl Into<String>) -> Self {
        Self {
            onde: onde.into(),
            mensagem: None,
            url: None,
            metodo: None,
            status: None,
            headers_resposta: None,
            corpo_resposta: None,
            payload_enviado: None,
            dica: None,
            build: BUILD_ID,
            quando: Utc::now(),
        }
    }

    pub fn com_mensagem(mut self, mensagem: impl Into<String>) -> Self {
        self.mensagem = Some(mensagem.into());
        self
    }

    pub fn com_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn com_metodo(mut self, metodo: impl Into<String>) -> Self {
        self.metodo = Some(metodo.into());
        self
    }

    pub fn com_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn com_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers_resposta = Some(headers);
        self
    }

    pub fn com_corpo(mut self, corpo: Value) -> Self {
        self.corpo_resposta = Some(corpo);
        self
    }

    pub fn com_payload(mut self, payload: Value) -> Self {
        self.payload_enviado = Some(payload);
        self
    }

    pub fn com_dica(mut self, dica: impl Into<String>) -> Self {
        self.dica = Some(dica.into());
        self
    }

    // Além de ir para o painel, todo diagnóstico vira um evento de log.
    pub fn registrar(&self) {
        tracing::error!(onde = %self.onde, "{}", self.detalhado());
    }

    pub fn detalhado(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.onde.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializa_somente_campos_presentes() {
        let diag = Diagnostico::novo("carregar_produtos")
            .com_url("/api/produtos/minha-loja")
            .com_status(500);
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["onde"], "carregar_produtos");
        assert_eq!(json["status"], 500);
        assert!(json.get("payloadEnviado").is_none());
        assert_eq!(json["build"], BUILD_ID);
    }
}
