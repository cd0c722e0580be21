// src/config.rs

use std::{env, time::Duration};

// Configuração compartilhada pelos binários. Tudo vem do ambiente (com um
// .env opcional), no mesmo espírito do resto: nada de arquivo de config
// próprio para meia dúzia de valores.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Base da API de negócio, ex.: "http://localhost:3000/api"
    pub api_base_url: String,
    // Origem do site (parciais de layout, resolução de logos)
    pub site_base_url: String,
    // Caminho do arquivo de sessão (o análogo do localStorage do navegador)
    pub sessao_path: String,
    // Timeout padrão do fetch (o original usava 6000ms)
    pub timeout_http: Duration,
    // Guarda de laço do carregador de catálogo. Os limiares vieram do
    // código original (6 chamadas / 4000ms) e são heurísticos; ficam
    // configuráveis em vez de "corrigidos".
    pub guarda_max_chamadas: u32,
    pub guarda_janela: Duration,
    // Atraso entre a mensagem de sucesso e o fechamento do formulário
    pub atraso_fechar_form: Duration,
}

impl AppConfig {
    pub fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000/api".to_string());
        let site_base_url =
            env::var("SITE_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
        let sessao_path =
            env::var("SESSAO_PATH").unwrap_or_else(|_| ".seridohub_sessao.json".to_string());

        let timeout_ms = var_u64("HTTP_TIMEOUT_MS", 6000)?;
        let guarda_max_chamadas = var_u64("GUARDA_MAX_CHAMADAS", 6)? as u32;
        let guarda_janela_ms = var_u64("GUARDA_JANELA_MS", 4000)?;

        Ok(Self {
            api_base_url,
            site_base_url,
            sessao_path,
            timeout_http: Duration::from_millis(timeout_ms),
            guarda_max_chamadas,
            guarda_janela: Duration::from_millis(guarda_janela_ms),
            atraso_fechar_form: Duration::from_millis(250),
        })
    }
}

fn var_u64(nome: &str, padrao: u64) -> anyhow::Result<u64> {
    match env::var(nome) {
        Ok(valor) => valor
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("{nome} deve ser um número inteiro, veio '{valor}'")),
        Err(_) => Ok(padrao),
    }
}
