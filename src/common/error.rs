use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// A taxonomia segue o que o console precisa distinguir na tela:
// transporte/timeout, HTTP não-2xx, resposta fora do formato, validação
// de formulário e sessão corrompida no armazenamento local.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Tempo esgotado ao chamar {0}")]
    TempoEsgotado(String),

    #[error("Erro de conexão com o servidor")]
    Conexao(#[source] reqwest::Error),

    #[error("Erro HTTP {status}")]
    Http {
        status: u16,
        // Mensagem estruturada vinda do backend, quando houver.
        mensagem: Option<String>,
    },

    #[error("Resposta fora do formato esperado: {0}")]
    Schema(String),

    #[error("Erro de validação")]
    Validacao(#[from] validator::ValidationErrors),

    #[error("Sessão corrompida no armazenamento local")]
    SessaoCorrompida,

    #[error("Operação cancelada")]
    Cancelada,

    #[error("Falha de E/S no armazenamento local")]
    Armazenamento(#[from] std::io::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno")]
    Interno(#[from] anyhow::Error),
}

impl AppError {
    // Classifica um erro do reqwest: timeout vira a variante própria,
    // o resto é erro de conexão genérico.
    pub fn de_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            AppError::TempoEsgotado(url.to_string())
        } else {
            AppError::Conexao(err)
        }
    }

    // A mensagem que o usuário final vê; o detalhe completo vai para o
    // painel de diagnóstico.
    pub fn mensagem_usuario(&self) -> String {
        match self {
            AppError::TempoEsgotado(_) | AppError::Conexao(_) => {
                "Erro de conexão com o servidor.".to_string()
            }
            AppError::Http { status, mensagem } => mensagem
                .clone()
                .unwrap_or_else(|| format!("Erro HTTP {status}.")),
            AppError::Schema(_) => "Resposta inesperada do servidor.".to_string(),
            AppError::SessaoCorrompida => {
                "Sua sessão estava corrompida e foi encerrada.".to_string()
            }
            outro => outro.to_string(),
        }
    }
}
