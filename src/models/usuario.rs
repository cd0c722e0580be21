// src/models/usuario.rs

use serde::{Deserialize, Serialize};

// --- Tipo de usuário ---
// No JSON persistido o campo vem como "CLIENTE" / "VENDEDOR" / "ADMIN".
// Qualquer valor desconhecido (ou ausente) cai em Cliente; a comparação
// no original era feita com toUpperCase, então aceitamos minúsculas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoUsuario {
    #[default]
    Cliente,
    Vendedor,
    Admin,
}

impl TipoUsuario {
    pub fn parse(valor: Option<&str>) -> Self {
        match valor.map(|v| v.trim().to_uppercase()).as_deref() {
            Some("VENDEDOR") => TipoUsuario::Vendedor,
            Some("ADMIN") => TipoUsuario::Admin,
            _ => TipoUsuario::Cliente,
        }
    }

    // Rótulo exibido no menu ("Fulano (vendedor)").
    pub fn rotulo(&self) -> &'static str {
        match self {
            TipoUsuario::Vendedor => "vendedor",
            TipoUsuario::Admin => "administrador",
            TipoUsuario::Cliente => "cliente",
        }
    }
}

// --- Usuário persistido ---
// O payload gravado no login é tolerante: só o JSON precisa ser um objeto
// válido. Campos ausentes têm os mesmos fallbacks do original.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    #[serde(default, deserialize_with = "id_tolerante")]
    pub id: Option<i64>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default, deserialize_with = "tipo_tolerante")]
    pub tipo: TipoUsuario,
}

impl Usuario {
    // Primeiro nome para a saudação do header; "usuário" quando não há nome.
    pub fn primeiro_nome(&self) -> &str {
        self.nome
            .as_deref()
            .and_then(|n| n.split_whitespace().next())
            .unwrap_or("usuário")
    }
}

// Os campos do payload podem vir em qualquer caixa ou tipo; só o JSON em
// si precisa ser um objeto válido — o resto degrada para os fallbacks em
// vez de derrubar a leitura da sessão.
fn tipo_tolerante<'de, D>(deserializer: D) -> Result<TipoUsuario, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let bruto: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(TipoUsuario::parse(bruto.as_ref().and_then(|v| v.as_str())))
}

fn id_tolerante<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let bruto: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(bruto.as_ref().and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    }))
}

// --- Sessão ---
// Par usuário/token lido do armazenamento persistente. Escrita acontece no
// login (colaborador externo); aqui só leitura, logout e auto-limpeza.
#[derive(Debug, Clone)]
pub struct Sessao {
    pub usuario: Usuario,
    pub token: String,
}
