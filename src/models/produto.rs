// src/models/produto.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- Formas de fio (wire) ---
// O backend responde ora em camelCase, ora em snake_case, ora com a
// categoria aninhada. Toda a tolerância de apelidos mora AQUI, na borda de
// ingestão; o resto do código só conhece o registro canônico.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriaWire {
    #[serde(default)]
    pub nome: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoWire {
    // O id pode chegar como número ou como string.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub preco: Option<Decimal>,
    #[serde(default)]
    pub estoque: Option<i64>,
    #[serde(default, alias = "imagem_url", alias = "imagemPrincipal", alias = "imagem_principal")]
    pub imagem_url: Option<String>,
    #[serde(default, alias = "id_categoria", alias = "categoriaId")]
    pub id_categoria: Option<Value>,
    #[serde(default)]
    pub categoria: Option<CategoriaWire>,
    #[serde(default, alias = "nomeCategoria")]
    pub categoria_nome: Option<String>,
    #[serde(default)]
    pub ativo: Option<bool>,
}

impl ProdutoWire {
    // Normaliza para o registro canônico. Produto sem id legível é
    // descartado (o chamador loga o aviso de schema).
    pub fn normalizar(self) -> Option<Produto> {
        let id = self.id.as_ref().and_then(id_como_i64)?;

        // Ordem de preferência do original: categoria aninhada primeiro.
        let nome_categoria = self
            .categoria
            .and_then(|c| c.nome)
            .or(self.categoria_nome)
            .filter(|n| !n.trim().is_empty());

        Some(Produto {
            id,
            nome: self.nome.unwrap_or_default(),
            descricao: self.descricao.filter(|d| !d.trim().is_empty()),
            preco: self.preco.unwrap_or(Decimal::ZERO),
            estoque: self.estoque.unwrap_or(0).max(0),
            imagem_url: self.imagem_url.filter(|u| !u.trim().is_empty()),
            id_categoria: self.id_categoria.as_ref().and_then(id_como_string),
            nome_categoria,
            ativo: self.ativo.unwrap_or(false),
        })
    }
}

fn id_como_i64(v: &Value) -> Option<i64> {
    v.as_i64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
}

fn id_como_string(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

// --- Registro canônico ---
// Depois de carregado, o Vec<Produto> em memória é a única fonte de verdade
// para renderização até o próximo load bem-sucedido.
#[derive(Debug, Clone, PartialEq)]
pub struct Produto {
    pub id: i64,
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: Decimal,
    pub estoque: i64,
    pub imagem_url: Option<String>,
    // Ids de categoria circulam como string: são valores de seletor.
    pub id_categoria: Option<String>,
    pub nome_categoria: Option<String>,
    pub ativo: bool,
}

impl Produto {
    // "R$ 19,90" — sempre duas casas, vírgula decimal.
    pub fn preco_formatado(&self) -> String {
        format!("{:.2}", self.preco).replace('.', ",")
    }

    // Valor para o campo do formulário de edição: precisão natural,
    // vírgula decimal ("19,9").
    pub fn preco_para_form(&self) -> String {
        self.preco.to_string().replace('.', ",")
    }
}

// --- Loja ---

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LojaWire {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default, alias = "imagem_logo", alias = "logo", alias = "logoUrl", alias = "imagem_url")]
    pub imagem_logo: Option<String>,
}

pub const LOGO_PLACEHOLDER: &str = "https://via.placeholder.com/120x120.png?text=Loja";

#[derive(Debug, Clone, PartialEq)]
pub struct Loja {
    pub id: Option<i64>,
    pub nome: String,
    pub descricao: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub logo: Option<String>,
}

impl LojaWire {
    pub fn normalizar(self) -> Loja {
        Loja {
            id: self.id.as_ref().and_then(id_como_i64),
            nome: self
                .nome
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Loja".to_string()),
            descricao: self.descricao.filter(|d| !d.trim().is_empty()),
            telefone: self.telefone.filter(|t| !t.trim().is_empty()),
            endereco: self.endereco.filter(|e| !e.trim().is_empty()),
            logo: self.imagem_logo.filter(|l| !l.trim().is_empty()),
        }
    }
}

impl Loja {
    // Resolve a URL do logo contra a origem do site: absoluta passa direto,
    // "//host/x" herda o esquema da origem, caminho relativo é ancorado.
    pub fn logo_resolvido(&self, origem: &str) -> String {
        let Some(bruto) = self.logo.as_deref() else {
            return LOGO_PLACEHOLDER.to_string();
        };
        let url = bruto.trim();
        if url.is_empty() {
            return LOGO_PLACEHOLDER.to_string();
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        if let Some(resto) = url.strip_prefix("//") {
            let esquema = origem.split("://").next().unwrap_or("https");
            return format!("{esquema}://{resto}");
        }
        let origem = origem.trim_end_matches('/');
        if url.starts_with('/') {
            format!("{origem}{url}")
        } else {
            format!("{origem}/{url}")
        }
    }
}

// --- Carrinho ---
// A forma entregue à capacidade de carrinho (subsistema externo).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCarrinho {
    pub id: i64,
    pub nome: String,
    pub preco: Decimal,
    pub imagem_url: Option<String>,
    pub loja_id: Option<i64>,
    pub loja_nome: String,
    pub quantidade: u32,
}

// --- Payload de criação/edição ---
// Campos opcionais ausentes são omitidos do JSON, como o original fazia
// com `undefined`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoPayload {
    pub nome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    pub preco: Decimal,
    pub estoque: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagem_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_categoria: Option<String>,
    pub ativo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn wire(json: &str) -> ProdutoWire {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn normaliza_apelidos_de_categoria_e_imagem() {
        let casos = [
            r#"{"id": 1, "idCategoria": 7, "categoria": {"nome": "Doces"}, "imagemUrl": "a.png"}"#,
            r#"{"id": 1, "id_categoria": "7", "categoriaNome": "Doces", "imagem_principal": "a.png"}"#,
            r#"{"id": 1, "categoriaId": 7, "nomeCategoria": "Doces", "imagem_url": "a.png"}"#,
        ];
        for caso in casos {
            let p = wire(caso).normalizar().unwrap();
            assert_eq!(p.id_categoria.as_deref(), Some("7"), "caso: {caso}");
            assert_eq!(p.nome_categoria.as_deref(), Some("Doces"), "caso: {caso}");
            assert_eq!(p.imagem_url.as_deref(), Some("a.png"), "caso: {caso}");
        }
    }

    #[test]
    fn categoria_aninhada_prevalece_sobre_campo_solto() {
        let p = wire(r#"{"id": 2, "categoria": {"nome": "Aninhada"}, "nomeCategoria": "Solta"}"#)
            .normalizar()
            .unwrap();
        assert_eq!(p.nome_categoria.as_deref(), Some("Aninhada"));
    }

    #[test]
    fn id_como_string_ou_numero() {
        assert_eq!(wire(r#"{"id": "42"}"#).normalizar().unwrap().id, 42);
        assert_eq!(wire(r#"{"id": 42}"#).normalizar().unwrap().id, 42);
    }

    #[test]
    fn produto_sem_id_legivel_e_descartado() {
        assert!(wire(r#"{"nome": "Sem id"}"#).normalizar().is_none());
        assert!(wire(r#"{"id": "abc"}"#).normalizar().is_none());
    }

    #[test]
    fn defaults_do_registro_canonico() {
        let p = wire(r#"{"id": 3}"#).normalizar().unwrap();
        assert_eq!(p.nome, "");
        assert_eq!(p.preco, Decimal::ZERO);
        assert_eq!(p.estoque, 0);
        assert!(!p.ativo);
        assert!(p.descricao.is_none());
    }

    #[test]
    fn preco_formatado_com_duas_casas_e_virgula() {
        let mut p = wire(r#"{"id": 4}"#).normalizar().unwrap();
        p.preco = Decimal::from_str("19.9").unwrap();
        assert_eq!(p.preco_formatado(), "19,90");
        assert_eq!(p.preco_para_form(), "19,9");
    }

    #[test]
    fn logo_resolvido_cobre_os_formatos() {
        let mut loja = LojaWire {
            id: None,
            nome: Some("Mercearia".into()),
            descricao: None,
            telefone: None,
            endereco: None,
            imagem_logo: Some("https://cdn.x/logo.png".into()),
        }
        .normalizar();

        let origem = "http://localhost:8080";
        assert_eq!(loja.logo_resolvido(origem), "https://cdn.x/logo.png");

        loja.logo = Some("//cdn.x/logo.png".into());
        assert_eq!(loja.logo_resolvido(origem), "http://cdn.x/logo.png");

        loja.logo = Some("img/logo.png".into());
        assert_eq!(loja.logo_resolvido(origem), "http://localhost:8080/img/logo.png");

        loja.logo = None;
        assert_eq!(loja.logo_resolvido(origem), LOGO_PLACEHOLDER);
    }

    #[test]
    fn payload_omite_opcionais_ausentes() {
        let payload = ProdutoPayload {
            nome: "Bolo".into(),
            descricao: None,
            preco: Decimal::from_str("12.50").unwrap(),
            estoque: 3,
            imagem_url: None,
            id_categoria: None,
            ativo: true,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("descricao").is_none());
        assert!(json.get("imagemUrl").is_none());
        assert_eq!(json["nome"], "Bolo");
        assert_eq!(json["estoque"], 3);
    }
}
