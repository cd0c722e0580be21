// src/console/form.rs

use rust_decimal::Decimal;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::models::{Produto, ProdutoPayload};

// Estado do formulário de produto, com os campos numéricos ainda como
// texto — exatamente o que o usuário digitou. `id` presente marca edição
// (PUT); ausente, criação (POST).
#[derive(Debug, Clone, Validate)]
pub struct FormProduto {
    pub id: Option<i64>,

    #[validate(length(min = 1, message = "Informe o nome do produto."))]
    pub nome: String,

    pub descricao: String,

    #[validate(custom(function = "validar_preco"))]
    pub preco: String,

    #[validate(custom(function = "validar_estoque"))]
    pub estoque: String,

    pub id_categoria: String,
    pub imagem_url: String,
    pub ativo: bool,
}

impl Default for FormProduto {
    fn default() -> Self {
        Self {
            id: None,
            nome: String::new(),
            descricao: String::new(),
            preco: String::new(),
            estoque: String::new(),
            id_categoria: String::new(),
            imagem_url: String::new(),
            // Produto novo nasce ativo, como no formulário original.
            ativo: true,
        }
    }
}

// Falha de validação pré-voo: mensagem no campo, nenhuma requisição sai.
#[derive(Debug, Clone, PartialEq)]
pub struct ErroFormulario {
    pub campo: &'static str,
    pub mensagem: String,
}

// Aceita vírgula como separador decimal ("19,90" → 19.90).
pub fn parse_preco(bruto: &str) -> Option<Decimal> {
    Decimal::from_str(bruto.trim().replace(',', ".").as_str()).ok()
}

fn validar_preco(valor: &str) -> Result<(), ValidationError> {
    match parse_preco(valor) {
        Some(preco) if preco > Decimal::ZERO => Ok(()),
        _ => {
            let mut erro = ValidationError::new("preco");
            erro.message = Some("Informe um preço válido.".into());
            Err(erro)
        }
    }
}

fn validar_estoque(valor: &str) -> Result<(), ValidationError> {
    match valor.trim().parse::<i64>() {
        Ok(estoque) if estoque >= 0 => Ok(()),
        _ => {
            let mut erro = ValidationError::new("estoque");
            erro.message = Some("Informe um estoque válido (zero ou maior).".into());
            Err(erro)
        }
    }
}

impl FormProduto {
    // Pré-preenche para edição a partir do registro em memória; o preço
    // volta para o campo com vírgula decimal.
    pub fn para_edicao(produto: &Produto) -> Self {
        Self {
            id: Some(produto.id),
            nome: produto.nome.clone(),
            descricao: produto.descricao.clone().unwrap_or_default(),
            preco: produto.preco_para_form(),
            estoque: produto.estoque.to_string(),
            id_categoria: produto.id_categoria.clone().unwrap_or_default(),
            imagem_url: produto.imagem_url.clone().unwrap_or_default(),
            ativo: produto.ativo,
        }
    }

    // Validação pré-voo e montagem do payload. A primeira falha, na ordem
    // dos campos do formulário, interrompe — nada chega na rede.
    pub fn validar(&self) -> Result<ProdutoPayload, ErroFormulario> {
        let normalizado = Self {
            nome: self.nome.trim().to_string(),
            ..self.clone()
        };

        if let Err(erros) = normalizado.validate() {
            let campos = erros.field_errors();
            for campo in ["nome", "preco", "estoque"] {
                if let Some(falhas) = campos.get(campo) {
                    let mensagem = falhas
                        .first()
                        .and_then(|f| f.message.as_ref())
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Valor inválido.".to_string());
                    return Err(ErroFormulario { campo, mensagem });
                }
            }
        }

        let preco = parse_preco(&self.preco).ok_or(ErroFormulario {
            campo: "preco",
            mensagem: "Informe um preço válido.".to_string(),
        })?;
        let estoque = self.estoque.trim().parse::<i64>().map_err(|_| ErroFormulario {
            campo: "estoque",
            mensagem: "Informe um estoque válido (zero ou maior).".to_string(),
        })?;

        let descricao = self.descricao.trim();
        let imagem_url = self.imagem_url.trim();
        let id_categoria = self.id_categoria.trim();

        Ok(ProdutoPayload {
            nome: self.nome.trim().to_string(),
            descricao: (!descricao.is_empty()).then(|| descricao.to_string()),
            preco,
            estoque,
            imagem_url: (!imagem_url.is_empty()).then(|| imagem_url.to_string()),
            id_categoria: (!id_categoria.is_empty()).then(|| id_categoria.to_string()),
            ativo: self.ativo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_valido() -> FormProduto {
        FormProduto {
            nome: "Bolo de rolo".into(),
            preco: "19,90".into(),
            estoque: "5".into(),
            ..Default::default()
        }
    }

    #[test]
    fn preco_com_virgula_e_aceito() {
        let payload = form_valido().validar().unwrap();
        assert_eq!(payload.preco, Decimal::from_str("19.90").unwrap());
        assert_eq!(payload.estoque, 5);
    }

    #[test]
    fn preco_zero_ou_nao_numerico_e_rejeitado() {
        for invalido in ["0", "abc", "", "-2"] {
            let form = FormProduto { preco: invalido.into(), ..form_valido() };
            let erro = form.validar().unwrap_err();
            assert_eq!(erro.campo, "preco", "preco {invalido:?} deveria falhar");
            assert_eq!(erro.mensagem, "Informe um preço válido.");
        }
    }

    #[test]
    fn nome_vazio_e_rejeitado_primeiro() {
        let form = FormProduto { nome: "   ".into(), preco: "abc".into(), ..form_valido() };
        let erro = form.validar().unwrap_err();
        assert_eq!(erro.campo, "nome");
        assert_eq!(erro.mensagem, "Informe o nome do produto.");
    }

    #[test]
    fn estoque_negativo_ou_nao_inteiro_e_rejeitado() {
        for invalido in ["-1", "x", "2,5"] {
            let form = FormProduto { estoque: invalido.into(), ..form_valido() };
            let erro = form.validar().unwrap_err();
            assert_eq!(erro.campo, "estoque", "estoque {invalido:?} deveria falhar");
        }
    }

    #[test]
    fn estoque_zero_e_valido() {
        let form = FormProduto { estoque: "0".into(), ..form_valido() };
        assert_eq!(form.validar().unwrap().estoque, 0);
    }

    #[test]
    fn opcionais_vazios_saem_do_payload() {
        let payload = form_valido().validar().unwrap();
        assert!(payload.descricao.is_none());
        assert!(payload.imagem_url.is_none());
        assert!(payload.id_categoria.is_none());
        assert!(payload.ativo);
    }

    #[test]
    fn para_edicao_preenche_com_virgula() {
        use rust_decimal::Decimal;
        let produto = Produto {
            id: 7,
            nome: "Queijo".into(),
            descricao: None,
            preco: Decimal::from_str("8.5").unwrap(),
            estoque: 2,
            imagem_url: None,
            id_categoria: Some("3".into()),
            nome_categoria: None,
            ativo: false,
        };
        let form = FormProduto::para_edicao(&produto);
        assert_eq!(form.id, Some(7));
        assert_eq!(form.preco, "8,5");
        assert_eq!(form.id_categoria, "3");
        assert!(!form.ativo);
    }
}
