// src/console/render.rs

use crate::common::Diagnostico;
use crate::console::categorias::SeletorCategorias;
use crate::console::form::FormProduto;
use crate::models::Produto;

// Uma linha pronta para exibição, com os campos já formatados. O
// controlador monta as linhas; a visão só desenha.
#[derive(Debug, Clone, PartialEq)]
pub struct LinhaProduto {
    pub id: i64,
    pub nome: String,
    pub categoria: Option<String>,
    pub descricao: Option<String>,
    // "R$ 19,90"
    pub preco: String,
    // "3 unid."
    pub estoque: String,
    pub status: &'static str,
    pub imagem_url: Option<String>,
}

pub fn linha_de(produto: &Produto) -> LinhaProduto {
    LinhaProduto {
        id: produto.id,
        nome: produto.nome.clone(),
        categoria: produto.nome_categoria.clone(),
        descricao: produto.descricao.clone(),
        preco: format!("R$ {}", produto.preco_formatado()),
        estoque: format!("{} unid.", produto.estoque),
        status: if produto.ativo { "Ativo" } else { "Inativo" },
        imagem_url: produto.imagem_url.clone(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TomAlerta {
    Info,
    Aviso,
    Erro,
}

// As regiões de tela que o console atualiza. O binário de terminal
// implementa isto com prints; os testes, com um gravador de eventos.
pub trait VisaoConsole: Send {
    // Estado de carregamento, distinto do vazio e do erro.
    fn carregando(&mut self, mensagem: &str);
    // Nenhum produto cadastrado (pós-load bem-sucedido e vazio).
    fn lista_vazia(&mut self);
    // Filtros ativos sem correspondência — não confundir com lista_vazia.
    fn sem_resultados(&mut self);
    fn lista(&mut self, linhas: &[LinhaProduto]);
    // O "(N produto(s))" ao lado do título.
    fn contagem(&mut self, rotulo: &str);
    fn alerta(&mut self, mensagem: &str, tom: TomAlerta);
    fn limpar_alerta(&mut self);
    // Painel estruturado de suporte, separado da mensagem amigável.
    fn diagnostico(&mut self, diag: &Diagnostico);
    fn seletores_categorias(&mut self, filtro: &SeletorCategorias, formulario: &SeletorCategorias);
    fn abrir_formulario(&mut self, titulo: &str, form: &FormProduto);
    fn fechar_formulario(&mut self);
    fn erro_formulario(&mut self, campo: &str, mensagem: &str);
    fn sucesso_formulario(&mut self, mensagem: &str);
}

// Confirmação explícita antes de ações destrutivas (o window.confirm).
pub trait Confirmacao: Send {
    fn confirmar(&mut self, pergunta: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn linha_formata_preco_estoque_e_status() {
        let produto = Produto {
            id: 10,
            nome: "Bolo de rolo".into(),
            descricao: Some("tradicional".into()),
            preco: Decimal::from_str("19.9").unwrap(),
            estoque: 3,
            imagem_url: None,
            id_categoria: Some("1".into()),
            nome_categoria: Some("Doces".into()),
            ativo: true,
        };
        let linha = linha_de(&produto);
        assert_eq!(linha.preco, "R$ 19,90");
        assert_eq!(linha.estoque, "3 unid.");
        assert_eq!(linha.status, "Ativo");
        assert_eq!(linha.categoria.as_deref(), Some("Doces"));
    }
}
