// src/console/filtros.rs

use crate::models::Produto;

// O valor do seletor de status: "", "ativo" ou "inativo".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FiltroStatus {
    #[default]
    Todos,
    Ativo,
    Inativo,
}

impl FiltroStatus {
    pub fn parse(valor: &str) -> Self {
        match valor.trim().to_lowercase().as_str() {
            "ativo" => FiltroStatus::Ativo,
            "inativo" => FiltroStatus::Inativo,
            _ => FiltroStatus::Todos,
        }
    }
}

// Estado vivo dos controles de filtro. Nunca é persistido.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FiltroProdutos {
    pub texto: String,
    // Id de categoria como valor de seletor; "" significa todas.
    pub categoria: String,
    pub status: FiltroStatus,
}

impl FiltroProdutos {
    pub fn limpar(&mut self) {
        *self = FiltroProdutos::default();
    }
}

// Conjunção dos três predicados sobre o snapshot em memória.
pub fn aplicar<'a>(produtos: &'a [Produto], filtro: &FiltroProdutos) -> Vec<&'a Produto> {
    produtos.iter().filter(|p| combina(p, filtro)).collect()
}

fn combina(produto: &Produto, filtro: &FiltroProdutos) -> bool {
    let busca = filtro.texto.trim().to_lowercase();
    if !busca.is_empty() {
        let nome = produto.nome.to_lowercase();
        let descricao = produto
            .descricao
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        if !nome.contains(&busca) && !descricao.contains(&busca) {
            return false;
        }
    }

    if !filtro.categoria.is_empty()
        && produto.id_categoria.as_deref() != Some(filtro.categoria.as_str())
    {
        return false;
    }

    match filtro.status {
        FiltroStatus::Todos => true,
        FiltroStatus::Ativo => produto.ativo,
        FiltroStatus::Inativo => !produto.ativo,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn produto(id: i64, nome: &str, descricao: Option<&str>, cat: Option<&str>, ativo: bool) -> Produto {
        Produto {
            id,
            nome: nome.to_string(),
            descricao: descricao.map(|d| d.to_string()),
            preco: Decimal::ZERO,
            estoque: 0,
            imagem_url: None,
            id_categoria: cat.map(|c| c.to_string()),
            nome_categoria: None,
            ativo,
        }
    }

    fn amostra() -> Vec<Produto> {
        vec![
            produto(1, "Bolo de rolo", Some("tradicional"), Some("1"), true),
            produto(2, "Queijo manteiga", None, Some("2"), true),
            produto(3, "Doce de leite", Some("pote 400g"), Some("1"), false),
        ]
    }

    #[test]
    fn sem_filtro_devolve_todos() {
        let produtos = amostra();
        assert_eq!(aplicar(&produtos, &FiltroProdutos::default()).len(), 3);
    }

    #[test]
    fn busca_cobre_nome_e_descricao_sem_caixa() {
        let produtos = amostra();
        let filtro = FiltroProdutos { texto: "BOLO".into(), ..Default::default() };
        assert_eq!(aplicar(&produtos, &filtro)[0].id, 1);

        let filtro = FiltroProdutos { texto: "400g".into(), ..Default::default() };
        assert_eq!(aplicar(&produtos, &filtro)[0].id, 3);
    }

    #[test]
    fn predicados_sao_conjuntivos() {
        let produtos = amostra();
        let filtro = FiltroProdutos {
            texto: "o".into(),
            categoria: "1".into(),
            status: FiltroStatus::Ativo,
        };
        let vistos = aplicar(&produtos, &filtro);
        assert_eq!(vistos.len(), 1);
        assert_eq!(vistos[0].id, 1);
    }

    #[test]
    fn categoria_exclui_produto_sem_categoria() {
        let mut produtos = amostra();
        produtos[1].id_categoria = None;
        let filtro = FiltroProdutos { categoria: "2".into(), ..Default::default() };
        assert!(aplicar(&produtos, &filtro).is_empty());
    }

    #[test]
    fn status_inativo_filtra() {
        let produtos = amostra();
        let filtro = FiltroProdutos { status: FiltroStatus::Inativo, ..Default::default() };
        let vistos = aplicar(&produtos, &filtro);
        assert_eq!(vistos.len(), 1);
        assert_eq!(vistos[0].id, 3);
    }

    #[test]
    fn filtro_sem_correspondencia_devolve_vazio() {
        let produtos = amostra();
        let filtro = FiltroProdutos { texto: "tapioca".into(), ..Default::default() };
        assert!(aplicar(&produtos, &filtro).is_empty());
    }
}
