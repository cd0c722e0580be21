// src/console/categorias.rs

use crate::models::Produto;

pub const ROTULO_TODAS: &str = "Todas as categorias";
pub const ROTULO_SELECIONE: &str = "Selecione uma categoria";

// Deriva o índice de categorias do snapshot carregado: pares (id, nome)
// distintos por id, na ordem em que aparecem na lista. Categoria sem nome
// ganha o rótulo sintetizado "Categoria {id}".
pub fn indice_categorias(produtos: &[Produto]) -> Vec<(String, String)> {
    let mut indice: Vec<(String, String)> = Vec::new();
    for produto in produtos {
        let Some(id) = produto.id_categoria.as_deref() else {
            continue;
        };
        if indice.iter().any(|(visto, _)| visto == id) {
            continue;
        }
        let nome = produto
            .nome_categoria
            .clone()
            .unwrap_or_else(|| format!("Categoria {id}"));
        indice.push((id.to_string(), nome));
    }
    indice
}

// Um seletor de categorias com sua opção padrão. O de filtro usa "Todas as
// categorias" (ausência de filtro); o do formulário usa um placeholder,
// porque "sem filtro" não é um atributo válido de produto.
#[derive(Debug, Clone)]
pub struct SeletorCategorias {
    rotulo_padrao: &'static str,
    opcoes: Vec<(String, String)>,
    selecionado: String,
}

impl SeletorCategorias {
    pub fn novo(rotulo_padrao: &'static str) -> Self {
        Self {
            rotulo_padrao,
            opcoes: Vec::new(),
            selecionado: String::new(),
        }
    }

    // Troca as opções preservando a seleção anterior se ela ainda existir;
    // senão volta para a opção padrão.
    pub fn repovoar(&mut self, opcoes: Vec<(String, String)>) {
        let anterior = std::mem::take(&mut self.selecionado);
        self.opcoes = opcoes;
        if !anterior.is_empty() && self.opcoes.iter().any(|(id, _)| *id == anterior) {
            self.selecionado = anterior;
        }
    }

    // Seleção vinda do usuário: só aceita a opção padrão ("") ou um id
    // presente nas opções atuais.
    pub fn selecionar(&mut self, valor: &str) -> bool {
        if valor.is_empty() || self.opcoes.iter().any(|(id, _)| id == valor) {
            self.selecionado = valor.to_string();
            true
        } else {
            false
        }
    }

    pub fn selecionado(&self) -> &str {
        &self.selecionado
    }

    pub fn opcoes(&self) -> &[(String, String)] {
        &self.opcoes
    }

    pub fn rotulo_padrao(&self) -> &'static str {
        self.rotulo_padrao
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn produto(id: i64, cat: Option<(&str, Option<&str>)>) -> Produto {
        let (id_categoria, nome_categoria) = match cat {
            Some((id, nome)) => (Some(id.to_string()), nome.map(|n| n.to_string())),
            None => (None, None),
        };
        Produto {
            id,
            nome: format!("Produto {id}"),
            descricao: None,
            preco: Decimal::ZERO,
            estoque: 0,
            imagem_url: None,
            id_categoria,
            nome_categoria,
            ativo: true,
        }
    }

    #[test]
    fn indice_distinto_na_ordem_de_chegada() {
        let produtos = vec![
            produto(1, Some(("9", Some("Doces")))),
            produto(2, Some(("4", Some("Queijos")))),
            produto(3, Some(("9", Some("Outro nome")))),
            produto(4, None),
        ];
        let indice = indice_categorias(&produtos);
        assert_eq!(
            indice,
            vec![
                ("9".to_string(), "Doces".to_string()),
                ("4".to_string(), "Queijos".to_string()),
            ]
        );
    }

    #[test]
    fn categoria_sem_nome_ganha_rotulo_sintetizado() {
        let produtos = vec![produto(1, Some(("7", None)))];
        assert_eq!(
            indice_categorias(&produtos),
            vec![("7".to_string(), "Categoria 7".to_string())]
        );
    }

    #[test]
    fn repovoar_preserva_selecao_ainda_valida() {
        let mut seletor = SeletorCategorias::novo(ROTULO_TODAS);
        seletor.repovoar(vec![("1".into(), "A".into()), ("2".into(), "B".into())]);
        assert!(seletor.selecionar("2"));

        seletor.repovoar(vec![("2".into(), "B".into()), ("3".into(), "C".into())]);
        assert_eq!(seletor.selecionado(), "2");
    }

    #[test]
    fn repovoar_reseta_selecao_que_sumiu() {
        let mut seletor = SeletorCategorias::novo(ROTULO_SELECIONE);
        seletor.repovoar(vec![("1".into(), "A".into())]);
        assert!(seletor.selecionar("1"));

        seletor.repovoar(vec![("5".into(), "E".into())]);
        assert_eq!(seletor.selecionado(), "");
    }

    #[test]
    fn selecionar_rejeita_valor_fora_das_opcoes() {
        let mut seletor = SeletorCategorias::novo(ROTULO_TODAS);
        seletor.repovoar(vec![("1".into(), "A".into())]);
        assert!(!seletor.selecionar("99"));
        assert_eq!(seletor.selecionado(), "");
        assert!(seletor.selecionar(""));
    }
}
