// src/loja/pagina.rs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::api::CatalogoRemoto;
use crate::common::{AppError, Cancelamento};
use crate::models::{ItemCarrinho, Loja, LojaWire, Produto, ProdutoWire};

// O subsistema de carrinho é um colaborador externo; a página só conhece
// esta capacidade, entregue (ou não) na construção.
#[async_trait]
pub trait Carrinho: Send + Sync {
    async fn adicionar(&self, item: ItemCarrinho);
}

// Vitrine da loja no topo da página.
#[derive(Debug, Clone, PartialEq)]
pub struct HeroLoja {
    pub nome: String,
    pub descricao: String,
    pub telefone: String,
    pub endereco: Option<String>,
    pub logo: String,
}

// Um card do grid público, já formatado.
#[derive(Debug, Clone, PartialEq)]
pub struct CardProduto {
    pub id: i64,
    pub nome: String,
    pub descricao: String,
    pub preco: String,
    pub imagem: Option<String>,
}

pub trait VisaoLoja: Send {
    fn loja_nao_informada(&mut self);
    fn hero_carregando(&mut self);
    fn hero(&mut self, hero: &HeroLoja);
    fn hero_erro(&mut self, mensagem: &str);
    fn produtos_carregando(&mut self);
    fn produtos_erro(&mut self, mensagem: &str);
    fn produtos_vazio(&mut self);
    fn contagem(&mut self, rotulo: &str);
    fn cards(&mut self, cards: &[CardProduto]);
    fn navegar(&mut self, destino: &str);
}

// Controladora da página pública de uma loja: vitrine + grid + despacho
// de carrinho. O estado vive aqui, não em globais.
pub struct PaginaLoja {
    api: Arc<dyn CatalogoRemoto>,
    visao: Box<dyn VisaoLoja>,
    carrinho: Option<Arc<dyn Carrinho>>,
    origem: String,
    cancel: Cancelamento,
    loja: Option<Loja>,
    produtos: HashMap<i64, Produto>,
}

impl PaginaLoja {
    pub fn new(
        api: Arc<dyn CatalogoRemoto>,
        visao: Box<dyn VisaoLoja>,
        carrinho: Option<Arc<dyn Carrinho>>,
        origem: String,
        cancel: Cancelamento,
    ) -> Self {
        Self {
            api,
            visao,
            carrinho,
            origem,
            cancel,
            loja: None,
            produtos: HashMap::new(),
        }
    }

    pub fn loja(&self) -> Option<&Loja> {
        self.loja.as_ref()
    }

    pub async fn abrir(&mut self, loja_id: Option<i64>) {
        let Some(id) = loja_id else {
            self.visao.loja_nao_informada();
            return;
        };
        // A vitrine falhar não impede a lista de produtos.
        self.carregar_loja(id).await;
        self.carregar_produtos(id).await;
    }

    async fn carregar_loja(&mut self, id: i64) {
        self.visao.hero_carregando();
        let resposta = match self.api.loja_publica(id, &self.cancel).await {
            Ok(resposta) => resposta,
            Err(AppError::Cancelada) => return,
            Err(err) => {
                tracing::error!("Erro de conexão ao carregar loja {id}: {err}");
                self.visao.hero_erro("Erro de conexão ao carregar loja.");
                return;
            }
        };

        if !resposta.ok {
            self.visao.hero_erro("Erro ao carregar loja.");
            return;
        }

        let loja = serde_json::from_value::<LojaWire>(resposta.corpo.clone())
            .unwrap_or_default()
            .normalizar();

        let hero = HeroLoja {
            nome: loja.nome.clone(),
            descricao: loja
                .descricao
                .clone()
                .unwrap_or_else(|| "Loja parceira do SeridóHub.".to_string()),
            telefone: loja
                .telefone
                .clone()
                .unwrap_or_else(|| "Telefone não informado".to_string()),
            endereco: loja.endereco.clone(),
            logo: loja.logo_resolvido(&self.origem),
        };
        self.loja = Some(loja);
        self.visao.hero(&hero);
    }

    async fn carregar_produtos(&mut self, id: i64) {
        self.visao.produtos_carregando();
        let resposta = match self.api.produtos_da_loja(id, &self.cancel).await {
            Ok(resposta) => resposta,
            Err(AppError::Cancelada) => return,
            Err(err) => {
                tracing::error!("Erro de conexão ao carregar produtos da loja {id}: {err}");
                self.visao.produtos_erro("Erro de conexão ao carregar produtos.");
                return;
            }
        };

        if !resposta.ok {
            self.visao.produtos_erro("Erro ao carregar produtos.");
            return;
        }

        let lista = resposta.corpo.as_array().cloned().unwrap_or_default();
        if lista.is_empty() {
            if !resposta.corpo.is_array() {
                tracing::warn!("Lista pública veio fora de formato: {}", resposta.corpo);
            }
            self.produtos.clear();
            self.visao.produtos_vazio();
            self.visao.contagem("0 produto(s)");
            return;
        }

        self.produtos.clear();
        let mut cards = Vec::new();
        for valor in &lista {
            let Ok(wire) = serde_json::from_value::<ProdutoWire>(valor.clone()) else {
                tracing::warn!("Produto público fora de formato descartado: {valor}");
                continue;
            };
            let Some(produto) = wire.normalizar() else {
                tracing::warn!("Produto público sem id legível descartado: {valor}");
                continue;
            };
            cards.push(card_de(&produto));
            self.produtos.insert(produto.id, produto);
        }

        self.visao.contagem(&format!("{} produto(s)", cards.len()));
        self.visao.cards(&cards);
    }

    // Entrega o item à capacidade de carrinho. Ausência da capacidade é
    // logada, nunca um estouro.
    pub async fn adicionar_ao_carrinho(&mut self, id: i64) -> bool {
        let Some(produto) = self.produtos.get(&id) else {
            return false;
        };
        let item = self.item_de(produto);
        match &self.carrinho {
            Some(carrinho) => {
                carrinho.adicionar(item).await;
                true
            }
            None => {
                tracing::error!("addToCart indisponível: o subsistema de carrinho não está conectado.");
                false
            }
        }
    }

    pub async fn comprar_agora(&mut self, id: i64) {
        if !self.produtos.contains_key(&id) {
            return;
        }
        self.adicionar_ao_carrinho(id).await;
        self.visao.navegar("carrinho.html");
    }

    fn item_de(&self, produto: &Produto) -> ItemCarrinho {
        ItemCarrinho {
            id: produto.id,
            nome: if produto.nome.trim().is_empty() {
                "Produto".to_string()
            } else {
                produto.nome.clone()
            },
            preco: produto.preco,
            imagem_url: produto.imagem_url.clone(),
            loja_id: self.loja.as_ref().and_then(|l| l.id),
            loja_nome: self
                .loja
                .as_ref()
                .map(|l| l.nome.clone())
                .unwrap_or_default(),
            quantidade: 1,
        }
    }
}

fn card_de(produto: &Produto) -> CardProduto {
    CardProduto {
        id: produto.id,
        nome: if produto.nome.trim().is_empty() {
            "Produto".to_string()
        } else {
            produto.nome.clone()
        },
        descricao: produto
            .descricao
            .clone()
            .unwrap_or_else(|| "Sem descrição.".to_string()),
        preco: format!("R$ {}", produto.preco_formatado()),
        imagem: produto.imagem_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RespostaApi;
    use crate::models::ProdutoPayload;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    fn resposta(status: u16, corpo: Value) -> RespostaApi {
        RespostaApi {
            url: "http://teste/api".into(),
            status,
            ok: (200..300).contains(&status),
            headers: HashMap::new(),
            corpo,
        }
    }

    #[derive(Default)]
    struct ApiPublicaFalsa {
        loja: Mutex<Option<RespostaApi>>,
        produtos: Mutex<Option<RespostaApi>>,
        chamadas: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl CatalogoRemoto for ApiPublicaFalsa {
        async fn minha_loja(&self, _t: &str, _c: &Cancelamento) -> Result<RespostaApi, AppError> {
            unreachable!("página pública não usa minha-loja")
        }
        async fn criar_produto(
            &self,
            _t: &str,
            _p: &ProdutoPayload,
            _c: &Cancelamento,
        ) -> Result<RespostaApi, AppError> {
            unreachable!()
        }
        async fn atualizar_produto(
            &self,
            _t: &str,
            _id: i64,
            _p: &ProdutoPayload,
            _c: &Cancelamento,
        ) -> Result<RespostaApi, AppError> {
            unreachable!()
        }
        async fn remover_produto(
            &self,
            _t: &str,
            _id: i64,
            _c: &Cancelamento,
        ) -> Result<RespostaApi, AppError> {
            unreachable!()
        }
        async fn loja_publica(&self, _id: i64, _c: &Cancelamento) -> Result<RespostaApi, AppError> {
            self.chamadas.lock().unwrap().push("loja");
            Ok(self
                .loja
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| resposta(200, json!({"id": 1, "nome": "Mercearia"}))))
        }
        async fn produtos_da_loja(
            &self,
            _id: i64,
            _c: &Cancelamento,
        ) -> Result<RespostaApi, AppError> {
            self.chamadas.lock().unwrap().push("produtos");
            Ok(self
                .produtos
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| resposta(200, json!([]))))
        }
    }

    #[derive(Default)]
    struct EstadoVisaoLoja {
        eventos: Vec<&'static str>,
        hero: Option<HeroLoja>,
        cards: Vec<CardProduto>,
        contagem: Option<String>,
        destino: Option<String>,
    }

    #[derive(Clone, Default)]
    struct VisaoLojaGravada(Arc<Mutex<EstadoVisaoLoja>>);

    impl VisaoLojaGravada {
        fn estado(&self) -> std::sync::MutexGuard<'_, EstadoVisaoLoja> {
            self.0.lock().unwrap()
        }
    }

    impl VisaoLoja for VisaoLojaGravada {
        fn loja_nao_informada(&mut self) {
            self.estado().eventos.push("nao_informada");
        }
        fn hero_carregando(&mut self) {
            self.estado().eventos.push("hero_carregando");
        }
        fn hero(&mut self, hero: &HeroLoja) {
            let mut estado = self.estado();
            estado.eventos.push("hero");
            estado.hero = Some(hero.clone());
        }
        fn hero_erro(&mut self, _m: &str) {
            self.estado().eventos.push("hero_erro");
        }
        fn produtos_carregando(&mut self) {
            self.estado().eventos.push("produtos_carregando");
        }
        fn produtos_erro(&mut self, _m: &str) {
            self.estado().eventos.push("produtos_erro");
        }
        fn produtos_vazio(&mut self) {
            self.estado().eventos.push("produtos_vazio");
        }
        fn contagem(&mut self, rotulo: &str) {
            self.estado().contagem = Some(rotulo.to_string());
        }
        fn cards(&mut self, cards: &[CardProduto]) {
            let mut estado = self.estado();
            estado.eventos.push("cards");
            estado.cards = cards.to_vec();
        }
        fn navegar(&mut self, destino: &str) {
            self.estado().destino = Some(destino.to_string());
        }
    }

    #[derive(Default)]
    struct CarrinhoGravado(Mutex<Vec<ItemCarrinho>>);

    #[async_trait]
    impl Carrinho for CarrinhoGravado {
        async fn adicionar(&self, item: ItemCarrinho) {
            self.0.lock().unwrap().push(item);
        }
    }

    fn montar(
        api: Arc<ApiPublicaFalsa>,
        carrinho: Option<Arc<CarrinhoGravado>>,
    ) -> (PaginaLoja, VisaoLojaGravada) {
        let visao = VisaoLojaGravada::default();
        let pagina = PaginaLoja::new(
            api,
            Box::new(visao.clone()),
            carrinho.map(|c| c as Arc<dyn Carrinho>),
            "http://localhost:8080".into(),
            Cancelamento::nunca(),
        );
        (pagina, visao)
    }

    #[tokio::test]
    async fn sem_loja_id_nao_chama_a_rede() {
        let api = Arc::new(ApiPublicaFalsa::default());
        let (mut pagina, visao) = montar(api.clone(), None);

        pagina.abrir(None).await;

        assert_eq!(visao.estado().eventos, vec!["nao_informada"]);
        assert!(api.chamadas.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn abrir_renderiza_hero_e_cards() {
        let api = Arc::new(ApiPublicaFalsa::default());
        *api.produtos.lock().unwrap() = Some(resposta(
            200,
            json!([
                {"id": 1, "nome": "Bolo", "preco": 19.9, "imagem_url": "b.png"},
                {"id": 2, "preco": 5.0}
            ]),
        ));
        let (mut pagina, visao) = montar(api, None);

        pagina.abrir(Some(1)).await;

        let estado = visao.estado();
        let hero = estado.hero.as_ref().unwrap();
        assert_eq!(hero.nome, "Mercearia");
        assert_eq!(hero.descricao, "Loja parceira do SeridóHub.");
        assert_eq!(hero.telefone, "Telefone não informado");

        assert_eq!(estado.cards.len(), 2);
        assert_eq!(estado.cards[0].preco, "R$ 19,90");
        // Nome e descrição ausentes ganham os fallbacks do card.
        assert_eq!(estado.cards[1].nome, "Produto");
        assert_eq!(estado.cards[1].descricao, "Sem descrição.");
        assert_eq!(estado.contagem.as_deref(), Some("2 produto(s)"));
    }

    #[tokio::test]
    async fn lista_vazia_mostra_estado_proprio() {
        let api = Arc::new(ApiPublicaFalsa::default());
        let (mut pagina, visao) = montar(api, None);

        pagina.abrir(Some(1)).await;

        let estado = visao.estado();
        assert!(estado.eventos.contains(&"produtos_vazio"));
        assert_eq!(estado.contagem.as_deref(), Some("0 produto(s)"));
    }

    #[tokio::test]
    async fn falha_na_vitrine_nao_bloqueia_os_produtos() {
        let api = Arc::new(ApiPublicaFalsa::default());
        *api.loja.lock().unwrap() = Some(resposta(500, json!({})));
        *api.produtos.lock().unwrap() = Some(resposta(
            200,
            json!([{"id": 3, "nome": "Doce", "preco": 4.0}]),
        ));
        let (mut pagina, visao) = montar(api, None);

        pagina.abrir(Some(1)).await;

        let estado = visao.estado();
        assert!(estado.eventos.contains(&"hero_erro"));
        assert_eq!(estado.cards.len(), 1);
    }

    #[tokio::test]
    async fn adicionar_ao_carrinho_monta_o_item_com_a_loja() {
        let api = Arc::new(ApiPublicaFalsa::default());
        *api.produtos.lock().unwrap() = Some(resposta(
            200,
            json!([{"id": 1, "nome": "Bolo", "preco": 19.9, "imagemUrl": "b.png"}]),
        ));
        let carrinho = Arc::new(CarrinhoGravado::default());
        let (mut pagina, _) = montar(api, Some(carrinho.clone()));

        pagina.abrir(Some(1)).await;
        assert!(pagina.adicionar_ao_carrinho(1).await);

        let itens = carrinho.0.lock().unwrap();
        assert_eq!(itens.len(), 1);
        assert_eq!(itens[0].nome, "Bolo");
        assert_eq!(itens[0].loja_nome, "Mercearia");
        assert_eq!(itens[0].loja_id, Some(1));
        assert_eq!(itens[0].quantidade, 1);
    }

    #[tokio::test]
    async fn carrinho_ausente_nao_estoura() {
        let api = Arc::new(ApiPublicaFalsa::default());
        *api.produtos.lock().unwrap() = Some(resposta(
            200,
            json!([{"id": 1, "nome": "Bolo", "preco": 19.9}]),
        ));
        let (mut pagina, _) = montar(api, None);

        pagina.abrir(Some(1)).await;
        assert!(!pagina.adicionar_ao_carrinho(1).await);
    }

    #[tokio::test]
    async fn comprar_agora_adiciona_e_navega() {
        let api = Arc::new(ApiPublicaFalsa::default());
        *api.produtos.lock().unwrap() = Some(resposta(
            200,
            json!([{"id": 1, "nome": "Bolo", "preco": 19.9}]),
        ));
        let carrinho = Arc::new(CarrinhoGravado::default());
        let (mut pagina, visao) = montar(api, Some(carrinho.clone()));

        pagina.abrir(Some(1)).await;
        pagina.comprar_agora(1).await;

        assert_eq!(carrinho.0.lock().unwrap().len(), 1);
        assert_eq!(visao.estado().destino.as_deref(), Some("carrinho.html"));

        // Id desconhecido não navega.
        pagina.comprar_agora(99).await;
        assert_eq!(carrinho.0.lock().unwrap().len(), 1);
    }
}
