// src/console/controller.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::api::CatalogoRemoto;
use crate::common::{AppError, Cancelamento, Diagnostico};
use crate::config::AppConfig;
use crate::console::categorias::{indice_categorias, SeletorCategorias, ROTULO_SELECIONE, ROTULO_TODAS};
use crate::console::filtros::{self, FiltroProdutos, FiltroStatus};
use crate::console::form::FormProduto;
use crate::console::render::{linha_de, Confirmacao, LinhaProduto, TomAlerta, VisaoConsole};
use crate::models::{Loja, LojaWire, Produto, ProdutoWire};

// Guarda de laço do carregador: detecta reinvocação desenfreada vinda de
// outros fluxos religando o bootstrap da página. Mais de `max_chamadas`
// invocações com a última folga abaixo de `janela` pula a rede e vira
// diagnóstico. Limiares herdados do comportamento original (6 / 4000ms).
pub struct GuardaChamadas {
    max_chamadas: u32,
    janela: Duration,
    chamadas: u32,
    ultima: Option<Instant>,
}

impl GuardaChamadas {
    pub fn new(max_chamadas: u32, janela: Duration) -> Self {
        Self { max_chamadas, janela, chamadas: 0, ultima: None }
    }

    pub fn chamadas(&self) -> u32 {
        self.chamadas
    }

    pub fn registrar(&mut self) -> bool {
        self.registrar_em(Instant::now())
    }

    fn registrar_em(&mut self, agora: Instant) -> bool {
        self.chamadas += 1;
        if self.chamadas > self.max_chamadas {
            if let Some(ultima) = self.ultima {
                if agora.duration_since(ultima) < self.janela {
                    // Bloqueada: não avança o relógio, para a folga curta
                    // continuar visível nas próximas tentativas.
                    return false;
                }
            }
        }
        self.ultima = Some(agora);
        true
    }
}

// O controlador da página "meus produtos": dono do snapshot em memória,
// dos seletores e do despacho de ações. Construído uma vez por carga de
// página, com as capacidades (API, visão, confirmação) injetadas.
pub struct ConsoleProdutos {
    api: Arc<dyn CatalogoRemoto>,
    visao: Box<dyn VisaoConsole>,
    confirmacao: Box<dyn Confirmacao>,
    config: AppConfig,
    cancel: Cancelamento,
    token: String,
    loja: Option<Loja>,
    produtos: Vec<Produto>,
    guarda: GuardaChamadas,
    filtro: FiltroProdutos,
    seletor_filtro: SeletorCategorias,
    seletor_form: SeletorCategorias,
}

impl ConsoleProdutos {
    pub fn new(
        api: Arc<dyn CatalogoRemoto>,
        visao: Box<dyn VisaoConsole>,
        confirmacao: Box<dyn Confirmacao>,
        token: String,
        config: AppConfig,
        cancel: Cancelamento,
    ) -> Self {
        let guarda = GuardaChamadas::new(config.guarda_max_chamadas, config.guarda_janela);
        Self {
            api,
            visao,
            confirmacao,
            config,
            cancel,
            token,
            loja: None,
            produtos: Vec::new(),
            guarda,
            filtro: FiltroProdutos::default(),
            seletor_filtro: SeletorCategorias::novo(ROTULO_TODAS),
            seletor_form: SeletorCategorias::novo(ROTULO_SELECIONE),
        }
    }

    pub fn produtos(&self) -> &[Produto] {
        &self.produtos
    }

    pub fn loja(&self) -> Option<&Loja> {
        self.loja.as_ref()
    }

    pub fn seletor_form(&self) -> &SeletorCategorias {
        &self.seletor_form
    }

    // --- Carregador de catálogo ---
    pub async fn carregar_produtos(&mut self) {
        if !self.guarda.registrar() {
            let diag = Diagnostico::novo("anti-loop")
                .com_mensagem(format!(
                    "carregar_produtos() está sendo chamado repetidamente (laço): {} chamadas.",
                    self.guarda.chamadas()
                ))
                .com_dica(
                    "Procure outro fluxo reinvocando o bootstrap da página \
                     (layout, includes ou inicialização duplicada).",
                );
            diag.registrar();
            self.visao.diagnostico(&diag);
            return;
        }

        self.visao.carregando(&format!(
            "Carregando produtos... (chamada #{})",
            self.guarda.chamadas()
        ));

        let resposta = match self.api.minha_loja(&self.token, &self.cancel).await {
            Ok(resposta) => resposta,
            Err(AppError::Cancelada) => return,
            Err(err) => {
                self.visao.alerta(&err.mensagem_usuario(), TomAlerta::Erro);
                let diag = Diagnostico::novo("carregar_produtos catch")
                    .com_mensagem(err.to_string());
                diag.registrar();
                self.visao.diagnostico(&diag);
                return;
            }
        };

        if !resposta.ok {
            let mensagem = resposta
                .mensagem()
                .unwrap_or_else(|| format!("Erro HTTP {} ao carregar produtos.", resposta.status));
            self.visao.alerta(
                &format!("{mensagem} (URL: {})", resposta.url),
                TomAlerta::Erro,
            );
            let diag = Diagnostico::novo("carregar_produtos")
                .com_url(resposta.url.clone())
                .com_status(resposta.status)
                .com_headers(resposta.headers.clone())
                .com_corpo(resposta.corpo.clone());
            diag.registrar();
            self.visao.diagnostico(&diag);
            return;
        }

        // Validação de forma: loja ausente é aviso, produtos fora de
        // formato é fatal para esta carga.
        let loja_valor = resposta.corpo.get("loja").filter(|l| l.is_object());
        if loja_valor.is_none() {
            let diag = Diagnostico::novo("carregar_produtos - schema")
                .com_mensagem("Resposta OK, mas campo 'loja' veio nulo/ausente.")
                .com_corpo(resposta.corpo.clone());
            diag.registrar();
            self.visao.diagnostico(&diag);
        }

        let Some(lista) = resposta.corpo.get("produtos").and_then(|p| p.as_array()) else {
            let diag = Diagnostico::novo("carregar_produtos - schema")
                .com_mensagem("Resposta OK, mas 'produtos' não é um array.")
                .com_corpo(resposta.corpo.clone());
            diag.registrar();
            self.visao.diagnostico(&diag);
            return;
        };

        self.loja = loja_valor
            .and_then(|l| serde_json::from_value::<LojaWire>(l.clone()).ok())
            .map(LojaWire::normalizar);
        self.produtos = normalizar_lista(lista);

        if self.produtos.is_empty() {
            self.visao.contagem("(nenhum produto cadastrado ainda)");
        } else {
            self.visao
                .contagem(&format!("({} produto(s))", self.produtos.len()));
        }

        self.reconstruir_categorias();

        if self.produtos.is_empty() {
            let nome_loja = self
                .loja
                .as_ref()
                .map(|l| l.nome.clone())
                .unwrap_or_else(|| "sem nome".to_string());
            self.visao.lista_vazia();
            self.visao.alerta(
                &format!("Sua loja ({nome_loja}) ainda não tem produtos cadastrados."),
                TomAlerta::Info,
            );
            return;
        }

        self.renderizar();
        self.visao.limpar_alerta();
    }

    fn reconstruir_categorias(&mut self) {
        let indice = indice_categorias(&self.produtos);
        self.seletor_filtro.repovoar(indice.clone());
        self.seletor_form.repovoar(indice);
        // A seleção de filtro pode ter sido resetada junto com as opções.
        self.filtro.categoria = self.seletor_filtro.selecionado().to_string();
        self.visao
            .seletores_categorias(&self.seletor_filtro, &self.seletor_form);
    }

    fn renderizar(&mut self) {
        let visiveis = filtros::aplicar(&self.produtos, &self.filtro);
        if visiveis.is_empty() {
            self.visao.sem_resultados();
            return;
        }
        let linhas: Vec<LinhaProduto> = visiveis.into_iter().map(linha_de).collect();
        self.visao.lista(&linhas);
    }

    // --- Controles de filtro ---
    pub fn definir_busca(&mut self, texto: &str) {
        self.filtro.texto = texto.to_string();
        self.renderizar();
    }

    pub fn definir_categoria(&mut self, valor: &str) {
        if self.seletor_filtro.selecionar(valor) {
            self.filtro.categoria = self.seletor_filtro.selecionado().to_string();
            self.renderizar();
        }
    }

    pub fn definir_status(&mut self, valor: &str) {
        self.filtro.status = FiltroStatus::parse(valor);
        self.renderizar();
    }

    pub fn limpar_filtros(&mut self) {
        self.filtro.limpar();
        self.seletor_filtro.selecionar("");
        self.renderizar();
    }

    // --- Formulário (criação/edição) ---
    pub fn abrir_novo(&mut self) {
        self.seletor_form.selecionar("");
        self.visao.abrir_formulario("Novo produto", &FormProduto::default());
    }

    pub fn abrir_edicao(&mut self, id: i64) {
        let Some(produto) = self.produtos.iter().find(|p| p.id == id) else {
            return;
        };
        let form = FormProduto::para_edicao(produto);
        self.seletor_form.selecionar(&form.id_categoria);
        self.visao.abrir_formulario("Editar produto", &form);
    }

    pub async fn submeter(&mut self, form: FormProduto) {
        let payload = match form.validar() {
            Ok(payload) => payload,
            Err(erro) => {
                self.visao.erro_formulario(erro.campo, &erro.mensagem);
                return;
            }
        };

        let edicao = form.id;
        let metodo = if edicao.is_some() { "PUT" } else { "POST" };
        let resultado = match edicao {
            Some(id) => {
                self.api
                    .atualizar_produto(&self.token, id, &payload, &self.cancel)
                    .await
            }
            None => self.api.criar_produto(&self.token, &payload, &self.cancel).await,
        };

        let resposta = match resultado {
            Ok(resposta) => resposta,
            Err(AppError::Cancelada) => return,
            Err(err) => {
                self.visao
                    .erro_formulario("geral", "Erro de conexão com o servidor.");
                let diag = Diagnostico::novo("submeter_produto catch")
                    .com_metodo(metodo)
                    .com_mensagem(err.to_string())
                    .com_payload(payload_como_valor(&payload));
                diag.registrar();
                self.visao.diagnostico(&diag);
                return;
            }
        };

        if !resposta.ok {
            let acao = if edicao.is_some() { "atualizar" } else { "cadastrar" };
            let mensagem = resposta.mensagem().unwrap_or_else(|| {
                format!("Erro HTTP {} ao {acao} produto.", resposta.status)
            });
            self.visao.erro_formulario("geral", &mensagem);
            let diag = Diagnostico::novo("submeter_produto")
                .com_url(resposta.url.clone())
                .com_metodo(metodo)
                .com_status(resposta.status)
                .com_headers(resposta.headers.clone())
                .com_corpo(resposta.corpo.clone())
                .com_payload(payload_como_valor(&payload));
            diag.registrar();
            self.visao.diagnostico(&diag);
            return;
        }

        let mensagem = if edicao.is_some() {
            "Produto atualizado com sucesso!"
        } else {
            "Produto cadastrado com sucesso!"
        };
        self.visao.sucesso_formulario(mensagem);

        // Deixa a mensagem visível antes de fechar, como o modal original.
        tokio::time::sleep(self.config.atraso_fechar_form).await;
        self.visao.fechar_formulario();

        // Correção acima de latência: recarrega tudo em vez de remendar o
        // snapshot localmente.
        self.carregar_produtos().await;
    }

    // --- Remoção ---
    pub async fn remover(&mut self, id: i64) {
        if !self
            .confirmacao
            .confirmar("Tem certeza que deseja remover este produto?")
        {
            return;
        }

        let resposta = match self.api.remover_produto(&self.token, id, &self.cancel).await {
            Ok(resposta) => resposta,
            Err(AppError::Cancelada) => return,
            Err(err) => {
                self.visao
                    .alerta("Erro de conexão ao remover produto.", TomAlerta::Erro);
                let diag = Diagnostico::novo("remover_produto catch")
                    .com_mensagem(err.to_string());
                diag.registrar();
                self.visao.diagnostico(&diag);
                return;
            }
        };

        if !resposta.ok {
            let mensagem = resposta
                .mensagem()
                .unwrap_or_else(|| format!("Erro HTTP {} ao remover produto.", resposta.status));
            self.visao.alerta(&mensagem, TomAlerta::Erro);
            let diag = Diagnostico::novo("remover_produto")
                .com_url(resposta.url.clone())
                .com_status(resposta.status)
                .com_corpo(resposta.corpo.clone());
            diag.registrar();
            self.visao.diagnostico(&diag);
            return;
        }

        // O único remendo otimista: o efeito de um delete é simples e
        // idempotente de rederivar, então não vale um reload inteiro.
        self.produtos.retain(|p| p.id != id);
        self.renderizar();
    }
}

fn normalizar_lista(valores: &[Value]) -> Vec<Produto> {
    let mut produtos = Vec::with_capacity(valores.len());
    for valor in valores {
        match serde_json::from_value::<ProdutoWire>(valor.clone()) {
            Ok(wire) => match wire.normalizar() {
                Some(produto) => produtos.push(produto),
                None => tracing::warn!("Produto sem id legível descartado: {valor}"),
            },
            Err(err) => {
                tracing::warn!("Produto fora do formato descartado ({err}): {valor}");
            }
        }
    }
    produtos
}

fn payload_como_valor(payload: &crate::models::ProdutoPayload) -> Value {
    serde_json::to_value(payload).unwrap_or(Value::Null)
}
