// src/main.rs
//
// O console de terminal do SeridóHub: a página "meus produtos" do vendedor
// e a página pública de uma loja, dirigidas por linha de comando. As
// controladoras vivem na lib; aqui ficam só as visões de terminal e o
// laço de comandos.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use clap::{Parser, Subcommand};

use seridohub::api::{ApiLoja, HttpCliente};
use seridohub::common::{cancel, Cancelamento, Diagnostico};
use seridohub::config::AppConfig;
use seridohub::console::{
    ConsoleProdutos, Confirmacao, FormProduto, LinhaProduto, SeletorCategorias, TomAlerta,
    VisaoConsole,
};
use seridohub::layout::{
    carregar_layout, logout, sincronizar_header, ChromeHeader, ChromeLayout, EstadoHeader,
};
use seridohub::loja::{CardProduto, Carrinho, HeroLoja, PaginaLoja, VisaoLoja};
use seridohub::models::{ItemCarrinho, TipoUsuario};
use seridohub::session::ArquivoSessao;

#[derive(Parser)]
#[command(author, version, about = "Console do storefront SeridóHub")]
struct Cli {
    /// Base da API de negócio (sobrepõe API_BASE_URL)
    #[arg(long)]
    api: Option<String>,

    /// Arquivo de sessão (sobrepõe SESSAO_PATH)
    #[arg(long)]
    sessao: Option<String>,

    #[command(subcommand)]
    comando: Option<Comando>,
}

#[derive(Subcommand)]
enum Comando {
    /// Console de produtos do vendedor (padrão)
    Produtos,
    /// Página pública de uma loja
    Loja {
        /// Id da loja
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    let cli = Cli::parse();
    let mut config = AppConfig::new()?;
    if let Some(api) = cli.api {
        config.api_base_url = api;
    }
    if let Some(sessao) = cli.sessao {
        config.sessao_path = sessao;
    }

    // Teardown da "página": ctrl-c cancela toda operação em voo.
    let (gatilho, cancelamento) = cancel::novo_par();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            gatilho.cancelar();
        }
    });

    match cli.comando.unwrap_or(Comando::Produtos) {
        Comando::Produtos => console_produtos(config, cancelamento).await,
        Comando::Loja { id } => pagina_loja(config, cancelamento, id).await,
    }
}

// --- Página "meus produtos" ---

async fn console_produtos(config: AppConfig, cancelamento: Cancelamento) -> anyhow::Result<()> {
    let mut store = ArquivoSessao::abrir(&config.sessao_path);
    let mut chrome = ChromeTerminal;

    // Chrome compartilhado primeiro, como no bootstrap da página.
    let http = HttpCliente::new(config.timeout_http);
    carregar_layout(
        &http,
        &config.site_base_url,
        "meus_produtos.html",
        &mut chrome,
        &cancelamento,
    )
    .await;

    let sessao = sincronizar_header(&mut store, &mut chrome);

    // Portão de acesso do vendedor.
    let Some(sessao) = sessao else {
        println!("Você precisa estar logado para acessar esta página.");
        println!("(faça login pelo site e rode o console de novo)");
        return Ok(());
    };
    if sessao.usuario.tipo != TipoUsuario::Vendedor {
        println!("Apenas usuários do tipo Vendedor podem gerenciar produtos.");
        return Ok(());
    }

    let visao = VisaoTerminal::default();
    let api = Arc::new(ApiLoja::new(&config));
    let mut console = ConsoleProdutos::new(
        api,
        Box::new(visao.clone()),
        Box::new(ConfirmaTerminal),
        sessao.token.clone(),
        config.clone(),
        cancelamento.clone(),
    );

    console.carregar_produtos().await;
    imprimir_ajuda();

    let stdin = io::stdin();
    loop {
        if cancelamento.cancelado() {
            break;
        }
        print!("> ");
        io::stdout().flush()?;

        let mut linha = String::new();
        if stdin.lock().read_line(&mut linha)? == 0 {
            break;
        }
        let linha = linha.trim();
        let (comando, resto) = linha.split_once(' ').unwrap_or((linha, ""));

        match comando {
            "" => {}
            "sair" => break,
            "ajuda" => imprimir_ajuda(),
            "recarregar" => {
                carregar_layout(
                    &http,
                    &config.site_base_url,
                    "meus_produtos.html",
                    &mut chrome,
                    &cancelamento,
                )
                .await;
                console.carregar_produtos().await;
            }
            "busca" => console.definir_busca(resto.trim()),
            "categoria" => console.definir_categoria(resto.trim()),
            "status" => console.definir_status(resto.trim()),
            "limpar" => console.limpar_filtros(),
            "novo" => {
                console.abrir_novo();
                if let Some(form) = visao.tomar_form() {
                    let form = preencher_form(form, console.seletor_form())?;
                    console.submeter(form).await;
                }
            }
            "editar" => match resto.trim().parse::<i64>() {
                Ok(id) => {
                    console.abrir_edicao(id);
                    match visao.tomar_form() {
                        Some(form) => {
                            let form = preencher_form(form, console.seletor_form())?;
                            console.submeter(form).await;
                        }
                        None => println!("Produto {id} não está na lista."),
                    }
                }
                Err(_) => println!("Uso: editar <id>"),
            },
            "remover" => match resto.trim().parse::<i64>() {
                Ok(id) => console.remover(id).await,
                Err(_) => println!("Uso: remover <id>"),
            },
            "logout" => {
                logout(&mut store, &mut chrome);
                break;
            }
            outro => println!("Comando desconhecido: {outro} (tente 'ajuda')"),
        }
    }

    Ok(())
}

fn imprimir_ajuda() {
    println!("Comandos: busca <texto> · categoria <id> · status <ativo|inativo> · limpar");
    println!("          novo · editar <id> · remover <id> · recarregar · logout · sair");
}

// Edição campo a campo; Enter mantém o valor atual entre colchetes.
fn preencher_form(mut form: FormProduto, seletor: &SeletorCategorias) -> io::Result<FormProduto> {
    form.nome = pergunta("Nome", &form.nome)?;
    form.descricao = pergunta("Descrição", &form.descricao)?;
    form.preco = pergunta("Preço (ex.: 19,90)", &form.preco)?;
    form.estoque = pergunta("Estoque", &form.estoque)?;

    if !seletor.opcoes().is_empty() {
        let opcoes: Vec<String> = seletor
            .opcoes()
            .iter()
            .map(|(id, nome)| format!("{id}={nome}"))
            .collect();
        println!("  Categorias: {}", opcoes.join(" · "));
    }
    form.id_categoria = pergunta("Categoria (id, vazio = nenhuma)", &form.id_categoria)?;
    form.imagem_url = pergunta("URL da imagem", &form.imagem_url)?;
    form.ativo = pergunta_sim_nao("Ativo", form.ativo)?;
    Ok(form)
}

fn pergunta(rotulo: &str, atual: &str) -> io::Result<String> {
    print!("  {rotulo} [{atual}]: ");
    io::stdout().flush()?;
    let mut linha = String::new();
    io::stdin().lock().read_line(&mut linha)?;
    let linha = linha.trim();
    Ok(if linha.is_empty() {
        atual.to_string()
    } else {
        linha.to_string()
    })
}

fn pergunta_sim_nao(rotulo: &str, atual: bool) -> io::Result<bool> {
    let padrao = if atual { "S/n" } else { "s/N" };
    print!("  {rotulo} [{padrao}]: ");
    io::stdout().flush()?;
    let mut linha = String::new();
    io::stdin().lock().read_line(&mut linha)?;
    Ok(match linha.trim().to_lowercase().as_str() {
        "" => atual,
        "s" | "sim" => true,
        _ => false,
    })
}

// --- Página pública de uma loja ---

async fn pagina_loja(config: AppConfig, cancelamento: Cancelamento, id: i64) -> anyhow::Result<()> {
    let api = Arc::new(ApiLoja::new(&config));
    let mut pagina = PaginaLoja::new(
        api,
        Box::new(VisaoLojaTerminal),
        Some(Arc::new(CarrinhoEco) as Arc<dyn Carrinho>),
        config.site_base_url.clone(),
        cancelamento.clone(),
    );

    pagina.abrir(Some(id)).await;
    println!("Comandos: add <id> · comprar <id> · sair");

    let stdin = io::stdin();
    loop {
        if cancelamento.cancelado() {
            break;
        }
        print!("> ");
        io::stdout().flush()?;

        let mut linha = String::new();
        if stdin.lock().read_line(&mut linha)? == 0 {
            break;
        }
        let linha = linha.trim();
        let (comando, resto) = linha.split_once(' ').unwrap_or((linha, ""));

        match comando {
            "" => {}
            "sair" => break,
            "add" => match resto.trim().parse::<i64>() {
                Ok(id) => {
                    if pagina.adicionar_ao_carrinho(id).await {
                        println!("✔ Adicionado");
                    }
                }
                Err(_) => println!("Uso: add <id>"),
            },
            "comprar" => match resto.trim().parse::<i64>() {
                Ok(id) => pagina.comprar_agora(id).await,
                Err(_) => println!("Uso: comprar <id>"),
            },
            outro => println!("Comando desconhecido: {outro}"),
        }
    }

    Ok(())
}

// --- Visões de terminal ---

// O formulário "aberto" fica guardado para o laço de comandos preencher,
// como o modal guardava os valores no DOM.
#[derive(Clone, Default)]
struct VisaoTerminal {
    form_aberto: Arc<Mutex<Option<FormProduto>>>,
}

impl VisaoTerminal {
    fn tomar_form(&self) -> Option<FormProduto> {
        self.form_aberto.lock().unwrap().take()
    }
}

impl VisaoConsole for VisaoTerminal {
    fn carregando(&mut self, mensagem: &str) {
        println!("⏳ {mensagem}");
    }

    fn lista_vazia(&mut self) {
        println!("(nenhum produto cadastrado ainda)");
    }

    fn sem_resultados(&mut self) {
        println!("Nenhum produto encontrado com os filtros atuais.");
    }

    fn lista(&mut self, linhas: &[LinhaProduto]) {
        for linha in linhas {
            let categoria = linha
                .categoria
                .as_deref()
                .map(|c| format!(" [{c}]"))
                .unwrap_or_default();
            println!("#{} {}{categoria}", linha.id, linha.nome);
            if let Some(descricao) = &linha.descricao {
                println!("    {descricao}");
            }
            println!("    {} · {} · {}", linha.preco, linha.estoque, linha.status);
        }
    }

    fn contagem(&mut self, rotulo: &str) {
        println!("Meus produtos {rotulo}");
    }

    fn alerta(&mut self, mensagem: &str, tom: TomAlerta) {
        let marca = match tom {
            TomAlerta::Info => "ℹ",
            TomAlerta::Aviso => "⚠",
            TomAlerta::Erro => "✖",
        };
        println!("{marca} {mensagem}");
    }

    fn limpar_alerta(&mut self) {}

    fn diagnostico(&mut self, diag: &Diagnostico) {
        println!("--- Erro detectado (DEBUG) [{}] ---", diag.build);
        println!("{}", diag.detalhado());
        println!("--- copie o bloco acima se precisar de suporte ---");
    }

    fn seletores_categorias(&mut self, filtro: &SeletorCategorias, _form: &SeletorCategorias) {
        if filtro.opcoes().is_empty() {
            return;
        }
        let opcoes: Vec<String> = filtro
            .opcoes()
            .iter()
            .map(|(id, nome)| format!("{id}={nome}"))
            .collect();
        println!("Categorias ({}): {}", filtro.rotulo_padrao(), opcoes.join(" · "));
    }

    fn abrir_formulario(&mut self, titulo: &str, form: &FormProduto) {
        println!("— {titulo} —");
        *self.form_aberto.lock().unwrap() = Some(form.clone());
    }

    fn fechar_formulario(&mut self) {
        println!("(formulário fechado)");
    }

    fn erro_formulario(&mut self, campo: &str, mensagem: &str) {
        println!("✖ {campo}: {mensagem}");
    }

    fn sucesso_formulario(&mut self, mensagem: &str) {
        println!("✔ {mensagem}");
    }
}

struct ConfirmaTerminal;

impl Confirmacao for ConfirmaTerminal {
    fn confirmar(&mut self, pergunta: &str) -> bool {
        print!("{pergunta} [s/N]: ");
        let _ = io::stdout().flush();
        let mut linha = String::new();
        if io::stdin().lock().read_line(&mut linha).is_err() {
            return false;
        }
        matches!(linha.trim().to_lowercase().as_str(), "s" | "sim")
    }
}

struct ChromeTerminal;

impl ChromeHeader for ChromeTerminal {
    fn aplicar(&mut self, estado: &EstadoHeader) {
        println!("{} · {}", estado.saudacao, estado.rotulo_menu);
        if estado.modo_vendedor {
            println!("(modo vendedor: busca e carrinho ocultos)");
        }
    }

    fn navegar(&mut self, destino: &str) {
        println!("→ {destino}");
    }
}

impl ChromeLayout for ChromeTerminal {
    fn aplicar_header(&mut self, _html: &str) {
        println!("═══ SeridóHub ═══");
    }

    fn header_indisponivel(&mut self) {
        println!("Não foi possível carregar o header agora. ('recarregar' tenta de novo)");
    }

    fn aplicar_footer(&mut self, _html: &str) {}

    fn footer_indisponivel(&mut self) {
        println!("(Footer indisponível no momento)");
    }
}

struct VisaoLojaTerminal;

impl VisaoLoja for VisaoLojaTerminal {
    fn loja_nao_informada(&mut self) {
        println!("Loja não informada. Volte para a lista de lojas.");
    }

    fn hero_carregando(&mut self) {
        println!("Carregando dados da loja...");
    }

    fn hero(&mut self, hero: &HeroLoja) {
        println!("═══ {} ═══", hero.nome);
        println!("{}", hero.descricao);
        print!("☎ {}", hero.telefone);
        if let Some(endereco) = &hero.endereco {
            print!(" · {endereco}");
        }
        println!();
        println!("logo: {}", hero.logo);
    }

    fn hero_erro(&mut self, mensagem: &str) {
        println!("✖ {mensagem}");
    }

    fn produtos_carregando(&mut self) {
        println!("Carregando produtos...");
    }

    fn produtos_erro(&mut self, mensagem: &str) {
        println!("✖ {mensagem}");
    }

    fn produtos_vazio(&mut self) {
        println!("Esta loja ainda não tem produtos.");
    }

    fn contagem(&mut self, rotulo: &str) {
        println!("{rotulo}");
    }

    fn cards(&mut self, cards: &[CardProduto]) {
        for card in cards {
            println!("#{} {} — {}", card.id, card.nome, card.preco);
            println!("    {}", card.descricao);
        }
    }

    fn navegar(&mut self, destino: &str) {
        println!("→ {destino}");
    }
}

// O carrinho de verdade é um subsistema externo; este eco só materializa a
// capacidade no terminal.
struct CarrinhoEco;

#[async_trait]
impl Carrinho for CarrinhoEco {
    async fn adicionar(&self, item: ItemCarrinho) {
        match serde_json::to_string(&item) {
            Ok(json) => println!("(carrinho) {json}"),
            Err(_) => println!("(carrinho) item {}", item.id),
        }
    }
}
