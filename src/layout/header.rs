// src/layout/header.rs

use crate::models::{Sessao, TipoUsuario};
use crate::session::store::ArmazenamentoSessao;
use crate::session::{ler_sessao, limpar_sessao};

// O botão do menu principal alterna entre entrar e sair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotaoMenu {
    Entrar,
    Sair,
}

impl BotaoMenu {
    pub fn rotulo(&self) -> &'static str {
        match self {
            BotaoMenu::Entrar => "Entrar ou cadastrar-se",
            BotaoMenu::Sair => "Sair",
        }
    }
}

// Tudo que o chrome compartilhado precisa saber para se redesenhar, como
// função pura da sessão. Quem desenha é a capacidade ChromeHeader.
#[derive(Debug, Clone, PartialEq)]
pub struct EstadoHeader {
    pub saudacao: String,
    pub rotulo_acao: String,
    pub destino_conta: &'static str,
    pub link_vendedor_visivel: bool,
    pub rotulo_menu: String,
    pub botao_menu: BotaoMenu,
    pub logout_no_header: bool,
    // Vendedor operando a vitrine não precisa de busca nem carrinho; o
    // modo vendedor esconde esse chrome de compra.
    pub modo_vendedor: bool,
}

pub fn estado_header(sessao: Option<&Sessao>) -> EstadoHeader {
    let Some(sessao) = sessao else {
        return EstadoHeader {
            saudacao: "Olá, visitante".to_string(),
            rotulo_acao: "Entre ou cadastre-se".to_string(),
            destino_conta: "login.html",
            link_vendedor_visivel: false,
            rotulo_menu: "visitante".to_string(),
            botao_menu: BotaoMenu::Entrar,
            logout_no_header: false,
            modo_vendedor: false,
        };
    };

    let primeiro_nome = sessao.usuario.primeiro_nome();
    let tipo = sessao.usuario.tipo;
    let vendedor = tipo == TipoUsuario::Vendedor;

    EstadoHeader {
        saudacao: format!("Olá, {primeiro_nome}"),
        rotulo_acao: "Minha conta".to_string(),
        destino_conta: "conta.html",
        link_vendedor_visivel: vendedor,
        rotulo_menu: format!("{primeiro_nome} ({})", tipo.rotulo()),
        botao_menu: BotaoMenu::Sair,
        logout_no_header: vendedor,
        modo_vendedor: vendedor,
    }
}

// As regiões do chrome que o sincronizador atualiza. `fechar_menu` cobre o
// overlay de navegação quando ele existir; a implementação padrão vazia é
// a ausência do widget.
pub trait ChromeHeader {
    fn aplicar(&mut self, estado: &EstadoHeader);
    fn fechar_menu(&mut self) {}
    fn navegar(&mut self, destino: &str);
}

// Lê a sessão (com a auto-limpeza de estado corrompido embutida) e
// redesenha o chrome de acordo. Devolve a sessão para quem mais precisar.
pub fn sincronizar_header(
    store: &mut dyn ArmazenamentoSessao,
    chrome: &mut dyn ChromeHeader,
) -> Option<Sessao> {
    let sessao = ler_sessao(store);
    chrome.aplicar(&estado_header(sessao.as_ref()));
    sessao
}

// Logout: limpa as quatro chaves, fecha o overlay se estiver aberto e
// volta para a página inicial.
pub fn logout(store: &mut dyn ArmazenamentoSessao, chrome: &mut dyn ChromeHeader) {
    limpar_sessao(store);
    chrome.fechar_menu();
    chrome.navegar("index.html");
}
