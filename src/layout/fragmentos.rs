// src/layout/fragmentos.rs

use crate::api::HttpCliente;
use crate::common::{AppError, Cancelamento};

// Páginas que usam o header público (sem chrome autenticado).
const PAGINAS_PUBLICAS: [&str; 6] = [
    "login.html",
    "cadastro.html",
    "register.html",
    "signin.html",
    "signup.html",
    "index_public.html",
];

pub fn arquivo_header(pagina: &str) -> &'static str {
    if PAGINAS_PUBLICAS.contains(&pagina.to_lowercase().as_str()) {
        "partials/header_public.html"
    } else {
        "partials/header_app.html"
    }
}

// Onde os fragmentos aterrissam. Cada região degrada sozinha: footer
// indisponível não derruba um header que carregou.
pub trait ChromeLayout {
    fn aplicar_header(&mut self, html: &str);
    // Fallback com a oferta de "tentar novamente".
    fn header_indisponivel(&mut self);
    fn aplicar_footer(&mut self, html: &str);
    fn footer_indisponivel(&mut self);
}

// Busca header e footer com o fetch de prazo curto. Status fora de 2xx ou
// corpo em branco/curto demais contam como fragmento inválido.
pub async fn carregar_layout(
    http: &HttpCliente,
    base: &str,
    pagina: &str,
    chrome: &mut dyn ChromeLayout,
    cancel: &Cancelamento,
) {
    let base = base.trim_end_matches('/');

    let url_header = format!("{base}/{}", arquivo_header(pagina));
    match http.texto(&url_header, None, cancel).await {
        Err(AppError::Cancelada) => return,
        Ok((status, corpo)) if fragmento_utilizavel(status, &corpo) => {
            chrome.aplicar_header(&corpo);
        }
        Ok((status, corpo)) => {
            tracing::error!(
                "Falha ao carregar HEADER ({status}) em {url_header}. Primeiros chars: {}",
                primeiros_chars(&corpo)
            );
            chrome.header_indisponivel();
        }
        Err(err) => {
            tracing::error!("Erro ao carregar header: {err}");
            chrome.header_indisponivel();
        }
    }

    let url_footer = format!("{base}/partials/footer.html");
    match http.texto(&url_footer, None, cancel).await {
        Err(AppError::Cancelada) => {}
        Ok((status, corpo)) if fragmento_utilizavel(status, &corpo) => {
            chrome.aplicar_footer(&corpo);
        }
        Ok((status, corpo)) => {
            tracing::error!(
                "Falha ao carregar FOOTER ({status}) em {url_footer}. Primeiros chars: {}",
                primeiros_chars(&corpo)
            );
            chrome.footer_indisponivel();
        }
        Err(err) => {
            tracing::error!("Erro ao carregar footer: {err}");
            chrome.footer_indisponivel();
        }
    }
}

fn fragmento_utilizavel(status: u16, corpo: &str) -> bool {
    (200..300).contains(&status) && corpo.trim().len() >= 10
}

fn primeiros_chars(corpo: &str) -> String {
    corpo.chars().take(120).collect()
}
