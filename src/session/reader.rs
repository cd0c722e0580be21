// src/session/reader.rs

use crate::models::{Sessao, Usuario};
use crate::session::store::ArmazenamentoSessao;

// As quatro chaves persistidas. Os pares são apelidos herdados de versões
// anteriores do fluxo de login; aceitamos ambos na leitura e limpamos os
// quatro no logout.
pub const CHAVES_SESSAO: [&str; 4] = ["token", "authToken", "user", "currentUser"];

// Lê a sessão persistida. Qualquer falha resolve para visitante (None):
// chave ausente simplesmente não autentica; payload de usuário que não
// parseia é estado corrompido e dispara a auto-limpeza das quatro chaves.
pub fn ler_sessao(store: &mut dyn ArmazenamentoSessao) -> Option<Sessao> {
    let bruto_usuario = store.ler("user").or_else(|| store.ler("currentUser"))?;
    let token = store.ler("token").or_else(|| store.ler("authToken"))?;

    match serde_json::from_str::<Usuario>(&bruto_usuario) {
        Ok(usuario) => Some(Sessao { usuario, token }),
        Err(err) => {
            tracing::warn!("Payload de usuário corrompido na sessão ({err}); limpando.");
            limpar_sessao(store);
            None
        }
    }
}

pub fn limpar_sessao(store: &mut dyn ArmazenamentoSessao) {
    for chave in CHAVES_SESSAO {
        store.remover(chave);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TipoUsuario;
    use crate::session::store::MemoriaSessao;

    #[test]
    fn le_sessao_com_chaves_primarias() {
        let mut store = MemoriaSessao::com(&[
            ("user", r#"{"id": 1, "nome": "Ana Souza", "tipo": "VENDEDOR"}"#),
            ("token", "tk-1"),
        ]);
        let sessao = ler_sessao(&mut store).unwrap();
        assert_eq!(sessao.token, "tk-1");
        assert_eq!(sessao.usuario.tipo, TipoUsuario::Vendedor);
    }

    #[test]
    fn le_sessao_com_chaves_apelido() {
        let mut store = MemoriaSessao::com(&[
            ("currentUser", r#"{"id": 2, "nome": "Beto"}"#),
            ("authToken", "tk-2"),
        ]);
        let sessao = ler_sessao(&mut store).unwrap();
        assert_eq!(sessao.token, "tk-2");
        assert_eq!(sessao.usuario.tipo, TipoUsuario::Cliente);
    }

    #[test]
    fn sem_token_vira_visitante_sem_limpar() {
        let mut store = MemoriaSessao::com(&[("user", r#"{"id": 3}"#)]);
        assert!(ler_sessao(&mut store).is_none());
        // Chave ausente não é corrupção: o payload do usuário fica.
        assert!(store.ler("user").is_some());
    }

    #[test]
    fn payload_corrompido_limpa_as_quatro_chaves() {
        let mut store = MemoriaSessao::com(&[
            ("user", "{nao-e-json"),
            ("currentUser", r#"{"id": 4}"#),
            ("token", "tk-4"),
            ("authToken", "tk-4b"),
        ]);
        assert!(ler_sessao(&mut store).is_none());
        for chave in CHAVES_SESSAO {
            assert_eq!(store.ler(chave), None, "chave {chave} deveria ter sumido");
        }
    }
}
