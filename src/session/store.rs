// src/session/store.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

// O análogo do localStorage: um arquivo JSON de pares chave/valor escrito
// pelo fluxo de login (colaborador externo) e lido/limpo por aqui. Como no
// navegador, ler e escrever nunca estouram erro para o chamador — falha de
// E/S vira log e segue.
pub trait ArmazenamentoSessao {
    fn ler(&self, chave: &str) -> Option<String>;
    fn gravar(&mut self, chave: &str, valor: &str);
    fn remover(&mut self, chave: &str);
}

pub struct ArquivoSessao {
    caminho: PathBuf,
    dados: HashMap<String, String>,
}

impl ArquivoSessao {
    pub fn abrir(caminho: impl AsRef<Path>) -> Self {
        let caminho = caminho.as_ref().to_path_buf();
        let dados = match std::fs::read_to_string(&caminho) {
            Ok(conteudo) => match serde_json::from_str::<HashMap<String, String>>(&conteudo) {
                Ok(dados) => dados,
                Err(err) => {
                    tracing::warn!(
                        "Arquivo de sessão {} ilegível ({err}); começando vazio.",
                        caminho.display()
                    );
                    HashMap::new()
                }
            },
            // Arquivo ainda não existe: sessão de visitante.
            Err(_) => HashMap::new(),
        };
        Self { caminho, dados }
    }

    fn persistir(&self) {
        let json = match serde_json::to_string_pretty(&self.dados) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!("Falha ao serializar a sessão: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.caminho, json) {
            tracing::warn!("Falha ao gravar {}: {err}", self.caminho.display());
        }
    }
}

impl ArmazenamentoSessao for ArquivoSessao {
    fn ler(&self, chave: &str) -> Option<String> {
        self.dados.get(chave).cloned()
    }

    fn gravar(&mut self, chave: &str, valor: &str) {
        self.dados.insert(chave.to_string(), valor.to_string());
        self.persistir();
    }

    fn remover(&mut self, chave: &str) {
        if self.dados.remove(chave).is_some() {
            self.persistir();
        }
    }
}

// Armazenamento em memória para os testes dos fluxos que mexem na sessão.
#[cfg(test)]
pub struct MemoriaSessao(pub HashMap<String, String>);

#[cfg(test)]
impl MemoriaSessao {
    pub fn com(pares: &[(&str, &str)]) -> Self {
        Self(
            pares
                .iter()
                .map(|(c, v)| (c.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
impl ArmazenamentoSessao for MemoriaSessao {
    fn ler(&self, chave: &str) -> Option<String> {
        self.0.get(chave).cloned()
    }

    fn gravar(&mut self, chave: &str, valor: &str) {
        self.0.insert(chave.to_string(), valor.to_string());
    }

    fn remover(&mut self, chave: &str) {
        self.0.remove(chave);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arquivo_persiste_e_rele() {
        let dir = tempfile::tempdir().unwrap();
        let caminho = dir.path().join("sessao.json");

        {
            let mut store = ArquivoSessao::abrir(&caminho);
            store.gravar("token", "abc123");
            store.gravar("user", r#"{"id":1}"#);
        }

        let store = ArquivoSessao::abrir(&caminho);
        assert_eq!(store.ler("token").as_deref(), Some("abc123"));
        assert_eq!(store.ler("user").as_deref(), Some(r#"{"id":1}"#));
        assert_eq!(store.ler("authToken"), None);
    }

    #[test]
    fn arquivo_corrompido_comeca_vazio() {
        let dir = tempfile::tempdir().unwrap();
        let caminho = dir.path().join("sessao.json");
        std::fs::write(&caminho, "isto nao e json").unwrap();

        let store = ArquivoSessao::abrir(&caminho);
        assert_eq!(store.ler("token"), None);
    }
}
