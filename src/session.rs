pub mod reader;
pub mod store;

pub use reader::{ler_sessao, limpar_sessao, CHAVES_SESSAO};
pub use store::{ArmazenamentoSessao, ArquivoSessao};
