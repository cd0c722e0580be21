pub mod http;
pub mod loja_api;

pub use http::{HttpCliente, RespostaApi};
pub use loja_api::{ApiLoja, CatalogoRemoto};
