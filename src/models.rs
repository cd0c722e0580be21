pub mod produto;
pub mod usuario;

pub use produto::{ItemCarrinho, Loja, LojaWire, Produto, ProdutoPayload, ProdutoWire};
pub use usuario::{Sessao, TipoUsuario, Usuario};
