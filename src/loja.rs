pub mod pagina;

pub use pagina::{CardProduto, Carrinho, HeroLoja, PaginaLoja, VisaoLoja};
