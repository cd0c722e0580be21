pub mod categorias;
pub mod controller;
pub mod filtros;
pub mod form;
pub mod render;

pub use categorias::{indice_categorias, SeletorCategorias, ROTULO_SELECIONE, ROTULO_TODAS};
pub use controller::{ConsoleProdutos, GuardaChamadas};
pub use filtros::{FiltroProdutos, FiltroStatus};
pub use form::{ErroFormulario, FormProduto};
pub use render::{linha_de, Confirmacao, LinhaProduto, TomAlerta, VisaoConsole};
