pub mod fragmentos;
pub mod header;

pub use fragmentos::{arquivo_header, carregar_layout, ChromeLayout};
pub use header::{estado_header, logout, sincronizar_header, BotaoMenu, ChromeHeader, EstadoHeader};
