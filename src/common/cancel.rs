use tokio::sync::watch;

// Token de cancelamento entregue a toda operação assíncrona do console.
// Quem monta a página guarda o gatilho e dispara no teardown; as
// operações em andamento observam o token e desistem.
pub fn novo_par() -> (GatilhoCancelamento, Cancelamento) {
    let (tx, rx) = watch::channel(false);
    (GatilhoCancelamento { tx }, Cancelamento { rx })
}

pub struct GatilhoCancelamento {
    tx: watch::Sender<bool>,
}

impl GatilhoCancelamento {
    pub fn cancelar(&self) {
        let _ = self.tx.send(true);
    }
}

#[derive(Clone)]
pub struct Cancelamento {
    rx: watch::Receiver<bool>,
}

impl Cancelamento {
    // Token que nunca dispara, para fluxos sem teardown (e testes).
    pub fn nunca() -> Self {
        let (_tx, rx) = watch::channel(false);
        Cancelamento { rx }
    }

    pub fn cancelado(&self) -> bool {
        *self.rx.borrow()
    }

    // Resolve quando o gatilho disparar. Se o gatilho foi descartado sem
    // cancelar, nunca resolve.
    pub async fn aguardar(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
