use crate::{echo_server::ServerState, error::Error};
use futures::FutureExt;
use hyper::{
    service::{make_service_fn, service_fn},
    Server,
};
use std::{
    convert::Infallible,
    net::TcpListener,
    sync::{mpsc, Arc},
    thread::{self, JoinHandle},
};
use tokio::{runtime::Runtime, sync::oneshot};
use tracing::error;

/// Runs the hyper server for `listener` on its own thread and runtime.
///
/// Returns once the server accepts connections, so that a caller never hands
/// out a base URL nobody listens on.
pub(crate) fn spawn(
    listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: oneshot::Receiver<()>,
) -> Result<JoinHandle<()>, Error> {
    let (ready_sender, ready) = mpsc::channel();

    let join_handle = thread::Builder::new()
        .name(String::from("echoback-server"))
        .spawn(move || {
            let runtime = match Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = ready_sender.send(Err(Error::from(e)));
                    return;
                }
            };

            runtime.block_on(serve(listener, state, shutdown, ready_sender));
        })?;

    match ready.recv() {
        Ok(Ok(())) => Ok(join_handle),
        Ok(Err(error)) => {
            let _ = join_handle.join();
            Err(error)
        }
        Err(_) => {
            let _ = join_handle.join();
            Err(Error::ServerExited)
        }
    }
}

async fn serve(
    listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: oneshot::Receiver<()>,
    ready: mpsc::Sender<Result<(), Error>>,
) {
    let builder = match Server::from_tcp(listener) {
        Ok(builder) => builder,
        Err(e) => {
            let _ = ready.send(Err(Error::from(e)));
            return;
        }
    };

    let server = builder
        .serve(make_service_fn(move |_| {
            let state = state.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |request| {
                    let state = state.clone();
                    async move { state.handle_request(request).await }
                }))
            }
        }))
        .with_graceful_shutdown(shutdown.map(|_| ()));

    let _ = ready.send(Ok(()));

    if let Err(e) = server.await {
        error!(error = %e, "echo server stopped with an error");
    }
}
