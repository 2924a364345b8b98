use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::client::{ClientRegistry, SharedClientRegistry, handle_client};
use crate::config::{SharedRuntimeConfig, StartupConfig};
use crate::error::ServerError;
use crate::middleware::logging::log_connection;
use crate::protocol::handlers::rejected;
use crate::protocol::{Dispatcher, encode_response};
use crate::sandbox::Sandbox;

pub struct Server {
    client_registry: SharedClientRegistry,
    dispatcher: Arc<Dispatcher>,
    listener: TcpListener,
    startup: Arc<StartupConfig>,
    runtime: SharedRuntimeConfig,
}

impl Server {
    /// Opens the sandbox root and binds the request listener.
    pub async fn bind(
        startup: StartupConfig,
        runtime: SharedRuntimeConfig,
    ) -> Result<Self, ServerError> {
        let sandbox = Sandbox::open(startup.sandbox_root_path())?;
        info!("Sandbox root directory: {}", sandbox.root().display());

        let address = startup.listen_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.clone(),
                source,
            })?;
        info!("Server bound to {}", address);

        Ok(Self {
            client_registry: Arc::new(Mutex::new(ClientRegistry::new())),
            dispatcher: Arc::new(Dispatcher::new(Arc::new(sandbox))),
            listener,
            startup: Arc::new(startup),
            runtime,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn sandbox(&self) -> &Sandbox {
        self.dispatcher.sandbox()
    }

    /// Accepts clients until the task is dropped.
    pub async fn start(&self) {
        info!(
            "Starting docbox on {} (max {} clients)",
            self.startup.listen_address(),
            self.runtime.read().await.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let client_registry = Arc::clone(&self.client_registry);
                    let dispatcher = Arc::clone(&self.dispatcher);
                    let startup = Arc::clone(&self.startup);
                    let runtime = Arc::clone(&self.runtime);

                    // Spawn a task for each client so the accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) = handle_new_client(
                            stream,
                            addr,
                            client_registry,
                            dispatcher,
                            startup,
                            runtime,
                        )
                        .await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Registers a new client against the connection limit and hands it to the
/// session loop.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    client_registry: SharedClientRegistry,
    dispatcher: Arc<Dispatcher>,
    startup: Arc<StartupConfig>,
    runtime: SharedRuntimeConfig,
) -> Result<(), std::io::Error> {
    let max_clients = runtime.read().await.max_clients;

    {
        let mut clients = client_registry.lock().await;
        if !clients.try_register(client_addr, max_clients) {
            drop(clients);
            warn!("Refusing {}: {} clients already connected", client_addr, max_clients);
            let refusal = rejected("Too many connections. Try again later.");
            stream.write_all(encode_response(&refusal).as_bytes()).await?;
            return Ok(());
        }
        log_connection(&client_addr, clients.len(), max_clients);
    }

    handle_client(
        stream,
        client_addr,
        dispatcher,
        client_registry,
        startup,
        runtime,
    )
    .await;

    Ok(())
}
