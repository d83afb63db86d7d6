use crate::config::SharedConfig;
use crate::dns::handlers::{Handler, Reply};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use trust_dns_server::server::Protocol;

/// Largest message accepted over UDP.
const MAX_UDP_MESSAGE: usize = 4096;

/// Bind the configured sockets and build a server answering for the configured zone.
///
/// # Errors
///
/// Returns an error if the zone settings are invalid, or if a socket can't be bound.
pub async fn new(config: SharedConfig) -> anyhow::Result<Server> {
    let zone = Arc::new(config.zone_config()?);
    let mut dns_server = Server::new(Handler::new(zone));
    dns_server.register_socket(UdpSocket::bind(config.dns_udp_bind_addr).await?);
    if let Some(tcp_addr) = config.dns_tcp_bind_addr {
        dns_server.register_listener(TcpListener::bind(tcp_addr).await?, config.dns_tcp_timeout);
    }
    Ok(dns_server)
}

/// Sockets served by one [`Handler`].
pub struct Server {
    handler: Arc<Handler>,
    tasks: JoinSet<io::Result<()>>,
}

impl Server {
    #[must_use]
    pub fn new(handler: Handler) -> Self {
        Server {
            handler: Arc::new(handler),
            tasks: JoinSet::new(),
        }
    }

    /// Serve requests arriving on a bound UDP socket.
    pub fn register_socket(&mut self, socket: UdpSocket) {
        debug!("registering udp: {:?}", socket);
        let handler = self.handler.clone();
        let socket = Arc::new(socket);

        self.tasks.spawn(async move {
            let mut buf = vec![0_u8; MAX_UDP_MESSAGE];
            loop {
                let (len, src) = socket.recv_from(&mut buf).await?;
                if src.port() == 0 {
                    warn!("can not respond to {src}");
                    continue;
                }
                let message = buf[..len].to_vec();
                let handler = handler.clone();
                let reply = Reply::Udp {
                    socket: socket.clone(),
                    dst: src,
                };
                tokio::spawn(async move {
                    handler
                        .handle_message(&message, src, Protocol::Udp, reply)
                        .await;
                });
            }
        });
    }

    /// Serve requests on connections accepted by a bound TCP listener.
    ///
    /// Connections are closed once no request arrives within `timeout`.
    pub fn register_listener(&mut self, listener: TcpListener, timeout: Duration) {
        debug!("registering tcp: {:?}", listener);
        let handler = self.handler.clone();

        self.tasks.spawn(async move {
            loop {
                let (stream, src) = listener.accept().await?;
                debug!("accepted tcp connection from {src}");
                let handler = handler.clone();
                tokio::spawn(async move {
                    if let Err(error) = serve_connection(&handler, stream, timeout).await {
                        debug!("tcp connection from {src} closed: {error}");
                    }
                });
            }
        });
    }

    /// Run until one of the sockets fails.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped a socket.
    pub async fn block_until_done(mut self) -> anyhow::Result<()> {
        while let Some(res) = self.tasks.join_next().await {
            res??;
        }
        Ok(())
    }
}

/// Answer length prefixed requests on one TCP connection until it is closed or goes idle.
async fn serve_connection(handler: &Handler, stream: TcpStream, timeout: Duration) -> io::Result<()> {
    let src = stream.peer_addr()?;
    let (mut reader, writer) = stream.into_split();
    let writer = Arc::new(Mutex::new(writer));

    loop {
        let len = match tokio::time::timeout(timeout, reader.read_u16()).await {
            Ok(Ok(len)) => len,
            Ok(Err(error)) if error.kind() == io::ErrorKind::UnexpectedEof => return Ok(()),
            Ok(Err(error)) => return Err(error),
            Err(_) => return Err(io::Error::new(io::ErrorKind::TimedOut, "idle connection")),
        };
        let mut message = vec![0_u8; usize::from(len)];
        reader.read_exact(&mut message).await?;

        let reply = Reply::Tcp {
            stream: writer.clone(),
        };
        handler
            .handle_message(&message, src, Protocol::Tcp, reply)
            .await;
    }
}
