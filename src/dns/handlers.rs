use crate::error::Error;
use crate::resolver::{self, Resolved};
use crate::zone::SharedZone;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::UdpSocket;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use trust_dns_server::authority::{MessageRequest, MessageResponse, MessageResponseBuilder};
use trust_dns_server::client::op::{Header, Message, MessageType, OpCode, ResponseCode};
use trust_dns_server::client::rr::Record;
use trust_dns_server::client::serialize::binary::{BinDecodable, BinEncoder};
use trust_dns_server::server::{
    Protocol, Request, RequestHandler, ResponseHandler, ResponseInfo,
};

/// Answers every request from a shared, read-only [`ZoneConfig`][crate::zone::ZoneConfig].
#[derive(Clone)]
pub struct Handler {
    zone: SharedZone,
}

impl Handler {
    #[must_use]
    pub fn new(zone: SharedZone) -> Self {
        Handler { zone }
    }

    /// Answer one raw message received from `src`.
    ///
    /// The question count is checked on the header before the message is parsed into a
    /// [`Request`], which only holds a single question. Anything other than exactly one is
    /// `REFUSED`.
    pub(crate) async fn handle_message(
        &self,
        bytes: &[u8],
        src: SocketAddr,
        protocol: Protocol,
        reply: Reply,
    ) {
        let header = match Header::from_bytes(bytes) {
            Ok(header) => header,
            Err(error) => {
                debug!("dropping unreadable message from {src}: {error}");
                return;
            }
        };
        // Never answer responses, they can only be reflected traffic.
        if header.message_type() == MessageType::Response {
            return;
        }

        let query_count = header.query_count();
        if query_count != 1 {
            debug!("refusing request with {query_count} questions from {src}");
            send_error(bytes, &header, ResponseCode::Refused, &reply).await;
            return;
        }

        match MessageRequest::from_bytes(bytes) {
            Ok(message) => {
                let request = Request::new(message, src, protocol);
                self.handle_request(&request, reply).await;
            }
            Err(error) => {
                debug!("malformed request from {src}: {error}");
                send_error(bytes, &header, ResponseCode::FormErr, &reply).await;
            }
        }
    }

    async fn dispatch_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response: R,
    ) -> Result<ResponseInfo, Error> {
        // If it isn't a query, return NOTIMPL.
        if request.op_code() != OpCode::Query || request.message_type() != MessageType::Query {
            return self.handle_notimpl(request, response).await;
        }

        let query = request.query().original();
        debug!(
            "resolving {} records for {}",
            query.query_type(),
            query.name()
        );
        let resolved = resolver::resolve(query, &self.zone);
        self.send_auth_resp(request, response, resolved).await
    }

    async fn handle_notimpl<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> Result<ResponseInfo, Error> {
        let response = MessageResponseBuilder::from_message_request(request);
        Ok(response_handle
            .send_response(response.error_msg(request.header(), ResponseCode::NotImp))
            .await?)
    }

    async fn send_auth_resp<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
        resolved: Resolved,
    ) -> Result<ResponseInfo, Error> {
        let mut header = Header::response_from_request(request.header());
        header.set_authoritative(true);
        header.set_response_code(resolved.response_code);
        let builder = MessageResponseBuilder::from_message_request(request);
        let response = builder.build(header, resolved.records.iter(), &[], &[], &[]);
        Ok(response_handle.send_response(response).await?)
    }
}

#[async_trait::async_trait]
impl RequestHandler for Handler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        response_handle: R,
    ) -> ResponseInfo {
        match self.dispatch_request(request, response_handle).await {
            Ok(info) => info,
            Err(error) => {
                error!("error in RequestHandler: {:?}", error);
                let mut header = Header::new();
                header.set_response_code(ResponseCode::ServFail);
                header.into()
            }
        }
    }
}

/// Error response for a request that never became a [`Request`]. The questions are echoed back
/// when they can be read.
async fn send_error(bytes: &[u8], header: &Header, response_code: ResponseCode, reply: &Reply) {
    let mut response_header = Header::response_from_request(header);
    response_header.set_authoritative(true);
    response_header.set_response_code(response_code);

    let mut response = Message::new();
    response.set_header(response_header);
    if let Ok(mut request) = Message::from_vec(bytes) {
        response.add_queries(request.take_queries());
    }

    let sent = match response.to_vec() {
        Ok(buffer) => reply.send(&buffer).await,
        Err(error) => Err(io::Error::from(error)),
    };
    if let Err(error) = sent {
        warn!("failed to send {response_code} response: {error}");
    }
}

/// Where the response to one request is written.
#[derive(Clone)]
pub(crate) enum Reply {
    Udp {
        socket: Arc<UdpSocket>,
        dst: SocketAddr,
    },
    /// Responses on a TCP connection are prefixed with their length.
    Tcp { stream: Arc<Mutex<OwnedWriteHalf>> },
}

impl Reply {
    async fn send(&self, buffer: &[u8]) -> io::Result<()> {
        match self {
            Reply::Udp { socket, dst } => {
                socket.send_to(buffer, *dst).await?;
            }
            Reply::Tcp { stream } => {
                let len = u16::try_from(buffer.len()).map_err(|_| {
                    io::Error::new(io::ErrorKind::InvalidData, "response too large for TCP")
                })?;
                let mut stream = stream.lock().await;
                stream.write_u16(len).await?;
                stream.write_all(buffer).await?;
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ResponseHandler for Reply {
    async fn send_response<'a>(
        &mut self,
        response: MessageResponse<
            '_,
            'a,
            impl Iterator<Item = &'a Record> + Send + 'a,
            impl Iterator<Item = &'a Record> + Send + 'a,
            impl Iterator<Item = &'a Record> + Send + 'a,
            impl Iterator<Item = &'a Record> + Send + 'a,
        >,
    ) -> io::Result<ResponseInfo> {
        let mut buffer = Vec::with_capacity(512);
        let info = {
            let mut encoder = BinEncoder::new(&mut buffer);
            response
                .destructive_emit(&mut encoder)
                .map_err(io::Error::from)?
        };
        self.send(&buffer).await?;
        Ok(info)
    }
}
