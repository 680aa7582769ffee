use std::sync::Arc;

use bytes::BytesMut;
use chrono::Utc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::config::ServerConfig;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::writer::ResponseWriter;
use crate::observe::{RequestObserver, RequestRecord};
use crate::serve::resolver;

/// One client connection: reads requests, resolves them against the published
/// tree, writes responses, and loops while the client keeps the connection
/// alive.
pub struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
    state: ConnectionState,
    config: Arc<ServerConfig>,
    observer: Option<Arc<dyn RequestObserver>>,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, config: Arc<ServerConfig>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            state: ConnectionState::Reading,
            config,
            observer: None,
        }
    }

    /// Attaches an observer that sees every handled request.
    pub fn with_observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request().await? {
                    Some(req) => {
                        self.state = ConnectionState::Processing(req);
                    }
                    None => {
                        self.state = ConnectionState::Closed;
                    }
                },

                ConnectionState::Processing(req) => {
                    let keep_alive = req.keep_alive();
                    let method = req.method;
                    let raw_path = req.path.clone();
                    // Queries never participate in file resolution.
                    let lookup_path = req.path_without_query().to_string();

                    let response = resolver::resolve(&self.config, method, &lookup_path).await;

                    if let Some(observer) = &self.observer {
                        observer.on_response(&RequestRecord {
                            method,
                            path: raw_path,
                            status: response.status,
                            timestamp: Utc::now(),
                        });
                    }

                    let writer = ResponseWriter::new(response);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if *keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    // Remove consumed bytes
                    let _ = self.buffer.split_to(consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => {
                    // Malformed request → protocol error
                    return Err(anyhow::anyhow!("HTTP parse error: {:?}", e));
                }
            }

            // Read more data
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // Client closed connection
                return Ok(None);
            }
        }
    }
}
