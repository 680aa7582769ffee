use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Chunk size for streaming file bodies
const BUFFER_SIZE: usize = 8192;

/// Serializes the status line and headers, including the blank separator line.
///
/// Note: This function is made public for integration testing purposes
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers, in insertion order
    for (k, v) in resp.headers.iter() {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response to the client.
///
/// Owns the response so a file body's handle lives exactly as long as the
/// write: it is dropped (closed) when the writer goes away, whether the write
/// finished or failed partway.
pub struct ResponseWriter {
    head: Vec<u8>,
    body: Body,
}

impl ResponseWriter {
    pub fn new(response: Response) -> Self {
        Self {
            head: serialize_head(&response),
            body: response.body,
        }
    }

    pub async fn write_to_stream(&mut self, stream: &mut TcpStream) -> anyhow::Result<()> {
        stream.write_all(&self.head).await?;

        match &mut self.body {
            Body::Bytes(bytes) => {
                stream.write_all(bytes).await?;
            }
            Body::File(file, _len) => {
                // Stream the file out in fixed-size chunks; never buffer the
                // whole body.
                let mut chunk = [0u8; BUFFER_SIZE];
                loop {
                    let n = file.read(&mut chunk).await?;
                    if n == 0 {
                        break;
                    }
                    stream.write_all(&chunk[..n]).await?;
                }
            }
        }

        stream.flush().await?;
        Ok(())
    }
}
