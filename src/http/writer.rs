use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Size of the buffer file bodies are copied through.
pub const BUFFER_SIZE: usize = 8192;

/// Status line, content type line and the blank line ending the head.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    format!(
        "{} {} {}\r\nContent-type: {}\r\n\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase(),
        resp.content_type,
    )
    .into_bytes()
}

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

    /// Writes the whole response and flushes it. Returns the number of body
    /// bytes written.
    ///
    /// File bodies are copied in chunks of at most [`BUFFER_SIZE`] bytes, so
    /// the file never has to fit in memory.
    pub async fn write_to_stream<W>(self, stream: &mut W) -> std::io::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.head).await?;

        let written = match self.body {
            Body::Static(text) => {
                stream.write_all(text.as_bytes()).await?;
                text.len() as u64
            }
            Body::File(mut file) => {
                let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
                let mut total = 0u64;

                loop {
                    buffer.clear();
                    let n = file.read_buf(&mut buffer).await?;
                    if n == 0 {
                        break;
                    }
                    stream.write_all(&buffer[..n]).await?;
                    total += n as u64;
                }

                total
            }
        };

        stream.flush().await?;
        Ok(written)
    }
}
