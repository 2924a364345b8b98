use log::{debug, error, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::client::registry::SharedClientRegistry;
use crate::config::{SharedRuntimeConfig, StartupConfig};
use crate::middleware::RateLimiter;
use crate::middleware::logging::{log_call, log_disconnect};
use crate::protocol::handlers::rejected;
use crate::protocol::{Dispatcher, RequestStatus, Response, encode_response, parse_request};

const DRAIN_CHUNK: u64 = 8 * 1024;

/// Outcome of reading one request line.
#[derive(Debug, PartialEq, Eq)]
pub enum LineRead {
    Eof,
    Line(Vec<u8>),
    TooLong,
}

/// Handles one client connection.
///
/// - Reads newline-delimited JSON requests, one at a time.
/// - Lines longer than `max_request_length` are answered with an error and skipped.
/// - Closes the connection on quit, EOF, I/O error or idle timeout.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
    clients: SharedClientRegistry,
    startup: Arc<StartupConfig>,
    runtime: SharedRuntimeConfig,
) {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut limiter = RateLimiter::per_minute(runtime.read().await.max_requests_per_minute);
    let idle = startup.connection_timeout();

    loop {
        let read = match timeout(idle, read_request_line(&mut reader, startup.max_request_length)).await {
            Ok(read) => read,
            Err(_) => {
                info!("Client {} idle for {:?}, closing", client_addr, idle);
                break;
            }
        };

        let response = match read {
            Ok(LineRead::Eof) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(LineRead::TooLong) => {
                warn!("Client {} sent a request over {} bytes", client_addr, startup.max_request_length);
                rejected(format!(
                    "Request too long (limit {} bytes)",
                    startup.max_request_length
                ))
            }
            Ok(LineRead::Line(bytes)) => {
                limiter.set_max_requests(runtime.read().await.max_requests_per_minute);
                if !limiter.is_allowed() {
                    warn!("Client {} exceeded the request rate", client_addr);
                    rejected("Rate limit exceeded, try again later")
                } else {
                    if let Some(session) = clients.lock().await.get_mut(&client_addr) {
                        session.record_request();
                    }
                    match serve_line(&dispatcher, &client_addr, &bytes).await {
                        (response, RequestStatus::Continue) => response,
                        (response, RequestStatus::CloseConnection) => {
                            let _ = write_half.write_all(encode_response(&response).as_bytes()).await;
                            info!("Client {} requested to quit", client_addr);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        };

        if let Err(e) = write_half.write_all(encode_response(&response).as_bytes()).await {
            error!("Failed to write to {}: {}", client_addr, e);
            break;
        }
    }

    if let Some(session) = clients.lock().await.remove(&client_addr) {
        debug!(
            "Client {} served {} requests in {:?}",
            client_addr,
            session.requests_served(),
            session.connected_for()
        );
    }
    log_disconnect(&client_addr);
}

async fn serve_line(
    dispatcher: &Dispatcher,
    client_addr: &SocketAddr,
    bytes: &[u8],
) -> (Response, RequestStatus) {
    let line = match std::str::from_utf8(bytes) {
        Ok(line) => line,
        Err(_) => return (rejected("Request is not valid UTF-8"), RequestStatus::Continue),
    };

    let request = match parse_request(line) {
        Ok(request) => request,
        Err(message) => {
            debug!("Client {} sent an unparseable request: {}", client_addr, message);
            return (rejected(message), RequestStatus::Continue);
        }
    };

    let result = dispatcher.handle(request).await;
    if let (Some(name), Some(outcome)) = (&result.call, &result.outcome) {
        log_call(client_addr, name, outcome);
    }
    (result.response, result.status)
}

/// Reads one line of at most `max` bytes, excluding the newline.
///
/// An over-long line is consumed up to its newline so the next request
/// starts cleanly.
pub async fn read_request_line<R>(reader: &mut R, max: usize) -> io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = (&mut *reader)
        .take(max as u64 + 1)
        .read_until(b'\n', &mut buf)
        .await?;
    if n == 0 {
        return Ok(LineRead::Eof);
    }

    if buf.ends_with(b"\n") || buf.len() <= max {
        return Ok(LineRead::Line(buf));
    }

    loop {
        let mut chunk = Vec::new();
        let n = (&mut *reader)
            .take(DRAIN_CHUNK)
            .read_until(b'\n', &mut chunk)
            .await?;
        if n == 0 || chunk.ends_with(b"\n") {
            return Ok(LineRead::TooLong);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_lines_within_the_limit() {
        let mut input: &[u8] = b"{\"type\":\"quit\"}\nrest";
        let read = read_request_line(&mut input, 64).await.unwrap();
        assert_eq!(read, LineRead::Line(b"{\"type\":\"quit\"}\n".to_vec()));

        let read = read_request_line(&mut input, 64).await.unwrap();
        assert_eq!(read, LineRead::Line(b"rest".to_vec()));
        assert_eq!(read_request_line(&mut input, 64).await.unwrap(), LineRead::Eof);
    }

    #[tokio::test]
    async fn skips_over_long_lines() {
        let mut data = vec![b'x'; 100];
        data.push(b'\n');
        data.extend_from_slice(b"next\n");
        let mut input: &[u8] = &data;

        assert_eq!(read_request_line(&mut input, 10).await.unwrap(), LineRead::TooLong);
        assert_eq!(
            read_request_line(&mut input, 10).await.unwrap(),
            LineRead::Line(b"next\n".to_vec())
        );
    }

    #[tokio::test]
    async fn exact_limit_is_accepted() {
        let mut input: &[u8] = b"abcd\n";
        assert_eq!(
            read_request_line(&mut input, 4).await.unwrap(),
            LineRead::Line(b"abcd\n".to_vec())
        );
    }
}
