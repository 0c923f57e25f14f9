//! Local HTTP/1.1 stand-in for the model endpoint, shared by the client and
//! engine tests.

use std::time::Duration;

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;

pub(crate) struct Captured {
    pub(crate) head: String,
    pub(crate) body: Vec<u8>,
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

/// Reads one request, waits `delay`, then answers. None if the client hung up.
async fn serve_one(mut socket: TcpStream, status: u16, body: &str, delay: Duration) -> Option<Captured> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_header_end(&buf) {
            break end;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let request_body = buf[header_end..].to_vec();

    tokio::time::sleep(delay).await;

    let response = format!(
        "HTTP/1.1 {} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await.ok()?;
    let _ = socket.shutdown().await;
    Some(Captured {
        head,
        body: request_body,
    })
}

/// Answers exactly one request and hands back what it received.
pub(crate) fn spawn_stub(rt: &Runtime, status: u16, body: String) -> (String, oneshot::Receiver<Captured>) {
    let listener = rt.block_on(TcpListener::bind("127.0.0.1:0")).unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();
    rt.spawn(async move {
        let Ok((socket, _)) = listener.accept().await else {
            return;
        };
        if let Some(captured) = serve_one(socket, status, &body, Duration::ZERO).await {
            let _ = tx.send(captured);
        }
    });
    (format!("http://{}", addr), rx)
}

/// Answers every request with 200 and `body`, each after `delay`.
pub(crate) fn spawn_delayed_stub(rt: &Runtime, delay: Duration, body: String) -> String {
    let listener = rt.block_on(TcpListener::bind("127.0.0.1:0")).unwrap();
    let addr = listener.local_addr().unwrap();
    rt.spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let _ = serve_one(socket, 200, &body, delay).await;
            });
        }
    });
    format!("http://{}", addr)
}

/// `generateContent` envelope around one text part.
pub(crate) fn gemini_reply(text: &str) -> String {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }] })
        .to_string()
}

pub(crate) fn pattern_reply() -> String {
    gemini_reply(
        &json!({
            "patternName": "Ascending Triangle",
            "confidence": 12,
            "trend": "Bullish",
            "supportLevels": ["101.5", "99"],
            "resistanceLevels": ["110"],
            "analysis": "Higher lows into flat resistance.",
            "actionableAdvice": "Buy the breakout above 110."
        })
        .to_string(),
    )
}
