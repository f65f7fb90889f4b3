//! End-to-end tests over real TCP sockets

use std::net::SocketAddr;
use std::time::Duration;

use fileserve::config::Config;
use fileserve::server::listener::serve;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

mod common;
use common::{TempRoot, split_response};

async fn start_server(root: &TempRoot) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut cfg = Config::new(addr.port());
    cfg.root = root.path().to_path_buf();
    cfg.read_timeout = Some(Duration::from_secs(5));

    tokio::spawn(async move {
        let _ = serve(listener, &cfg).await;
    });

    addr
}

async fn get(addr: SocketAddr, target: &str) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(format!("GET {target} HTTP/1.1\r\nHost: localhost\r\n\r\n").as_bytes())
        .await
        .unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    out
}

#[tokio::test]
async fn test_serves_file_and_closes() {
    let root = TempRoot::new();
    root.file("index.html", "<p>hi</p>").file("style.css", "p { color: red }");
    let addr = start_server(&root).await;

    let (status, content_type, body) = split_response(&get(addr, "/style.css").await);

    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(content_type, "Content-type: text/css");
    assert_eq!(body, b"p { color: red }");
}

#[tokio::test]
async fn test_server_survives_bad_connections() {
    let root = TempRoot::new();
    root.file("index.html", "<p>hi</p>");
    let addr = start_server(&root).await;

    // Connect and hang up without sending anything.
    drop(TcpStream::connect(addr).await.unwrap());

    // Send a malformed request line.
    let mut bad = TcpStream::connect(addr).await.unwrap();
    bad.write_all(b"NONSENSE\r\n").await.unwrap();
    let mut out = Vec::new();
    bad.read_to_end(&mut out).await.unwrap();
    assert!(out.is_empty());

    let (status, _, body) = split_response(&get(addr, "/").await);
    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(body, b"<p>hi</p>");
}

#[tokio::test]
async fn test_parallel_clients() {
    let root = TempRoot::new();
    root.file("index.html", "home").file("img/logo.png", [0x89u8, b'P', b'N', b'G']);
    let addr = start_server(&root).await;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let target = if i % 2 == 0 { "/img/logo.png" } else { "/nope.html" };
        tasks.push(tokio::spawn(async move { (i, get(addr, target).await) }));
    }

    for task in tasks {
        let (i, raw) = task.await.unwrap();
        let (status, content_type, body) = split_response(&raw);
        assert_eq!(status, "HTTP/1.1 200 OK");
        if i % 2 == 0 {
            assert_eq!(content_type, "Content-type: image/png");
            assert_eq!(body, vec![0x89, b'P', b'N', b'G']);
        } else {
            // Missing files fall back to the index.
            assert_eq!(content_type, "Content-type: text/html");
            assert_eq!(body, b"home");
        }
    }
}

#[tokio::test]
async fn test_server_survives_client_leaving_mid_body() {
    let root = TempRoot::new();
    root.file("index.html", "<p>hi</p>")
        .file("huge.bin", vec![0u8; 8 * 1024 * 1024]);
    let addr = start_server(&root).await;

    let mut quitter = TcpStream::connect(addr).await.unwrap();
    quitter.write_all(b"GET /huge.bin HTTP/1.1\r\n\r\n").await.unwrap();
    let mut status = [0u8; 15];
    quitter.read_exact(&mut status).await.unwrap();
    assert_eq!(&status, b"HTTP/1.1 200 OK");
    drop(quitter);

    let (status, _, body) = split_response(&get(addr, "/").await);
    assert_eq!(status, "HTTP/1.1 200 OK");
    assert_eq!(body, b"<p>hi</p>");
}
