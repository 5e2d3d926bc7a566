use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use esdir::config::{Config, STREAMERS_PATH, TOURNAMENTS_PATH};
use esdir::counter::CounterDisplay;
use esdir::loader::{DataLoader, DataRoot};
use esdir::site::{build_page, Interactions};
use esdir::streamers::StreamerDirectory;
use esdir::{Error, StreamerRecord};

/// Serves `count` requests, answering each with `status` and `body`.
async fn serve(status: &'static str, body: &'static str, count: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        for _ in 0..count {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        }
    });
    format!("http://{}/", addr)
}

#[tokio::test]
async fn not_found_marks_counter_failed() {
    let base = serve("404 Not Found", "", 1).await;
    let loader = DataLoader::new(base.parse().unwrap());
    let result = loader.load::<StreamerRecord>(STREAMERS_PATH).await;
    assert!(matches!(result, Err(Error::Status { status: 404, .. })));

    let mut dir = StreamerDirectory::new(false);
    dir.loaded(result);
    assert_eq!(dir.counter(), CounterDisplay::Failed);
    assert_eq!(dir.counter().to_string(), "!");
    assert!(dir.container().is_empty());
    assert!(dir.records().is_empty());
}

#[tokio::test]
async fn object_body_is_an_empty_collection() {
    let base = serve("200 OK", r#"{"streamers": []}"#, 1).await;
    let loader = DataLoader::new(base.parse().unwrap());
    let records = loader.load::<StreamerRecord>(STREAMERS_PATH).await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn invalid_json_body_is_an_error() {
    let base = serve("200 OK", "<html>oops</html>", 1).await;
    let loader = DataLoader::new(base.parse().unwrap());
    let err = loader.load::<StreamerRecord>(STREAMERS_PATH).await.unwrap_err();
    assert!(matches!(err, Error::Json { .. }));
}

#[tokio::test]
async fn build_over_http() {
    let base = serve("200 OK", r#"[{"nickname":"Foo"},{"nickname":"Bar","links":{"hltv":"x"}}]"#, 1).await;
    let config = Config {
        data_root: base.parse::<DataRoot>().unwrap(),
        streamers_path: STREAMERS_PATH.to_owned(),
        tournaments_path: TOURNAMENTS_PATH.to_owned(),
        viewport_width: 375,
        mobile_breakpoint: 768,
        counter_duration_ms: 0,
    };
    let template = r#"<p id="counter">0</p><main id="streamers-container" class="hidden"></main>"#;
    let out = build_page(template, &config, &Interactions::default()).await;
    assert_eq!(
        out,
        r#"<p id="counter">2</p><main id="streamers-container" class="hidden"></main>"#
    );
}
