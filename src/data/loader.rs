use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use reqwest::header::CACHE_CONTROL;
use thiserror::Error;

use super::model::Leaderboard;
use super::parser::parse_csv;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("fetching leaderboard")]
    Http(#[from] reqwest::Error),
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("loader thread exited without a result")]
    Worker,
}

// ---------------------------------------------------------------------------
// Source – where the CSV comes from
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Path(PathBuf),
}

impl Source {
    /// `http://` and `https://` locations are fetched, anything else is a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::Path(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse and normalise CSV text.  Never fails; bad rows are dropped.
pub fn load_text(text: &str) -> Leaderboard {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Leaderboard::from_rows(parse_csv(text))
}

/// Read the source and turn it into a [`Leaderboard`].
pub fn load_source(source: &Source) -> Result<Leaderboard, LoadError> {
    let text = match source {
        Source::Url(url) => fetch_text(url)?,
        Source::Path(path) => std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.clone(),
            source: e,
        })?,
    };
    let board = load_text(&text);
    log::info!(
        "Loaded {} records from {source} ({} rows without a team dropped, models {:?})",
        board.len(),
        board.dropped,
        board.distinct_models()
    );
    Ok(board)
}

/// Load on a worker thread.  The receiver yields exactly one result.
pub fn spawn_load(source: Source) -> Receiver<Result<Leaderboard, LoadError>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        log::info!("Loading leaderboard from {source}");
        // The UI may have gone away; nothing to report to then.
        let _ = tx.send(load_source(&source));
    });
    rx
}

/// GET the feed, asking intermediaries not to serve a cached copy.
fn fetch_text(url: &str) -> Result<String, LoadError> {
    let client = reqwest::blocking::Client::new();
    let response = client.get(url).header(CACHE_CONTROL, "no-store").send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SortKey;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use tempfile::{tempdir, NamedTempFile};

    /// Serve one HTTP response on 127.0.0.1 and hand back the raw request.
    fn spawn_one_shot_http(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            let _ = stream.flush();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}/lb.csv"), handle)
    }

    #[test]
    fn source_parse_distinguishes_urls_from_paths() {
        assert_eq!(
            Source::parse("https://example.org/leaderboard.csv"),
            Source::Url("https://example.org/leaderboard.csv".to_string())
        );
        assert_eq!(
            Source::parse(" leaderboard/leaderboard.csv "),
            Source::Path(PathBuf::from("leaderboard/leaderboard.csv"))
        );
    }

    #[test]
    fn load_text_strips_byte_order_mark() {
        let board = load_text("\u{feff}team,macro_f1\nA,1\n");
        assert_eq!(board.len(), 1);
        assert_eq!(board.records[0].team, "A");
    }

    #[test]
    fn load_text_tolerates_extra_columns_in_any_order() {
        let text = "username,timestamp_utc,team,run_id,type,model,macro_f1,accuracy,precision,recall\n\
                    u1,2024-01-01 10:00:00 UTC,A,r1,human,GNN,0.91,0.9,0.89,0.88\n\
                    u2,2024-01-02 10:00:00 UTC,,r2,llm,MLP,0.99,0.9,0.9,0.9\n";
        let board = load_text(text);
        assert_eq!(board.len(), 1);
        assert_eq!(board.dropped, 1);
        let record = &board.records[0];
        assert_eq!(record.model, "gnn");
        assert_eq!(record.score(SortKey::MacroF1), Some(0.91));
        assert_eq!(record.timestamp_utc, "2024-01-01 10:00:00 UTC");
    }

    #[test]
    fn load_source_reads_files_and_reports_missing_ones() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "team,model,macro_f1\nA,gnn,1\nB,gnn,2").unwrap();

        let board = load_source(&Source::Path(file.path().to_path_buf())).unwrap();
        assert_eq!(board.len(), 2);

        let dir = tempdir().unwrap();
        let err = load_source(&Source::Path(dir.path().join("missing.csv"))).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn error_chain_names_the_cause_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let err = load_source(&Source::Path(path.clone())).unwrap_err();
        assert_eq!(err.to_string(), format!("reading {}", path.display()));

        let cause = std::fs::read_to_string(&path).unwrap_err().to_string();
        let chain = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chain.matches(cause.as_str()).count(), 1);
    }

    #[test]
    fn http_fetch_sends_no_store_and_parses_body() {
        let (url, server) = spawn_one_shot_http("200 OK", "team,macro_f1\nA,1\n");
        let board = load_source(&Source::parse(&url)).unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board.records[0].team, "A");

        let request = server.join().unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /lb.csv "));
        assert!(request.contains("cache-control: no-store"));
    }

    #[test]
    fn http_error_status_is_a_transport_failure() {
        let (url, server) = spawn_one_shot_http("404 Not Found", "");
        let err = load_source(&Source::parse(&url)).unwrap_err();
        server.join().unwrap();
        match err {
            LoadError::Status { url: failed, status } => {
                assert_eq!(failed, url);
                assert_eq!(status, 404);
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[test]
    fn spawn_load_delivers_one_result() {
        let dir = tempdir().unwrap();
        let rx = spawn_load(Source::Path(dir.path().join("leaderboard.csv")));
        let result = rx.recv().unwrap();
        assert!(result.is_err());
    }
}
