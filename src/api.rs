use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{Gig, NewGig};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(String),
    #[error("gig service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Remote store of gigs.
pub trait GigService {
    fn fetch_gigs(&self) -> Result<Vec<Gig>, ApiError>;
    fn create_gig(&self, gig: &NewGig) -> Result<Gig, ApiError>;
}

pub struct HttpGigService {
    base_url: String,
    client: Client,
}

impl HttpGigService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gig-board/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ApiError::Http(err.to_string()))?;
        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(
            &config.effective_base_url(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn gigs_url(&self) -> String {
        format!("{}/gigs", self.base_url)
    }

    fn read_body(response: reqwest::blocking::Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .map_err(|err| ApiError::Http(format!("unable to read response body: {err}")))?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl GigService for HttpGigService {
    fn fetch_gigs(&self) -> Result<Vec<Gig>, ApiError> {
        let url = self.gigs_url();
        log::debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| ApiError::Http(format!("request failed for {url}: {err}")))?;
        let body = Self::read_body(response)?;
        let gigs: Vec<Gig> =
            serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        log::info!("fetched {} gigs", gigs.len());
        Ok(gigs)
    }

    fn create_gig(&self, gig: &NewGig) -> Result<Gig, ApiError> {
        let url = self.gigs_url();
        log::debug!("POST {url} artist={:?} date={}", gig.artist, gig.date);
        let response = self
            .client
            .post(&url)
            .json(gig)
            .send()
            .map_err(|err| ApiError::Http(format!("request failed for {url}: {err}")))?;
        let body = Self::read_body(response)?;
        let created: Gig =
            serde_json::from_str(&body).map_err(|err| ApiError::Decode(err.to_string()))?;
        log::info!("created gig {}", created.id);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GigId, GigType};
    use chrono::NaiveDate;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one canned response and hands back the raw request it saw.
    fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read line");
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
                let done = line == "\r\n" || line.is_empty();
                request.push_str(&line);
                if done {
                    break;
                }
            }
            let mut payload = vec![0u8; content_length];
            reader.read_exact(&mut payload).expect("read body");
            request.push_str(&String::from_utf8_lossy(&payload));
            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).expect("write");
            stream.flush().expect("flush");
            request
        });
        (base, handle)
    }

    fn service(base: &str) -> HttpGigService {
        HttpGigService::new(&format!("{base}/"), Duration::from_secs(5)).expect("client")
    }

    #[test]
    fn fetches_and_normalizes_gigs() {
        let (base, handle) = serve_once(
            "200 OK",
            r#"[{"id":1,"day":"S","date":"2024-06-15","artist":"Foo","type":"Club","venue":"V1","location":"City"},
                {"id":2,"day":"F","date":"2024-06-14","artist":"Bar","type":["Gig","Club"],"venue":"V2","location":"Town","interested":[{"name":"Ana"}]}]"#,
        );
        let gigs = service(&base).fetch_gigs().expect("fetch");
        let request = handle.join().expect("server thread");

        assert!(request.starts_with("GET /gigs HTTP/1.1"));
        assert_eq!(gigs.len(), 2);
        assert_eq!(gigs[0].types, vec!["Club".to_string()]);
        assert_eq!(gigs[1].interested_names(), vec!["Ana"]);
    }

    #[test]
    fn posts_new_gig_and_returns_created_record() {
        let (base, handle) = serve_once(
            "201 Created",
            r#"{"id":"g-9","day":"F","date":"2024-06-14","artist":"Foo","type":["Gig"],"venue":"V1","location":"City"}"#,
        );
        let date = NaiveDate::from_ymd_opt(2024, 6, 14).expect("date");
        let new_gig = NewGig::new(date, "Foo", &[GigType::Gig], "V1", "City");
        let created = service(&base).create_gig(&new_gig).expect("create");
        let request = handle.join().expect("server thread");

        assert!(request.starts_with("POST /gigs HTTP/1.1"));
        let body = &request[request.find("\r\n\r\n").expect("headers end") + 4..];
        let sent: NewGig = serde_json::from_str(body).expect("json body");
        assert_eq!(sent, new_gig);
        assert_eq!(created.id, GigId::Text("g-9".to_string()));
    }

    #[test]
    fn non_success_status_is_reported() {
        let (base, handle) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#);
        let err = service(&base).fetch_gigs().expect_err("should fail");
        handle.join().expect("server thread");
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let (base, handle) = serve_once("200 OK", r#"{"not":"a list"}"#);
        let err = service(&base).fetch_gigs().expect_err("should fail");
        handle.join().expect("server thread");
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let svc = service("http://localhost:5000");
        assert_eq!(svc.gigs_url(), "http://localhost:5000/gigs");
    }
}
