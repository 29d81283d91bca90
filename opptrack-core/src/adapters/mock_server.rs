//! Mock opportunities backend for testing
//!
//! A small HTTP server on a random local port that behaves like the tracker
//! backend closely enough to exercise the HTTP client end to end:
//! - POST /signup and POST /login issue `token`, `userID` and `username` cookies
//! - GET /opportunities/{userId} returns the stored list (`null` when empty)
//! - POST /opportunity/{userId} stores a record and returns { insertedId }
//! - GET /opportunity/{id}, PUT /opportunity
//! - DELETE /opportunity/{userId}/{id} and DELETE /opportunities/{userId}
//!
//! Opportunity routes require the `token` cookie. Every request is recorded.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value as JsonValue};

/// Credentials the mock accepts
pub const MOCK_EMAIL: &str = "jane@example.com";
pub const MOCK_PASSWORD: &str = "hunter2";
pub const MOCK_USER_ID: &str = "u-1";
pub const MOCK_TOKEN: &str = "tok-1";

/// A request as the mock received it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub cookie: Option<String>,
    pub body: Option<JsonValue>,
}

/// Configuration for the mock backend
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Records present when the server starts
    pub opportunities: Vec<JsonValue>,
    /// Answer every opportunity route with this status instead
    pub fail_status: Option<u16>,
    /// Email addresses signup rejects as taken
    pub taken_emails: Vec<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            opportunities: Vec::new(),
            fail_status: None,
            taken_emails: vec![MOCK_EMAIL.to_string()],
        }
    }
}

#[derive(Debug)]
struct MockState {
    config: MockConfig,
    opportunities: Mutex<Vec<JsonValue>>,
    requests: Mutex<Vec<RecordedRequest>>,
    next_id: AtomicU64,
}

/// Mock backend server for testing
pub struct MockOpportunityServer {
    port: u16,
    running: Arc<AtomicBool>,
    state: Arc<MockState>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockOpportunityServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let state = Arc::new(MockState {
            opportunities: Mutex::new(config.opportunities.clone()),
            config,
            requests: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        });

        // Non-blocking accept so stop() is noticed
        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let state_clone = state.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let state = state_clone.clone();
                        thread::spawn(move || handle_connection(stream, &state));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            state,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Records currently stored
    pub fn opportunities(&self) -> Vec<JsonValue> {
        self.state.opportunities.lock().unwrap().clone()
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockOpportunityServer {
    fn drop(&mut self) {
        self.stop();
    }
}

struct ParsedRequest {
    method: String,
    path: String,
    cookie: Option<String>,
    body: Vec<u8>,
}

fn read_request(stream: &mut TcpStream) -> Option<ParsedRequest> {
    let mut data = Vec::new();
    let mut buffer = [0; 4096];

    let header_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let mut content_length = 0usize;
    let mut cookie = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "cookie" => cookie = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    let mut body = data[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buffer[..n]);
    }

    Some(ParsedRequest {
        method,
        path,
        cookie,
        body,
    })
}

fn handle_connection(mut stream: TcpStream, state: &MockState) {
    // Accepted sockets may inherit non-blocking mode from the listener
    let _ = stream.set_nonblocking(false);

    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let body: Option<JsonValue> = serde_json::from_slice(&request.body).ok();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: request.method.clone(),
        path: request.path.clone(),
        cookie: request.cookie.clone(),
        body: body.clone(),
    });

    let segments: Vec<&str> = request
        .path
        .split('?')
        .next()
        .unwrap_or("")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    match (request.method.as_str(), segments.as_slice()) {
        ("POST", ["signup"]) => handle_signup(&mut stream, state, body.as_ref()),
        ("POST", ["login"]) => handle_login(&mut stream, body.as_ref()),
        (_, [first, ..]) if *first == "opportunity" || *first == "opportunities" => {
            let authorized = request
                .cookie
                .as_deref()
                .is_some_and(|c| c.contains(&format!("token={}", MOCK_TOKEN)));
            if !authorized {
                send_json(&mut stream, 401, r#"{"error": "Unauthorized"}"#, &[]);
                return;
            }
            if let Some(status) = state.config.fail_status {
                send_json(&mut stream, status, r#"{"error": "Something went wrong"}"#, &[]);
                return;
            }
            handle_opportunities(&mut stream, state, &request.method, &segments, body)
        }
        _ => send_json(&mut stream, 404, r#"{"error": "Not found"}"#, &[]),
    }
}

fn session_cookies(username: &str) -> Vec<String> {
    vec![
        format!("token={}; Path=/; Max-Age=86400; HttpOnly", MOCK_TOKEN),
        format!("userID={}; Path=/; Max-Age=86400", MOCK_USER_ID),
        format!("username={}; Path=/; Max-Age=86400", username.replace(' ', "+")),
    ]
}

fn handle_signup(stream: &mut TcpStream, state: &MockState, body: Option<&JsonValue>) {
    let email = body.and_then(|b| b["email"].as_str()).unwrap_or("");
    if state.config.taken_emails.iter().any(|e| e == email) {
        send_json(stream, 409, r#"{"error": "Email already in use"}"#, &[]);
        return;
    }
    let username = body.and_then(|b| b["username"].as_str()).unwrap_or("");
    send_json(stream, 200, r#"{"success": "User created"}"#, &session_cookies(username));
}

fn handle_login(stream: &mut TcpStream, body: Option<&JsonValue>) {
    let email = body.and_then(|b| b["email"].as_str());
    let password = body.and_then(|b| b["password"].as_str());
    if email == Some(MOCK_EMAIL) && password == Some(MOCK_PASSWORD) {
        send_json(stream, 200, r#"{"success": "Logged in"}"#, &session_cookies("Jane Doe"));
    } else {
        send_json(stream, 401, r#"{"error": "Invalid credentials"}"#, &[]);
    }
}

fn handle_opportunities(
    stream: &mut TcpStream,
    state: &MockState,
    method: &str,
    segments: &[&str],
    body: Option<JsonValue>,
) {
    let mut stored = state.opportunities.lock().unwrap();
    match (method, segments) {
        ("GET", ["opportunities", _user]) => {
            let json = if stored.is_empty() {
                "null".to_string()
            } else {
                serde_json::to_string(&*stored).unwrap()
            };
            send_json(stream, 200, &json, &[]);
        }
        ("GET", ["opportunity", id]) => match stored.iter().find(|o| o["ID"] == *id) {
            Some(found) => send_json(stream, 200, &found.to_string(), &[]),
            None => send_json(stream, 500, r#"{"error ": "mongo: no documents in result"}"#, &[]),
        },
        ("POST", ["opportunity", user]) => {
            let Some(mut record) = body else {
                send_json(stream, 400, r#"{"error": "invalid body"}"#, &[]);
                return;
            };
            let id = format!("opp-{}", state.next_id.fetch_add(1, Ordering::SeqCst));
            record["ID"] = json!(id);
            record["user_id"] = json!(user);
            stored.push(record);
            send_json(stream, 200, &json!({ "insertedId": id }).to_string(), &[]);
        }
        ("PUT", ["opportunity"]) => {
            let Some(record) = body else {
                send_json(stream, 400, r#"{"error": "invalid body"}"#, &[]);
                return;
            };
            if let Some(existing) = stored.iter_mut().find(|o| o["ID"] == record["ID"]) {
                *existing = record.clone();
            }
            send_json(stream, 200, &record.to_string(), &[]);
        }
        ("DELETE", ["opportunity", _user, id]) => {
            let before = stored.len();
            stored.retain(|o| o["ID"] != *id);
            if stored.len() == before {
                let msg = format!(
                    "No opportunity with id : {} was found, no deletion occurred.",
                    id
                );
                send_json(stream, 400, &json!({ "error": msg }).to_string(), &[]);
            } else {
                send_json(stream, 200, r#"{"success": "deleted"}"#, &[]);
            }
        }
        ("DELETE", ["opportunities", _user]) => {
            stored.clear();
            send_json(stream, 200, r#"{"success": "All opportunities deleted."}"#, &[]);
        }
        _ => send_json(stream, 405, r#"{"error": "Method not allowed"}"#, &[]),
    }
}

fn send_json(stream: &mut TcpStream, status: u16, body: &str, cookies: &[String]) {
    let status_text = match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        _ => "Internal Server Error",
    };
    let mut response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        status_text,
        body.len()
    );
    for cookie in cookies {
        response.push_str(&format!("Set-Cookie: {}\r\n", cookie));
    }
    response.push_str("\r\n");
    response.push_str(body);

    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rust_decimal::Decimal;

    use crate::adapters::{CookieJar, HttpApiClient};
    use crate::domain::result::Error;
    use crate::domain::{
        LoginRequest, NewOpportunity, OpportunityStatus, OpportunityUpdate, SignupRequest,
        TOKEN_COOKIE, USERNAME_COOKIE, USER_ID_COOKIE,
    };
    use crate::ports::{CookieStore, OpportunityApi};

    fn client_for(server: &MockOpportunityServer) -> (HttpApiClient, Arc<CookieJar>) {
        let jar = Arc::new(CookieJar::in_memory());
        let client =
            HttpApiClient::with_base_url(&server.base_url(), Duration::from_secs(5), jar.clone())
                .unwrap();
        (client, jar)
    }

    fn login_request(password: &str) -> LoginRequest {
        LoginRequest {
            email: MOCK_EMAIL.to_string(),
            password: password.to_string(),
        }
    }

    fn stored(id: &str, name: &str, value: f64) -> JsonValue {
        json!({ "ID": id, "name": name, "value": value, "status": "open", "user_id": MOCK_USER_ID })
    }

    #[tokio::test]
    async fn test_login_stores_session_cookies() {
        let server = MockOpportunityServer::start(MockConfig::default()).unwrap();
        let (client, jar) = client_for(&server);

        client.login(&login_request(MOCK_PASSWORD)).await.unwrap();

        assert_eq!(jar.get(TOKEN_COOKIE).as_deref(), Some(MOCK_TOKEN));
        assert_eq!(jar.get(USER_ID_COOKIE).as_deref(), Some(MOCK_USER_ID));
        assert_eq!(jar.get(USERNAME_COOKIE).as_deref(), Some("Jane+Doe"));
        assert!(jar.cookies().iter().all(|c| c.domain.as_deref() == Some("127.0.0.1")));

        let requests = server.requests();
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/login");
        assert_eq!(requests[0].body.as_ref().unwrap()["email"], MOCK_EMAIL);
    }

    #[tokio::test]
    async fn test_login_failure_carries_server_error() {
        let server = MockOpportunityServer::start(MockConfig::default()).unwrap();
        let (client, jar) = client_for(&server);

        let err = client.login(&login_request("wrong")).await.unwrap_err();
        assert!(matches!(err, Error::Http { status: 401, .. }));
        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert!(jar.cookies().is_empty());
    }

    #[tokio::test]
    async fn test_signup_conflict() {
        let server = MockOpportunityServer::start(MockConfig::default()).unwrap();
        let (client, _jar) = client_for(&server);

        let request = SignupRequest {
            username: "Jane".to_string(),
            email: MOCK_EMAIL.to_string(),
            password: "pw".to_string(),
        };
        let err = client.signup(&request).await.unwrap_err();
        assert_eq!(err.server_message(), Some("Email already in use"));
    }

    #[tokio::test]
    async fn test_signup_sends_all_fields() {
        let server = MockOpportunityServer::start(MockConfig::default()).unwrap();
        let (client, jar) = client_for(&server);

        let request = SignupRequest {
            username: "Sam Lee".to_string(),
            email: "sam@example.com".to_string(),
            password: "pw".to_string(),
        };
        client.signup(&request).await.unwrap();

        let body = server.requests()[0].body.clone().unwrap();
        assert_eq!(body, json!({"username": "Sam Lee", "email": "sam@example.com", "password": "pw"}));
        assert_eq!(jar.get(USERNAME_COOKIE).as_deref(), Some("Sam+Lee"));
    }

    #[tokio::test]
    async fn test_null_list_is_empty() {
        let server = MockOpportunityServer::start(MockConfig::default()).unwrap();
        let (client, _jar) = client_for(&server);
        client.login(&login_request(MOCK_PASSWORD)).await.unwrap();

        let list = client.list_opportunities(MOCK_USER_ID).await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_requests_carry_session_cookie() {
        let server = MockOpportunityServer::start(MockConfig {
            opportunities: vec![stored("a1", "Deal A", 1500.0)],
            ..Default::default()
        })
        .unwrap();
        let (client, _jar) = client_for(&server);

        // Without logging in first the backend refuses
        let err = client.list_opportunities(MOCK_USER_ID).await.unwrap_err();
        assert!(matches!(err, Error::Http { status: 401, .. }));

        client.login(&login_request(MOCK_PASSWORD)).await.unwrap();
        let list = client.list_opportunities(MOCK_USER_ID).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "a1");
        assert_eq!(list[0].value, Decimal::new(1500, 0));

        let last = server.requests().pop().unwrap();
        assert_eq!(last.path, "/opportunities/u-1");
        assert!(last.cookie.unwrap().contains("token=tok-1"));
    }

    #[tokio::test]
    async fn test_add_update_delete_round_trip() {
        let server = MockOpportunityServer::start(MockConfig::default()).unwrap();
        let (client, _jar) = client_for(&server);
        client.login(&login_request(MOCK_PASSWORD)).await.unwrap();

        let inserted = client
            .add_opportunity(MOCK_USER_ID, &NewOpportunity::open("Deal A", Decimal::new(1500, 0)))
            .await
            .unwrap();
        let id = inserted.expect("server returns insertedId");

        let add = server.requests().pop().unwrap();
        assert_eq!(add.path, "/opportunity/u-1");
        assert_eq!(add.body.unwrap(), json!({"name": "Deal A", "value": 1500, "status": "open"}));

        let fetched = client.get_opportunity(&id).await.unwrap();
        assert_eq!(fetched.name, "Deal A");

        client
            .update_opportunity(&OpportunityUpdate {
                id: id.clone(),
                name: "Deal A".to_string(),
                value: Decimal::new(2000, 0),
                status: OpportunityStatus::Won,
                user_id: MOCK_USER_ID.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(server.opportunities()[0]["status"], "won");

        client.delete_opportunity(MOCK_USER_ID, &id).await.unwrap();
        let delete = server.requests().pop().unwrap();
        assert_eq!(delete.method, "DELETE");
        assert_eq!(delete.path, format!("/opportunity/u-1/{}", id));
        assert!(server.opportunities().is_empty());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_fails_with_message() {
        let server = MockOpportunityServer::start(MockConfig::default()).unwrap();
        let (client, _jar) = client_for(&server);
        client.login(&login_request(MOCK_PASSWORD)).await.unwrap();

        let err = client.delete_opportunity(MOCK_USER_ID, "abc123").await.unwrap_err();
        assert!(matches!(err, Error::Http { status: 400, .. }));
        assert!(err.server_message().unwrap().contains("abc123"));
    }

    #[tokio::test]
    async fn test_clear_all() {
        let server = MockOpportunityServer::start(MockConfig {
            opportunities: vec![stored("a1", "A", 1.0), stored("b2", "B", 2.0)],
            ..Default::default()
        })
        .unwrap();
        let (client, _jar) = client_for(&server);
        client.login(&login_request(MOCK_PASSWORD)).await.unwrap();

        client.clear_opportunities(MOCK_USER_ID).await.unwrap();
        let clear = server.requests().pop().unwrap();
        assert_eq!((clear.method.as_str(), clear.path.as_str()), ("DELETE", "/opportunities/u-1"));
        assert!(server.opportunities().is_empty());
    }

    #[tokio::test]
    async fn test_server_failure_status() {
        let server = MockOpportunityServer::start(MockConfig {
            fail_status: Some(500),
            ..Default::default()
        })
        .unwrap();
        let (client, _jar) = client_for(&server);
        client.login(&login_request(MOCK_PASSWORD)).await.unwrap();

        let err = client.list_opportunities(MOCK_USER_ID).await.unwrap_err();
        assert!(matches!(err, Error::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Grab a free port, then close it so nothing is listening
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = HttpApiClient::with_base_url(
            &format!("http://127.0.0.1:{}", port),
            Duration::from_secs(2),
            Arc::new(CookieJar::in_memory()),
        )
        .unwrap();

        let err = client.login(&login_request(MOCK_PASSWORD)).await.unwrap_err();
        assert!(err.is_network(), "expected network error, got {:?}", err);
    }
}
