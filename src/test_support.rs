//! In-process HTTP stub for exercising manifest fetches and reachability probes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// A canned response keyed by method and path. Method `*` matches any method.
pub struct Route {
    pub method: &'static str,
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn new(method: &'static str, path: impl Into<String>, status: u16) -> Self {
        Self {
            method,
            path: path.into(),
            status,
            body: String::new(),
        }
    }

    pub fn any(path: impl Into<String>, status: u16) -> Self {
        Self::new("*", path, status)
    }

    pub fn json(path: impl Into<String>, body: &serde_json::Value) -> Self {
        Self {
            body: body.to_string(),
            ..Self::new("GET", path, 200)
        }
    }
}

/// `tiny_http` server on `127.0.0.1:<random>` that answers from a route table
/// (404 otherwise) and records every `(method, path)` it receives.
pub struct StubServer {
    base: String,
    server: Arc<tiny_http::Server>,
    routes: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    hits: Arc<Mutex<Vec<(String, String)>>>,
    thread: Option<JoinHandle<()>>,
}

impl StubServer {
    pub fn start(routes: Vec<Route>) -> Self {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").expect("bind stub server"));
        let port = server
            .server_addr()
            .to_ip()
            .map(|a| a.port())
            .expect("stub server port");

        let table: HashMap<(String, String), (u16, String)> = routes
            .into_iter()
            .map(|r| ((r.method.to_string(), r.path), (r.status, r.body)))
            .collect();
        let table = Arc::new(Mutex::new(table));
        let hits = Arc::new(Mutex::new(Vec::new()));

        let thread = {
            let server = Arc::clone(&server);
            let table = Arc::clone(&table);
            let hits = Arc::clone(&hits);
            std::thread::spawn(move || {
                for request in server.incoming_requests() {
                    let method = request.method().to_string().to_ascii_uppercase();
                    let path = request.url().to_string();
                    hits.lock().unwrap().push((method.clone(), path.clone()));

                    let (status, body) = {
                        let table = table.lock().unwrap();
                        table
                            .get(&(method, path.clone()))
                            .or_else(|| table.get(&("*".to_string(), path)))
                            .cloned()
                            .unwrap_or((404, String::new()))
                    };
                    let response = tiny_http::Response::from_string(body).with_status_code(status);
                    let _ = request.respond(response);
                }
            })
        };

        Self {
            base: format!("http://127.0.0.1:{port}"),
            server,
            routes: table,
            hits,
            thread: Some(thread),
        }
    }

    /// Add or replace a route while the server is running.
    pub fn set(&self, route: Route) {
        self.routes
            .lock()
            .unwrap()
            .insert((route.method.to_string(), route.path), (route.status, route.body));
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Requests received for `path` with the given method.
    pub fn hits(&self, method: &str, path: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p)| m == method && p == path)
            .count()
    }

    /// Requests received for any path other than `except`.
    pub fn hits_excluding(&self, except: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|(_, p)| p != except).count()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// A URL on a port nothing listens on.
pub fn refused_url(path: &str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let port = listener.local_addr().expect("probe port").port();
    drop(listener);
    format!("http://127.0.0.1:{port}{path}")
}
