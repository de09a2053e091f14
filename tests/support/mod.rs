//! Scripted transport shared by the behavior tests.
//!
//! Replies are registered per path plus a set of query parameters that must
//! match. A gated reply stays pending until the test sends it through the
//! returned `oneshot::Sender`, which makes out-of-order completion
//! deterministic.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use cotacoes_core::{
    ClientConfig, CotacoesApi, HttpClient, HttpCotacoesApi, HttpError, HttpRequest, HttpResponse,
};
use tokio::sync::oneshot;

pub type Reply = Result<HttpResponse, HttpError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

struct Route {
    path: String,
    params: Vec<(String, String)>,
    replies: VecDeque<Scripted>,
}

impl Route {
    fn matches(&self, request: &HttpRequest) -> bool {
        request.url.ends_with(&self.path)
            && self
                .params
                .iter()
                .all(|(name, value)| request.query_param(name) == Some(value.as_str()))
    }
}

#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, path: &str, params: &[(&str, &str)], reply: Reply) {
        self.push(path, params, Scripted::Ready(reply));
    }

    pub fn respond_json(&self, path: &str, params: &[(&str, &str)], body: serde_json::Value) {
        self.respond(path, params, Ok(HttpResponse::ok_json(body.to_string())));
    }

    /// Register a reply that is only delivered once the sender fires.
    pub fn gate(&self, path: &str, params: &[(&str, &str)]) -> oneshot::Sender<Reply> {
        let (sender, receiver) = oneshot::channel();
        self.push(path, params, Scripted::Gated(receiver));
        sender
    }

    /// Requests seen so far, in arrival order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.url.ends_with(path))
            .count()
    }

    fn push(&self, path: &str, params: &[(&str, &str)], scripted: Scripted) {
        let mut routes = self.routes.lock().expect("routes lock");
        let params: Vec<(String, String)> = params
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();

        if let Some(route) = routes
            .iter_mut()
            .find(|route| route.path == path && route.params == params)
        {
            route.replies.push_back(scripted);
            return;
        }
        routes.push(Route {
            path: path.to_owned(),
            params,
            replies: VecDeque::from([scripted]),
        });
    }

    fn next_reply(&self, request: &HttpRequest) -> Option<Scripted> {
        let mut routes = self.routes.lock().expect("routes lock");
        routes
            .iter_mut()
            .filter(|route| route.matches(request))
            .find_map(|route| route.replies.pop_front())
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            self.requests
                .lock()
                .expect("requests lock")
                .push(request.clone());

            match self.next_reply(&request) {
                Some(Scripted::Ready(reply)) => reply,
                Some(Scripted::Gated(receiver)) => receiver
                    .await
                    .unwrap_or_else(|_| Err(HttpError::new("gate dropped"))),
                None => Ok(HttpResponse::with_status(
                    404,
                    r#"{"error":"no scripted response"}"#,
                )),
            }
        })
    }
}

pub fn api(client: &Arc<ScriptedHttpClient>) -> Arc<dyn CotacoesApi> {
    Arc::new(HttpCotacoesApi::new(
        Arc::clone(client) as Arc<dyn HttpClient>,
        ClientConfig::default(),
    ))
}

pub fn transport_failure(message: &str) -> Reply {
    Err(HttpError::new(message))
}
