#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use remux_router::{Method, PatternError, Request, Response, Router};

/// Answers with the extracted parameters as a JSON object.
pub async fn echo_params(req: Request) -> Response {
    let params: BTreeMap<&str, &str> = req.params().iter().collect();
    Response::json(&params)
}

/// Answers with a fixed body naming the handler.
pub fn named(label: &'static str) -> impl Fn(Request) -> std::future::Ready<Response> {
    move |_req| std::future::ready(Response::text(label))
}

pub fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn register_err(pattern: &str) -> PatternError {
    let mut router = Router::new();
    match router.route(pattern, echo_params) {
        Ok(_) => panic!("Expected registration error for: {pattern}"),
        Err(e) => e,
    }
}

/// A small application: user pages, a POST-only creation endpoint and an
/// admin area with seeded values.
pub fn app() -> Router {
    let mut router = Router::new();
    router
        .route("/", named("index"))
        .unwrap()
        .name("index");
    router
        .route("/users", named("create-user"))
        .unwrap()
        .methods([Method::Post]);
    router
        .route("/users/(?P<id>[0-9]+)", echo_params)
        .unwrap()
        .name("user-detail")
        .methods([Method::Get]);
    router
        .route("/users/(?P<id>[0-9]+)", named("update-user"))
        .unwrap()
        .methods([Method::Put, Method::Patch]);
    router
        .route("/posts/(?P<year>[0-9]{4})/(?P<slug>[a-z0-9-]+)", echo_params)
        .unwrap()
        .name("post");
    router
        .route("/admin/(?P<page>[a-z]+)", |req: Request| async move {
            let section = req.value("section").cloned().unwrap_or_default();
            Response::json(&serde_json::json!({
                "page": req.params().get("page"),
                "section": section,
            }))
        })
        .unwrap()
        .values([("section", "admin")]);
    router
}

pub fn body_json(res: &Response) -> serde_json::Value {
    serde_json::from_slice(&res.body)
        .unwrap_or_else(|e| panic!("Response body is not JSON: {e}"))
}
