//! Routes served by the sample server.

use remux_router::{Method, PatternError, Request, Response, Router};
use serde_json::json;

/// Builds the route table.
pub fn router() -> Result<Router, PatternError> {
    let mut router = Router::new();
    router.route("/", index)?.name("index");
    router
        .route("/users/(?P<id>[0-9]+)", user_detail)?
        .name("user-detail")
        .methods([Method::Get, Method::Head]);
    router
        .route("/users", create_user)?
        .name("users")
        .methods([Method::Post]);
    router
        .route("/admin/(?P<page>[a-z]+)", admin_page)?
        .name("admin")
        .values([("section", "admin")]);
    Ok(router)
}

async fn index(_req: Request) -> Response {
    Response::text("hello world!")
}

async fn user_detail(req: Request) -> Response {
    Response::json(&json!({ "id": req.params().get("id") }))
}

async fn create_user(req: Request) -> Response {
    Response::json(&json!({ "received": req.body.len() })).status(201)
}

async fn admin_page(req: Request) -> Response {
    Response::json(&json!({
        "page": req.params().get("page"),
        "section": req.value("section"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_index() {
        let router = router().unwrap();
        let res = router.handle(Request::get("/")).await;
        assert_eq!(res.body_string(), Some("hello world!".to_string()));
    }

    #[tokio::test]
    async fn test_extension_method() {
        let router = router().unwrap();
        let res = router
            .handle(Request::new(Method::parse("PROPFIND"), "/"))
            .await;
        assert_eq!(res.status, 200);

        let res = router
            .handle(Request::new(Method::parse("PROPFIND"), "/nowhere"))
            .await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn test_user_detail() {
        let router = router().unwrap();
        let res = router.handle(Request::get("/users/42")).await;
        assert_eq!(res.body_string(), Some(r#"{"id":"42"}"#.to_string()));

        let res = router.handle(Request::new(Method::Delete, "/users/42")).await;
        assert_eq!(res.status, 405);
    }

    #[tokio::test]
    async fn test_create_user() {
        let router = router().unwrap();
        let res = router
            .handle(Request::post("/users").body(r#"{"name":"ada"}"#))
            .await;
        assert_eq!(res.status, 201);

        let res = router.handle(Request::get("/users")).await;
        assert_eq!(res.status, 405);
    }

    #[tokio::test]
    async fn test_admin_section() {
        let router = router().unwrap();
        let res = router.handle(Request::get("/admin/settings")).await;
        let body: serde_json::Value = serde_json::from_slice(&res.body).unwrap();
        assert_eq!(body, json!({"page": "settings", "section": "admin"}));
    }

    #[test]
    fn test_reverse_routes() {
        let router = router().unwrap();
        let params = [("id".to_string(), "7".to_string())].into();
        assert_eq!(router.reverse("user-detail", &params).unwrap(), "/users/7");
        assert_eq!(router.reverse("index", &params).unwrap(), "/");
    }
}
