use lambda_http::{
    http::{header::HeaderValue, Method, StatusCode},
    Body, Error, Request, Response,
};
use std::sync::Arc;
use todo_atoms::tasks;
use todo_shared::AppState;

use crate::static_files;

const TASK_ENDPOINTS: [&str; 4] = ["get_todos", "add_todo", "complete_todo", "delete_todo"];

fn with_cors_headers(mut resp: Response<Body>, cors_origin: &str) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(cors_origin).unwrap_or_else(|_| HeaderValue::from_static("*")),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type"),
    );

    resp
}

fn finalize_response(
    resp: Result<Response<Body>, Error>,
    cors_origin: &str,
) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(r, cors_origin))
}

/// Main Lambda handler - serves the client page and routes /api/* to the task handlers
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method().clone();
    let path = event.uri().path().to_string();
    let cors_origin = state.config.cors_origin.as_str();
    tracing::info!("📝 Todo API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if method == Method::OPTIONS {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp, cors_origin));
    }

    // Client page and its assets
    if let Some(asset) = static_files::lookup(&path) {
        let resp = match method {
            Method::GET | Method::HEAD => static_files::serve(asset),
            _ => method_not_allowed(),
        };
        return finalize_response(resp, cors_origin);
    }

    // Task routes; the legacy `.php` names stay valid for older clients
    if let Some(endpoint) = path.strip_prefix("/api/") {
        let endpoint = endpoint.strip_suffix(".php").unwrap_or(endpoint);
        let store = state.store.as_ref();

        let resp = match (&method, endpoint) {
            // GET /api/get_todos - list all todos, newest first
            (&Method::GET, "get_todos") => tasks::list_tasks_handler(store).await,
            // POST /api/add_todo - create todo from `task`
            (&Method::POST, "add_todo") => tasks::create_task_handler(store, &event).await,
            // POST /api/complete_todo - toggle completion of `id`
            (&Method::POST, "complete_todo") => tasks::toggle_task_handler(store, &event).await,
            // POST /api/delete_todo - delete `id`
            (&Method::POST, "delete_todo") => tasks::delete_task_handler(store, &event).await,
            (_, endpoint) if TASK_ENDPOINTS.contains(&endpoint) => method_not_allowed(),
            _ => not_found(),
        };

        return finalize_response(resp, cors_origin);
    }

    // No matching route
    tracing::warn!("⚠️ No route matched - Method: {} Path: {}", method, path);
    finalize_response(not_found(), cors_origin)
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .body(
            serde_json::json!({"error": "Method not allowed"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .body(serde_json::json!({"error": "Not found"}).to_string().into())
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use todo_atoms::tasks::MemoryTaskStore;
    use todo_shared::{Config, StoreConfig};

    fn state() -> Arc<AppState> {
        let config = Config {
            store: StoreConfig::Memory,
            cors_origin: "https://todo.example".to_string(),
        };
        Arc::new(AppState::with_store(config, Arc::new(MemoryTaskStore::new())))
    }

    fn get(path: &str) -> Request {
        lambda_http::http::Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::Empty)
            .unwrap()
    }

    fn post_form(path: &str, body: &str) -> Request {
        lambda_http::http::Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn call(state: &Arc<AppState>, event: Request) -> (StatusCode, Value) {
        let resp = function_handler(event, Arc::clone(state)).await.unwrap();
        let body = match resp.body() {
            Body::Text(text) => serde_json::from_str(text).unwrap_or(Value::Null),
            _ => Value::Null,
        };
        (resp.status(), body)
    }

    #[tokio::test]
    async fn buy_milk_round_trip() {
        let state = state();

        let (status, created) = call(&state, post_form("/api/add_todo", "task=Buy%20milk")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["success"], json!(true));
        assert_eq!(created["todo"]["task"], json!("Buy milk"));
        assert_eq!(created["todo"]["completed"], json!(0));
        let id = created["todo"]["id"].as_i64().unwrap();

        let (_, toggled) = call(&state, post_form("/api/complete_todo", &format!("id={}", id))).await;
        assert_eq!(toggled, json!({"success": true}));

        let (_, listed) = call(&state, get("/api/get_todos")).await;
        let row = listed
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["id"] == json!(id))
            .unwrap();
        assert_eq!(row["completed"], json!(1));

        let (_, deleted) = call(&state, post_form("/api/delete_todo", &format!("id={}", id))).await;
        assert_eq!(deleted, json!({"success": true}));

        let (_, listed) = call(&state, get("/api/get_todos")).await;
        assert!(listed.as_array().unwrap().iter().all(|t| t["id"] != json!(id)));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_empty_when_nothing_exists() {
        let state = state();
        let (_, listed) = call(&state, get("/api/get_todos")).await;
        assert_eq!(listed, json!([]));

        for text in ["first", "second", "third"] {
            call(&state, post_form("/api/add_todo", &format!("task={}", text))).await;
        }

        let (_, listed) = call(&state, get("/api/get_todos")).await;
        let names: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["task"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn legacy_php_paths_still_route() {
        let state = state();
        let (_, created) = call(&state, post_form("/api/add_todo.php", "task=legacy")).await;
        assert_eq!(created["success"], json!(true));

        let (_, listed) = call(&state, get("/api/get_todos.php")).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_routes_and_wrong_methods() {
        let state = state();

        let (status, body) = call(&state, get("/api/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Not found"}));

        let (status, _) = call(&state, get("/somewhere/else")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(&state, get("/api/add_todo")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"error": "Method not allowed"}));

        let (status, _) = call(&state, post_form("/api/get_todos", "")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn preflight_and_cors_headers() {
        let state = state();
        let event = lambda_http::http::Request::builder()
            .method("OPTIONS")
            .uri("/api/add_todo")
            .body(Body::Empty)
            .unwrap();

        let resp = function_handler(event, Arc::clone(&state)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["Access-Control-Allow-Origin"],
            "https://todo.example"
        );

        let resp = function_handler(get("/api/get_todos"), Arc::clone(&state))
            .await
            .unwrap();
        assert_eq!(
            resp.headers()["Access-Control-Allow-Origin"],
            "https://todo.example"
        );
    }

    #[tokio::test]
    async fn serves_the_client_page() {
        let state = state();
        let resp = function_handler(get("/"), Arc::clone(&state)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["Content-Type"],
            "text/html; charset=utf-8"
        );
        match resp.body() {
            Body::Text(html) => assert!(html.contains("id=\"new-todo\"")),
            other => panic!("unexpected body {:?}", other),
        }
    }
}
