//! In-memory board API server used as the integration-test peer.
//!
//! Mirrors the backend the client core targets: bearer-token auth, the
//! FastAPI-style `{"detail": ...}` error envelope (string form for plain
//! errors, array-of-objects form for validation failures), 204 on deletes,
//! and `skip`/`limit` pagination on list endpoints.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub profile_image: Option<String>,
    #[serde(skip)]
    password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub like_count: u64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
}

#[derive(Debug, Default)]
pub struct Store {
    users: HashMap<Uuid, User>,
    // Posts and comments keep insertion order so pagination is stable.
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: HashSet<(Uuid, Uuid)>,
    tokens: HashMap<String, Uuid>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    26
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/users", post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/users/{id}/password", patch(update_password))
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route(
            "/api/posts/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/api/comments/{id}",
            put(update_comment).delete(delete_comment),
        )
        .route("/api/posts/{id}/like", get(like_status).post(toggle_like))
        .route("/api/files/upload", post(upload_file))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// FastAPI-style string error envelope.
fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// FastAPI-style validation envelope: 422 with a list of error objects.
fn validation_error(errors: &[(&str, &str)]) -> Response {
    let details: Vec<Value> = errors
        .iter()
        .map(|(field, msg)| json!({ "loc": ["body", field], "msg": msg, "type": "value_error" }))
        .collect();
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "detail": details })),
    )
        .into_response()
}

/// Resolve the caller from the `Authorization: Bearer` header.
fn bearer_user(store: &Store, headers: &HeaderMap) -> Result<Uuid, Response> {
    let header = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Not authenticated"))?;
    store
        .tokens
        .get(token)
        .copied()
        .ok_or_else(|| detail(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

fn str_field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}

// --- auth ---

async fn login(State(db): State<Db>, Form(form): Form<LoginForm>) -> Response {
    let mut store = db.write().await;
    let user = store
        .users
        .values()
        .find(|user| user.email == form.username)
        .cloned();
    match user {
        Some(user) if user.password == form.password => {
            let token = format!("tok-{}", Uuid::new_v4());
            store.tokens.insert(token.clone(), user.id);
            Json(json!({
                "access_token": token,
                "token_type": "bearer",
                "user_id": user.id,
            }))
            .into_response()
        }
        _ => detail(StatusCode::UNAUTHORIZED, "Incorrect email or password"),
    }
}

// --- users ---

async fn create_user(State(db): State<Db>, Json(body): Json<Value>) -> Response {
    let email = str_field(&body, "email");
    let password = str_field(&body, "password");
    let nickname = str_field(&body, "nickname");

    let mut errors = Vec::new();
    if email.is_empty() {
        errors.push(("email", "field required"));
    }
    if password.is_empty() {
        errors.push(("password", "field required"));
    }
    if nickname.is_empty() {
        errors.push(("nickname", "field required"));
    }
    if !errors.is_empty() {
        return validation_error(&errors);
    }

    let mut store = db.write().await;
    if store.users.values().any(|user| user.email == email) {
        return detail(StatusCode::BAD_REQUEST, "Email already registered");
    }
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        nickname: nickname.to_string(),
        profile_image: body
            .get("profile_image")
            .and_then(Value::as_str)
            .map(String::from),
        password: password.to_string(),
    };
    store.users.insert(user.id, user.clone());
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn get_user(State(db): State<Db>, headers: HeaderMap, Path(id): Path<Uuid>) -> Response {
    let store = db.read().await;
    if let Err(response) = bearer_user(&store, &headers) {
        return response;
    }
    match store.users.get(&id) {
        Some(user) => Json(user.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn update_user(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = db.write().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    if caller != id {
        return detail(StatusCode::FORBIDDEN, "Not allowed");
    }
    let Some(user) = store.users.get_mut(&id) else {
        return detail(StatusCode::NOT_FOUND, "User not found");
    };
    if let Some(nickname) = body.get("nickname").and_then(Value::as_str) {
        user.nickname = nickname.to_string();
    }
    if let Some(image) = body.get("profile_image").and_then(Value::as_str) {
        user.profile_image = Some(image.to_string());
    }
    Json(user.clone()).into_response()
}

async fn update_password(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = db.write().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    if caller != id {
        return detail(StatusCode::FORBIDDEN, "Not allowed");
    }
    let password = str_field(&body, "password");
    if password.is_empty() {
        return validation_error(&[("password", "field required")]);
    }
    let Some(user) = store.users.get_mut(&id) else {
        return detail(StatusCode::NOT_FOUND, "User not found");
    };
    user.password = password.to_string();
    StatusCode::NO_CONTENT.into_response()
}

async fn delete_user(State(db): State<Db>, headers: HeaderMap, Path(id): Path<Uuid>) -> Response {
    let mut store = db.write().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    if caller != id {
        return detail(StatusCode::FORBIDDEN, "Not allowed");
    }
    if store.users.remove(&id).is_none() {
        return detail(StatusCode::NOT_FOUND, "User not found");
    }
    store.tokens.retain(|_, user_id| *user_id != id);
    StatusCode::NO_CONTENT.into_response()
}

// --- posts ---

async fn list_posts(State(db): State<Db>, Query(page): Query<PageQuery>) -> Json<Vec<Post>> {
    let store = db.read().await;
    let posts = store
        .posts
        .iter()
        .skip(page.skip)
        .take(page.limit)
        .cloned()
        .collect();
    Json(posts)
}

async fn create_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = db.write().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    let title = str_field(&body, "title");
    let content = str_field(&body, "content");
    let mut errors = Vec::new();
    if title.is_empty() {
        errors.push(("title", "field required"));
    }
    if content.is_empty() {
        errors.push(("content", "field required"));
    }
    if !errors.is_empty() {
        return validation_error(&errors);
    }
    let post = Post {
        id: Uuid::new_v4(),
        author_id: caller,
        title: title.to_string(),
        content: content.to_string(),
        like_count: 0,
    };
    store.posts.push(post.clone());
    (StatusCode::CREATED, Json(post)).into_response()
}

async fn get_post(State(db): State<Db>, Path(id): Path<Uuid>) -> Response {
    let store = db.read().await;
    match store.posts.iter().find(|post| post.id == id) {
        Some(post) => Json(post.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Post not found"),
    }
}

async fn update_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = db.write().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    let Some(post) = store.posts.iter_mut().find(|post| post.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Post not found");
    };
    if post.author_id != caller {
        return detail(StatusCode::FORBIDDEN, "Not allowed");
    }
    if let Some(title) = body.get("title").and_then(Value::as_str) {
        post.title = title.to_string();
    }
    if let Some(content) = body.get("content").and_then(Value::as_str) {
        post.content = content.to_string();
    }
    Json(post.clone()).into_response()
}

async fn delete_post(State(db): State<Db>, headers: HeaderMap, Path(id): Path<Uuid>) -> Response {
    let mut store = db.write().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    let Some(position) = store.posts.iter().position(|post| post.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Post not found");
    };
    if store.posts[position].author_id != caller {
        return detail(StatusCode::FORBIDDEN, "Not allowed");
    }
    store.posts.remove(position);
    store.comments.retain(|comment| comment.post_id != id);
    store.likes.retain(|(_, post_id)| *post_id != id);
    StatusCode::NO_CONTENT.into_response()
}

// --- comments ---

async fn list_comments(
    State(db): State<Db>,
    Path(post_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> Response {
    let store = db.read().await;
    if !store.posts.iter().any(|post| post.id == post_id) {
        return detail(StatusCode::NOT_FOUND, "Post not found");
    }
    let comments: Vec<Comment> = store
        .comments
        .iter()
        .filter(|comment| comment.post_id == post_id)
        .skip(page.skip)
        .take(page.limit)
        .cloned()
        .collect();
    Json(comments).into_response()
}

async fn create_comment(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(post_id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = db.write().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    if !store.posts.iter().any(|post| post.id == post_id) {
        return detail(StatusCode::NOT_FOUND, "Post not found");
    }
    let content = str_field(&body, "content");
    if content.is_empty() {
        return validation_error(&[("content", "content must not be empty")]);
    }
    let comment = Comment {
        id: Uuid::new_v4(),
        post_id,
        author_id: caller,
        content: content.to_string(),
    };
    store.comments.push(comment.clone());
    (StatusCode::CREATED, Json(comment)).into_response()
}

async fn update_comment(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = db.write().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    let Some(comment) = store.comments.iter_mut().find(|comment| comment.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Comment not found");
    };
    if comment.author_id != caller {
        return detail(StatusCode::FORBIDDEN, "Not allowed");
    }
    let content = str_field(&body, "content");
    if content.is_empty() {
        return validation_error(&[("content", "content must not be empty")]);
    }
    comment.content = content.to_string();
    Json(comment.clone()).into_response()
}

async fn delete_comment(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let mut store = db.write().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    let Some(position) = store.comments.iter().position(|comment| comment.id == id) else {
        return detail(StatusCode::NOT_FOUND, "Comment not found");
    };
    if store.comments[position].author_id != caller {
        return detail(StatusCode::FORBIDDEN, "Not allowed");
    }
    store.comments.remove(position);
    StatusCode::NO_CONTENT.into_response()
}

// --- likes ---

async fn toggle_like(State(db): State<Db>, headers: HeaderMap, Path(id): Path<Uuid>) -> Response {
    let mut store = db.write().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    if !store.posts.iter().any(|post| post.id == id) {
        return detail(StatusCode::NOT_FOUND, "Post not found");
    }
    let key = (caller, id);
    let liked = if store.likes.contains(&key) {
        store.likes.remove(&key);
        false
    } else {
        store.likes.insert(key);
        true
    };
    let like_count = store
        .likes
        .iter()
        .filter(|(_, post_id)| *post_id == id)
        .count() as u64;
    if let Some(post) = store.posts.iter_mut().find(|post| post.id == id) {
        post.like_count = like_count;
    }
    Json(json!({ "liked": liked, "like_count": like_count })).into_response()
}

async fn like_status(State(db): State<Db>, headers: HeaderMap, Path(id): Path<Uuid>) -> Response {
    let store = db.read().await;
    let caller = match bearer_user(&store, &headers) {
        Ok(caller) => caller,
        Err(response) => return response,
    };
    if !store.posts.iter().any(|post| post.id == id) {
        return detail(StatusCode::NOT_FOUND, "Post not found");
    }
    let liked = store.likes.contains(&(caller, id));
    let like_count = store
        .likes
        .iter()
        .filter(|(_, post_id)| *post_id == id)
        .count() as u64;
    Json(json!({ "liked": liked, "like_count": like_count })).into_response()
}

// --- files ---

async fn upload_file(
    State(db): State<Db>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    {
        let store = db.read().await;
        if let Err(response) = bearer_user(&store, &headers) {
            return response;
        }
    }
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some("file") {
                    continue;
                }
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(_) => return detail(StatusCode::BAD_REQUEST, "Malformed upload"),
                };
                return Json(json!({
                    "url": format!("/static/uploads/{}-{}", Uuid::new_v4(), file_name),
                    "size": bytes.len(),
                }))
                .into_response();
            }
            Ok(None) => return validation_error(&[("file", "field required")]),
            Err(_) => return detail(StatusCode::BAD_REQUEST, "Malformed upload"),
        }
    }
}
