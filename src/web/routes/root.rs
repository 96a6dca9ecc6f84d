use axum::response::Redirect;

pub const INDEX_PATH: &str = "/static/index.html";

pub async fn root_redirect_handler() -> Redirect {
    Redirect::temporary(INDEX_PATH)
}
