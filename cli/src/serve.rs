//! HTTP front for the blog: post list, rendered posts, static files.

use std::path::PathBuf;
use std::sync::Arc;

use actix_files::{Files, NamedFile};
use actix_web::dev::{fn_service, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Serialize;

use unnotion::{
    render_index, render_page, BlockSource, Error, IndexOptions, PostSource, PostSummary,
    RenderOptions,
};

/// Body returned in place of a post that could not be rendered.
pub const ERROR_PLACEHOLDER: &str = "<p class=\"error\">Failed to load the page content.</p>";

/// Shared state of the HTTP handlers.
pub struct AppState {
    pub blocks: Arc<dyn BlockSource>,
    pub posts: Arc<dyn PostSource>,
    pub database_id: Option<String>,
    pub render_options: RenderOptions,
    pub index_options: IndexOptions,
}

impl AppState {
    fn list_posts(&self) -> unnotion::Result<Vec<PostSummary>> {
        let database_id = self
            .database_id
            .as_deref()
            .ok_or_else(|| Error::Config("no database id configured".into()))?;
        render_index(self.posts.as_ref(), database_id, &self.index_options)
    }

    fn render_post(&self, page: &str) -> unnotion::Result<String> {
        render_page(self.blocks.as_ref(), page, &self.render_options)
    }
}

#[derive(Debug, Serialize)]
struct PostContent {
    content: String,
}

/// Register the JSON API routes.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/posts", web::get().to(list_posts))
        .route("/post/{id}", web::get().to(post_content));
}

async fn list_posts(state: web::Data<AppState>) -> HttpResponse {
    let state = state.into_inner();
    let posts = match web::block(move || state.list_posts()).await {
        Ok(Ok(posts)) => posts,
        Ok(Err(e)) => {
            log::error!("Failed to fetch posts: {}", e);
            Vec::new()
        }
        Err(e) => {
            log::error!("Post listing task failed: {}", e);
            Vec::new()
        }
    };
    HttpResponse::Ok().json(posts)
}

async fn post_content(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    let state = state.into_inner();

    let result = web::block(move || {
        let html = state.render_post(&id);
        (id, html)
    })
    .await;

    match result {
        Ok((_, Ok(content))) => HttpResponse::Ok().json(PostContent { content }),
        Ok((id, Err(e))) => {
            log::error!("Failed to render post {}: {}", id, e);
            let mut response = match e {
                Error::InvalidId(_) => HttpResponse::BadRequest(),
                _ => HttpResponse::BadGateway(),
            };
            response.json(PostContent {
                content: ERROR_PLACEHOLDER.to_string(),
            })
        }
        Err(e) => {
            log::error!("Render task failed: {}", e);
            HttpResponse::BadGateway().json(PostContent {
                content: ERROR_PLACEHOLDER.to_string(),
            })
        }
    }
}

/// Run the server until interrupted.
pub fn run(state: AppState, port: u16, static_dir: PathBuf) -> std::io::Result<()> {
    let data = web::Data::new(state);

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let index = static_dir.join("index.html");
            App::new()
                .app_data(data.clone())
                .configure(api_routes)
                .service(
                    Files::new("/", static_dir.clone())
                        .index_file("index.html")
                        .default_handler(fn_service(move |req: ServiceRequest| {
                            let index = index.clone();
                            async move {
                                // Unknown paths get the front-end entry page
                                let (req, _) = req.into_parts();
                                let file = NamedFile::open_async(index).await?;
                                let res = file.into_response(&req);
                                Ok::<_, actix_web::Error>(ServiceResponse::new(req, res))
                            }
                        })),
                )
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use unnotion::model::{ListPage, PageObject};
    use unnotion::{Block, RichText};

    const PAGE: &str = "0123abcd-4567-89ab-cdef-0123456789ab";

    struct FixedSource {
        fail: bool,
    }

    impl BlockSource for FixedSource {
        fn list_children(
            &self,
            _block_id: &str,
            _cursor: Option<&str>,
            _page_size: u32,
        ) -> unnotion::Result<ListPage<Block>> {
            if self.fail {
                return Err(Error::Other("unavailable".into()));
            }
            Ok(ListPage::last(vec![Block::paragraph(
                "p",
                vec![RichText::bold("Hi")],
            )]))
        }
    }

    impl PostSource for FixedSource {
        fn query_posts(
            &self,
            _database_id: &str,
            _cursor: Option<&str>,
            _page_size: u32,
        ) -> unnotion::Result<ListPage<PageObject>> {
            if self.fail {
                return Err(Error::Other("unavailable".into()));
            }
            let page: PageObject = serde_json::from_str(
                r#"{"id": "p1", "properties": {
                    "Name": {"type": "title", "title": [{"type": "text", "text": {"content": "Hello"}}]}
                }}"#,
            )?;
            Ok(ListPage::last(vec![page]))
        }
    }

    fn state(fail: bool) -> web::Data<AppState> {
        let source = Arc::new(FixedSource { fail });
        web::Data::new(AppState {
            blocks: source.clone(),
            posts: source,
            database_id: Some(PAGE.to_string()),
            render_options: RenderOptions::default(),
            index_options: IndexOptions::default(),
        })
    }

    #[actix_web::test]
    async fn test_post_content() {
        let app =
            test::init_service(App::new().app_data(state(false)).configure(api_routes)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/post/{}", PAGE))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["content"], "<p><strong>Hi</strong></p>");
    }

    #[actix_web::test]
    async fn test_post_content_failure_placeholder() {
        let app = test::init_service(App::new().app_data(state(true)).configure(api_routes)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/post/{}", PAGE))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["content"], ERROR_PLACEHOLDER);
    }

    #[actix_web::test]
    async fn test_post_content_invalid_id() {
        let app =
            test::init_service(App::new().app_data(state(false)).configure(api_routes)).await;
        let req = test::TestRequest::get().uri("/post/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_posts() {
        let app =
            test::init_service(App::new().app_data(state(false)).configure(api_routes)).await;
        let req = test::TestRequest::get().uri("/posts").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["title"], "Hello");
        assert_eq!(body[0]["tags"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn test_list_posts_failure_is_empty() {
        let app = test::init_service(App::new().app_data(state(true)).configure(api_routes)).await;
        let req = test::TestRequest::get().uri("/posts").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, serde_json::json!([]));
    }
}
