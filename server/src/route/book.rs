use crate::controller::Controller;
use crate::error::{ErrorStatus, LookupFailure};
use crate::handler::AppModule;
use crate::request::{
    AddCommentRequest, BookTransformer, CreateBookRequest, DeleteBookRequest, GetBookRequest,
    Payload,
};
use crate::response::{BookPresenter, DeletionPresenter};
use application::service::{
    AddCommentService, CreateBookService, DeleteBookService, GetBookService,
};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl<D> BookRouter for Router<AppModule<D>>
where
    D: GetBookService + CreateBookService + AddCommentService + DeleteBookService,
{
    fn route_book(self) -> Self {
        let books = get(|State(module): State<AppModule<D>>| async move {
            Controller::new((), BookPresenter)
                .bypass(|| async move { module.database().get_all_books().await })
                .await
                .map_err(ErrorStatus::from)
        })
        .post(
            |State(module): State<AppModule<D>>,
             Payload(req): Payload<CreateBookRequest>| async move {
                match Controller::new(BookTransformer, BookPresenter).try_intake(req) {
                    Ok(transformed) => transformed
                        .handle(|dto| async move { module.database().create_book(dto).await })
                        .await
                        .map(IntoResponse::into_response)
                        .map_err(ErrorStatus::from),
                    Err(rejected) => Ok(rejected.into_response()),
                }
            },
        )
        .delete(|State(module): State<AppModule<D>>| async move {
            Controller::new((), DeletionPresenter)
                .bypass(|| async move { module.database().delete_all_books().await })
                .await
                .map_err(ErrorStatus::from)
        });

        // The collection also answers with a trailing slash.
        self.route("/api/books", books.clone())
            .route("/api/books/", books)
            .route(
                "/api/books/:id",
                get(
                    |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                        Controller::new(BookTransformer, BookPresenter)
                            .intake(GetBookRequest::new(id))
                            .handle(|dto| async move { module.database().get_book(dto).await })
                            .await
                            .map_err(LookupFailure::from)
                    },
                )
                .post(
                    |State(module): State<AppModule<D>>,
                     Path(id): Path<String>,
                     Payload(req): Payload<AddCommentRequest>| async move {
                        match Controller::new(BookTransformer, BookPresenter).try_intake((id, req)) {
                            Ok(transformed) => transformed
                                .handle(|dto| async move { module.database().add_comment(dto).await })
                                .await
                                .map(IntoResponse::into_response)
                                .map_err(LookupFailure::from),
                            Err(rejected) => Ok(rejected.into_response()),
                        }
                    },
                )
                .delete(
                    |State(module): State<AppModule<D>>, Path(id): Path<String>| async move {
                        Controller::new(BookTransformer, DeletionPresenter)
                            .intake(DeleteBookRequest::new(id))
                            .handle(|dto| async move { module.database().delete_book(dto).await })
                            .await
                            .map_err(LookupFailure::from)
                    },
                ),
            )
    }
}

#[cfg(test)]
mod test {
    use application::service::{
        AddCommentService, CreateBookService, DeleteBookService, GetBookService,
    };
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use driver::database::{InMemoryBookRepository, InMemoryDatabase, InMemoryTransaction};
    use error_stack::Report;
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::DependOnBookQuery;
    use kernel::interface::update::DependOnBookModifier;
    use kernel::KernelError;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::handler::AppModule;
    use crate::route::BookRouter;

    struct Reply {
        status: StatusCode,
        body: Vec<u8>,
    }

    impl Reply {
        fn text(&self) -> &str {
            std::str::from_utf8(&self.body).unwrap()
        }

        fn json(&self) -> Value {
            serde_json::from_slice(&self.body).unwrap()
        }
    }

    fn app<D>(database: D) -> Router
    where
        D: GetBookService + CreateBookService + AddCommentService + DeleteBookService,
    {
        Router::<AppModule<D>>::new()
            .route_book()
            .with_state(AppModule::new(database))
    }

    async fn call(app: &Router, request: Request<Body>) -> Reply {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        Reply { status, body }
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Reply {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        call(app, request).await
    }

    async fn create(app: &Router, title: &str) -> String {
        let reply = send(app, Method::POST, "/api/books", Some(json!({ "title": title }))).await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.json()["_id"].as_str().unwrap().to_string()
    }

    async fn list(app: &Router) -> Vec<Value> {
        let reply = send(app, Method::GET, "/api/books", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.json().as_array().unwrap().clone()
    }

    #[tokio::test]
    async fn created_book_is_listed() {
        let app = app(InMemoryDatabase::default());
        let reply = send(
            &app,
            Method::POST,
            "/api/books",
            Some(json!({ "title": "Test Book" })),
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);
        let created = reply.json();
        assert_eq!(created["title"], "Test Book");
        assert!(created["_id"].is_string());
        assert!(created.get("comments").is_none());

        let books = list(&app).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0]["_id"], created["_id"]);
        assert_eq!(books[0]["title"], "Test Book");
        assert_eq!(books[0]["commentcount"], 0);
        assert!(books[0].get("comments").is_none());
    }

    #[tokio::test]
    async fn create_without_title_is_rejected_with_ok() {
        let app = app(InMemoryDatabase::default());
        for body in [Some(json!({})), Some(json!({ "title": "" })), None] {
            let reply = send(&app, Method::POST, "/api/books", body).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.text(), "missing required field title");
        }
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn create_accepts_form_body() {
        let app = app(InMemoryDatabase::default());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/books")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("title=Form+Book"))
            .unwrap();
        let reply = call(&app, request).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["title"], "Form Book");
    }

    #[tokio::test]
    async fn scalar_title_is_read_as_text() {
        let app = app(InMemoryDatabase::default());
        let reply = send(&app, Method::POST, "/api/books", Some(json!({ "title": 123 }))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["title"], "123");
        assert_eq!(list(&app).await[0]["title"], "123");
    }

    #[tokio::test]
    async fn falsy_or_shapeless_body_is_a_missing_title() {
        let app = app(InMemoryDatabase::default());
        for body in [
            json!({ "title": 0 }),
            json!({ "title": false }),
            json!({ "title": null }),
            json!([]),
            json!("Test Book"),
        ] {
            let reply = send(&app, Method::POST, "/api/books", Some(body)).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.text(), "missing required field title");
        }
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn scalar_comment_is_read_as_text() {
        let app = app(InMemoryDatabase::default());
        let id = create(&app, "Numbered").await;
        let uri = format!("/api/books/{id}");

        let reply = send(&app, Method::POST, &uri, Some(json!({ "comment": 5 }))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["comments"], json!(["5"]));

        let reply = send(&app, Method::POST, &uri, Some(json!([]))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.text(), "missing required field comment");
    }

    #[tokio::test]
    async fn collection_answers_with_trailing_slash() {
        let app = app(InMemoryDatabase::default());
        let reply = send(&app, Method::POST, "/api/books/", Some(json!({ "title": "Slashed" }))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()["title"], "Slashed");

        let reply = send(&app, Method::GET, "/api/books/", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.json()[0]["title"], "Slashed");

        let reply = send(&app, Method::DELETE, "/api/books/", None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.text(), "complete delete successful");
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let app = app(InMemoryDatabase::default());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/books")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\":"))
            .unwrap();
        let reply = call(&app, request).await;
        assert!(reply.status.is_client_error());
        assert!(list(&app).await.is_empty());
    }

    #[tokio::test]
    async fn unknown_book_does_not_exist() {
        let app = app(InMemoryDatabase::default());
        create(&app, "Other").await;
        let unknown = format!("/api/books/{}", Uuid::new_v4());
        for uri in ["/api/books/invalid_id", unknown.as_str()] {
            let reply = send(&app, Method::GET, uri, None).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.text(), "no book exists");

            let reply = send(&app, Method::POST, uri, Some(json!({ "comment": "Good book!" }))).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.text(), "no book exists");

            let reply = send(&app, Method::DELETE, uri, None).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.text(), "no book exists");
        }
        assert_eq!(list(&app).await.len(), 1);
    }

    #[tokio::test]
    async fn get_book_returns_comments() {
        let app = app(InMemoryDatabase::default());
        let id = create(&app, "Valid Book").await;

        let reply = send(&app, Method::GET, &format!("/api/books/{id}"), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        let book = reply.json();
        assert_eq!(book["_id"], id.as_str());
        assert_eq!(book["title"], "Valid Book");
        assert_eq!(book["comments"], json!([]));
        assert!(book.get("commentcount").is_none());
    }

    #[tokio::test]
    async fn comments_are_appended_and_counted() {
        let app = app(InMemoryDatabase::default());
        let id = create(&app, "Book for Comment").await;
        let uri = format!("/api/books/{id}");

        let reply = send(&app, Method::POST, &uri, Some(json!({ "comment": "Great book!" }))).await;
        assert_eq!(reply.status, StatusCode::OK);
        let book = reply.json();
        assert_eq!(book["_id"], id.as_str());
        assert_eq!(book["title"], "Book for Comment");
        assert_eq!(book["comments"], json!(["Great book!"]));

        for comment in ["second", "third"] {
            send(&app, Method::POST, &uri, Some(json!({ "comment": comment }))).await;
        }

        let book = send(&app, Method::GET, &uri, None).await.json();
        assert_eq!(book["comments"], json!(["Great book!", "second", "third"]));

        let books = list(&app).await;
        assert_eq!(books[0]["commentcount"], 3);
    }

    #[tokio::test]
    async fn comment_without_text_is_rejected_with_ok() {
        let app = app(InMemoryDatabase::default());
        let id = create(&app, "Book without comment").await;
        let uri = format!("/api/books/{id}");

        for body in [Some(json!({})), Some(json!({ "comment": "" })), None] {
            let reply = send(&app, Method::POST, &uri, body).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.text(), "missing required field comment");
        }

        let reply = send(&app, Method::POST, "/api/books/invalid_id", Some(json!({}))).await;
        assert_eq!(reply.text(), "missing required field comment");

        let book = send(&app, Method::GET, &uri, None).await.json();
        assert_eq!(book["comments"], json!([]));
        assert_eq!(list(&app).await[0]["commentcount"], 0);
    }

    #[tokio::test]
    async fn deleted_book_is_gone() {
        let app = app(InMemoryDatabase::default());
        let kept = create(&app, "Kept").await;
        let id = create(&app, "Book to delete").await;
        let uri = format!("/api/books/{id}");

        let reply = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.text(), "delete successful");

        let reply = send(&app, Method::GET, &uri, None).await;
        assert_eq!(reply.text(), "no book exists");

        let reply = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(reply.text(), "no book exists");

        let books = list(&app).await;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0]["_id"], kept.as_str());
    }

    #[tokio::test]
    async fn delete_all_empties_the_store() {
        let app = app(InMemoryDatabase::default());
        create(&app, "one").await;
        create(&app, "two").await;

        for _ in 0..2 {
            let reply = send(&app, Method::DELETE, "/api/books", None).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.text(), "complete delete successful");
            assert!(list(&app).await.is_empty());
        }
    }

    struct UnreachableDatabase;

    #[async_trait::async_trait]
    impl DatabaseConnection for UnreachableDatabase {
        type Transaction = InMemoryTransaction;
        async fn transact(&self) -> error_stack::Result<InMemoryTransaction, KernelError> {
            Err(Report::new(KernelError::Internal).attach_printable("store is unreachable"))
        }
    }

    impl DependOnBookQuery for UnreachableDatabase {
        type BookQuery = InMemoryBookRepository;
        fn book_query(&self) -> &Self::BookQuery {
            &InMemoryBookRepository
        }
    }

    impl DependOnBookModifier for UnreachableDatabase {
        type BookModifier = InMemoryBookRepository;
        fn book_modifier(&self) -> &Self::BookModifier {
            &InMemoryBookRepository
        }
    }

    #[tokio::test]
    async fn store_faults_are_server_errors() {
        let app = app(UnreachableDatabase);

        let reply = send(&app, Method::GET, "/api/books", None).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.text(), "Server error");

        let reply = send(&app, Method::POST, "/api/books", Some(json!({ "title": "Test Book" }))).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.text(), "Server error");

        let reply = send(&app, Method::DELETE, "/api/books", None).await;
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.text(), "Server error");

        let reply = send(&app, Method::POST, "/api/books", Some(json!({}))).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.text(), "missing required field title");
    }

    #[tokio::test]
    async fn store_faults_on_lookup_read_as_missing_book() {
        let app = app(UnreachableDatabase);
        let uri = format!("/api/books/{}", Uuid::new_v4());

        for (method, body) in [
            (Method::GET, None),
            (Method::POST, Some(json!({ "comment": "Great book!" }))),
            (Method::DELETE, None),
        ] {
            let reply = send(&app, method, &uri, body).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.text(), "no book exists");
        }
    }
}
