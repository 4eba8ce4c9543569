use crate::config::AppConfig;
use crate::error::StackTrace;
use crate::handler::AppModule;
use crate::route::BookRouter;
use application::service::{
    AddCommentService, CreateBookService, DeleteBookService, GetBookService,
};
use driver::database::{InMemoryDatabase, PostgresDatabase};
use error_stack::ResultExt;
use kernel::KernelError;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

mod config;
mod controller;
mod error;
mod handler;
mod request;
mod response;
mod route;

#[tokio::main]
async fn main() -> Result<(), StackTrace> {
    let config = AppConfig::from_env()?;

    let appender = tracing_appender::rolling::daily(std::path::Path::new("./logs/"), "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .init();

    let bind = SocketAddr::from(([0, 0, 0, 0], config.port));

    match config.postgres_url {
        Some(url) => {
            let database = PostgresDatabase::connect(&url)
                .await
                .attach_printable("Failed to connect postgres")?;
            serve(AppModule::new(database), bind).await?;
        }
        None => {
            tracing::info!("POSTGRES_URL is not set, books are kept in memory");
            serve(AppModule::new(InMemoryDatabase::default()), bind).await?;
        }
    }

    Ok(())
}

async fn serve<D>(app: AppModule<D>, bind: SocketAddr) -> error_stack::Result<(), KernelError>
where
    D: GetBookService + CreateBookService + AddCommentService + DeleteBookService,
{
    let router = axum::Router::<AppModule<D>>::new()
        .route_book()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app);

    let tcp = TcpListener::bind(bind)
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| "Failed to listen tcp")?;
    tracing::info!(%bind, "listening");

    axum::serve(tcp, router.into_make_service())
        .await
        .change_context_lazy(|| KernelError::Internal)?;

    Ok(())
}
