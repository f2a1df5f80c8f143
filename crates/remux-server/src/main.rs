//! remux-server
//!
//! Sample server: serves a small route table over HTTP/1.1, with every
//! request going through the logging and panic recovery middleware.

mod app;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request as HyperRequest, Response as HyperResponse, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use remux_router::{chain, Handler, LoggingMiddleware, Method, RecoverMiddleware, Request, Response};

/// Sample HTTP server for remux-router.
#[derive(Parser)]
#[command(name = "remux-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on.
    #[arg(short, long, env = "REMUX_ADDR", default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

/// Converts a hyper request, runs it through the handler and converts the
/// response back.
///
/// The path is passed as received: path parameters are not percent-decoded.
async fn handle_request(
    req: HyperRequest<hyper::body::Incoming>,
    handler: Handler,
) -> Result<HyperResponse<Full<Bytes>>, Infallible> {
    let uri = req.uri();
    let mut request = Request::new(Method::parse(req.method().as_str()), uri.path());
    if let Some(query) = uri.query() {
        request.query = Request::parse_query_string(query);
    }
    for (key, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            request.headers.insert(key.to_string(), v.to_string());
        }
    }

    request.body = match req.collect().await {
        Ok(body) => body.to_bytes().to_vec(),
        Err(err) => {
            error!("Failed to read request body: {err}");
            return Ok(into_hyper(Response::new(400).body("Bad Request")));
        }
    };

    Ok(into_hyper(handler(request).await))
}

fn into_hyper(res: Response) -> HyperResponse<Full<Bytes>> {
    let status = StatusCode::from_u16(res.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HyperResponse::builder().status(status);
    for (key, value) in &res.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    builder
        .body(Full::new(Bytes::from(res.body)))
        .unwrap_or_else(|err| {
            error!("Invalid response: {err}");
            let mut fallback = HyperResponse::new(Full::new(Bytes::from_static(
                b"Internal Server Error",
            )));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let router = Arc::new(app::router()?);
    info!("Registered {} routes", router.len());

    let handler = chain(
        router.into_handler(),
        &[&LoggingMiddleware, &RecoverMiddleware],
    );

    let listener = TcpListener::bind(cli.addr).await?;
    info!("Listening on http://{}", cli.addr);

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let handler = Arc::clone(&handler);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| handle_request(req, Arc::clone(&handler)));

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                error!("Error serving connection: {err:?}");
            }
        });
    }
}
