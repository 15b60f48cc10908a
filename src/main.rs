use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::TcpListener;

mod config;
mod http;
mod logger;
mod pipeline;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(serve(cfg))
}

async fn serve(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.socket_addr()?;

    // Bind failure is fatal: no retry, no fallback port. Restarting is
    // the supervisor's job.
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let pipeline = Arc::new(pipeline::Pipeline::new(&cfg));

    logger::log_server_start(&local_addr, &cfg);

    loop {
        let (stream, peer_addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                logger::log_accept_error(&e);
                continue;
            }
        };

        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let pipeline = Arc::clone(&pipeline);
                async move { pipeline.handle(req, peer_addr).await }
            });

            if let Err(err) = http1::Builder::new()
                .keep_alive(true)
                .serve_connection(io, service)
                .await
            {
                logger::log_connection_error(&err);
            }
        });
    }
}
