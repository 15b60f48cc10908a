use crate::config::Config;
use chrono::Local;
use hyper::Method;
use std::net::SocketAddr;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("Static server started successfully");
    println!("Listening on: http://{addr}");
    println!("Serving files from: {}", config.static_root);
    println!("Using Tokio runtime for concurrency");
    println!("======================================\n");
}

pub fn log_accept_error(err: &std::io::Error) {
    eprintln!("[ERROR] Failed to accept connection: {err}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

/// Common log format access line.
pub fn log_access(
    remote_addr: &SocketAddr,
    method: &Method,
    path: &str,
    status: u16,
    body_bytes: usize,
) {
    println!(
        "{} - - [{}] \"{} {} HTTP/1.1\" {} {}",
        remote_addr.ip(),
        Local::now().format("%d/%b/%Y:%H:%M:%S %z"),
        method,
        path,
        status,
        body_bytes
    );
}
