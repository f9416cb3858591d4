//! Example: fanning work out and collecting it again
//!
//! Run with `RUST_LOG=pactum=trace` to see tasks start and finish.

use pactum::{CancellationToken, TaskError};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("page {0} not found")]
    NotFound(u32),
    #[error("cancelled")]
    Cancelled,
}

fn fetch(ctx: CancellationToken, page: u32) -> Result<String, FetchError> {
    // Simulated latency, cut short by cancellation.
    if ctx.wait_timeout(Duration::from_millis(u64::from(page) * 20)) {
        return Err(FetchError::Cancelled);
    }

    if page == 4 {
        return Err(FetchError::NotFound(page));
    }

    Ok(format!("contents of page {page}"))
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .init();

    let ctx = CancellationToken::new();
    let pages = pactum::fan_out(ctx.clone(), 1..=6, fetch);

    match pactum::wait(&pages) {
        Ok(()) => println!("every page fetched"),
        Err(err) => {
            println!("first failure: {err}");
            // Nothing else is worth waiting for.
            ctx.cancel();
        }
    }

    for (page, promise) in (1..).zip(&pages) {
        match promise.get() {
            Ok(body) => println!("{page}: {body}"),
            Err(TaskError::Failed(err)) => println!("{page}: {err}"),
            Err(err) => println!("{page}: task error: {err}"),
        }
    }

    // Heterogeneous join: different value types, one error type.
    let count = pactum::execute((), pages.len(), |_, total: usize| Ok::<_, FetchError>(total));
    let title = pactum::execute(CancellationToken::new(), 1, fetch);

    match pactum::join!(count, title) {
        Ok((count, title)) => println!("{count} pages, first: {title}"),
        Err(err) => println!("join failed: {err}"),
    }
}
