use anyhow::Result;

/// The cli does all of its work on one thread. Aggregation still leaves it through the blocking
/// pool.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
