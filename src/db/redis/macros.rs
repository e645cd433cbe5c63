/// Read-through caching over an optional Redis cache.
///
/// Returns the cached value on a hit. On a miss, or when no cache is
/// configured, awaits `$block`, queues its value for a background write and
/// returns it. A failing cache read is logged and treated as a miss.
///
/// # Arguments
/// * `$cache`: an `Option<&Cache>`.
/// * `$key`: the `CacheKey` to read and write.
/// * `$ttl`: time-to-live of a written value, in seconds.
/// * `$block`: future producing an `AppResult` of the value.
///
/// # Example
/// ```rust,ignore
/// let poster = cached!(self.cache.as_ref(), CacheKey::Poster(title), ttl, async move {
///     fetch_poster(title).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let cache: Option<&$crate::db::Cache> = $cache;
        let key = $key;
        let hit = match cache {
            Some(cache) => match cache.get_from_cache(&key).await {
                Ok(hit) => hit,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                    None
                }
            },
            None => None,
        };

        match hit {
            Some(value) => Ok(value),
            None => {
                let value = $block.await?;
                if let Some(cache) = cache {
                    cache.set_in_background(&key, &value, $ttl);
                }
                Ok(value)
            }
        }
    }};
}
