use futures_util::stream::{Stream, StreamExt};
use std::future::Future;

/// Turn a provider's token-based `list`/`describe` pagination into a flat,
/// fallible [`Stream`] of items, so a scanner's list phase is
/// `collect_all(paginate(...))` instead of hand-rolling the `next_token` loop
/// on every call site.
///
/// `fetch` is called with the current token (`None` on the first page) and
/// must return the page's items together with the token for the next page, or
/// the error that ended pagination (a rate-limited/terminal provider call, or
/// a cancellation). Pagination stops as soon as `fetch` returns `Err`, or once
/// it reports no further pages.
pub fn paginate<T, E, Fut>(
    mut fetch: impl FnMut(Option<String>) -> Fut + Send + 'static,
) -> impl Stream<Item = Result<T, E>> + Send
where
    T: Send + 'static,
    E: Send + 'static,
    Fut: Future<Output = Result<(Vec<T>, Option<String>), E>> + Send,
{
    async_stream::stream! {
        let mut token = None;
        loop {
            match fetch(token).await {
                Ok((items, next_token)) => {
                    for item in items {
                        yield Ok(item);
                    }
                    match next_token {
                        Some(next) => token = Some(next),
                        None => break,
                    }
                }
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    }
}

/// Drain a pagination stream into every item yielded before the first error,
/// alongside that error if pagination stopped early. A scanner's list phase
/// turns a present error into a `ScanError` via its `ScanBuffer` and keeps
/// whatever items it already collected.
pub async fn collect_all<T: Send, E>(stream: impl Stream<Item = Result<T, E>>) -> (Vec<T>, Option<E>) {
    futures_util::pin_mut!(stream);
    let mut items = Vec::new();
    while let Some(next) = stream.next().await {
        match next {
            Ok(item) => items.push(item),
            Err(err) => return (items, Some(err)),
        }
    }
    (items, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn walks_every_page_until_token_is_none() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let stream = paginate(move |token: Option<String>| {
            let calls = calls_clone.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                match token.as_deref() {
                    None => Ok::<_, ()>((vec![1, 2], Some("page-2".to_string()))),
                    Some("page-2") => Ok((vec![3], None)),
                    _ => Ok((vec![], None)),
                }
            }
        });
        let (items, error) = collect_all(stream).await;
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(error.is_none());
    }

    #[tokio::test]
    async fn single_page_stops_immediately() {
        let stream = paginate(|_token: Option<String>| async { Ok::<_, ()>((vec!["only"], None)) });
        let (items, error) = collect_all(stream).await;
        assert_eq!(items, vec!["only"]);
        assert!(error.is_none());
    }

    #[tokio::test]
    async fn stops_and_reports_the_error_that_ended_pagination() {
        let stream = paginate(move |token: Option<String>| async move {
            match token {
                None => Ok((vec!["first"], Some("next".to_string()))),
                Some(_) => Err("boom"),
            }
        });
        let (items, error) = collect_all(stream).await;
        assert_eq!(items, vec!["first"]);
        assert_eq!(error, Some("boom"));
    }
}
