use std::cell::RefCell;
use std::future::Future;

use crate::error::ApiError;

/// Mutable state a screen renders from. Signals in the browser, a
/// `RefCell` in tests.
pub trait Store<T> {
    /// `None` when the state is gone (e.g. a disposed signal).
    fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;
}

impl<T> Store<T> for RefCell<T> {
    fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Apply a local patch, send the request, and undo the patch if the request
/// fails. `apply` returns what `compensate` needs to restore the old state,
/// or `None` when there is nothing to patch, in which case nothing is sent.
pub async fn optimistic<T, S, P, R, Fut>(
    store: &S,
    apply: impl FnOnce(&mut T) -> Option<P>,
    compensate: impl FnOnce(&mut T, P),
    request: impl FnOnce() -> Fut,
) -> Result<R, ApiError>
where
    S: Store<T>,
    Fut: Future<Output = Result<R, ApiError>>,
{
    let Some(undo) = store.modify(apply).flatten() else {
        return Err(ApiError::NotFound);
    };

    match request().await {
        Ok(reply) => Ok(reply),
        Err(err) => {
            tracing::warn!(error = %err, "rolling back optimistic update");
            store.modify(|state| compensate(state, undo));
            Err(err)
        }
    }
}

/// Set a field on the first matching row. Returns the old value.
pub fn replace_where<T, V>(
    rows: &mut [T],
    matches: impl Fn(&T) -> bool,
    field: impl FnOnce(&mut T) -> &mut V,
    value: V,
) -> Option<V> {
    let row = rows.iter_mut().find(|r| matches(r))?;
    Some(std::mem::replace(field(row), value))
}

/// Negate a flag on the first matching row. Returns the old value.
pub fn flip_where<T>(
    rows: &mut [T],
    matches: impl Fn(&T) -> bool,
    flag: impl FnOnce(&mut T) -> &mut bool,
) -> Option<bool> {
    let row = rows.iter_mut().find(|r| matches(r))?;
    let flag = flag(row);
    let old = *flag;
    *flag = !old;
    Some(old)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        banned: bool,
    }

    fn rows() -> RefCell<Vec<Row>> {
        RefCell::new(vec![
            Row { id: 1, banned: false },
            Row { id: 2, banned: true },
        ])
    }

    fn toggle(id: i64) -> impl FnOnce(&mut Vec<Row>) -> Option<bool> {
        move |rows: &mut Vec<Row>| flip_where(rows, |r| r.id == id, |r| &mut r.banned)
    }

    fn restore(id: i64) -> impl FnOnce(&mut Vec<Row>, bool) {
        move |rows: &mut Vec<Row>, old: bool| {
            replace_where(rows, |r| r.id == id, |r| &mut r.banned, old);
        }
    }

    #[tokio::test]
    async fn success_keeps_patch() {
        let store = rows();
        let res: Result<(), ApiError> =
            optimistic(&store, toggle(1), restore(1), || async { Ok(()) }).await;
        assert!(res.is_ok());
        assert!(store.borrow()[0].banned);
    }

    #[tokio::test]
    async fn failure_rolls_back_only_that_row() {
        let store = rows();
        let res: Result<(), _> = optimistic(&store, toggle(2), restore(2), || async {
            Err(ApiError::Status { status: 500, detail: None })
        })
        .await;
        assert!(res.is_err());
        assert_eq!(store.borrow()[1], Row { id: 2, banned: true });
        assert!(!store.borrow()[0].banned);
    }

    #[tokio::test]
    async fn missing_row_sends_nothing() {
        let store = rows();
        let mut sent = false;
        let res: Result<(), ApiError> = optimistic(&store, toggle(9), restore(9), || {
            sent = true;
            async { Ok(()) }
        })
        .await;
        assert_eq!(res, Err(ApiError::NotFound));
        assert!(!sent);
    }
}
