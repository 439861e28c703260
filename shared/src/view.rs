use crate::error::ApiError;

/// What a screen renders for one fetched resource.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Unauthorized,
    Failed(String),
    Empty,
    Ready(T),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> LoadState<T> {
    /// `Ok(T)` is always ready, even when `T` is itself empty.
    pub fn from_item(result: Result<T, ApiError>, failure: &str) -> Self {
        match result {
            Ok(item) => Self::Ready(item),
            Err(err) => Self::from_error(&err, failure),
        }
    }

    pub fn from_error(err: &ApiError, failure: &str) -> Self {
        if err.is_unauthorized() {
            Self::Unauthorized
        } else {
            tracing::warn!(error = %err, "{failure}");
            Self::Failed(failure.to_string())
        }
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadState<U> {
        match self {
            Self::Loading => LoadState::Loading,
            Self::Unauthorized => LoadState::Unauthorized,
            Self::Failed(m) => LoadState::Failed(m),
            Self::Empty => LoadState::Empty,
            Self::Ready(v) => LoadState::Ready(f(v)),
        }
    }
}

impl<T> LoadState<Vec<T>> {
    /// An empty list is `Empty`, never an error.
    pub fn from_list(result: Result<Vec<T>, ApiError>, failure: &str) -> Self {
        match result {
            Ok(items) if items.is_empty() => Self::Empty,
            Ok(items) => Self::Ready(items),
            Err(err) => Self::from_error(&err, failure),
        }
    }

    /// Patch after a local edit: the last removed row turns the list `Empty`.
    pub fn settle(&mut self) {
        if matches!(self, Self::Ready(items) if items.is_empty()) {
            *self = Self::Empty;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_is_empty_not_error() {
        let state: LoadState<Vec<u8>> = LoadState::from_list(Ok(vec![]), "Failed to load courses.");
        assert_eq!(state, LoadState::Empty);
    }

    #[test]
    fn unauthorized_is_its_own_branch() {
        let state: LoadState<Vec<u8>> =
            LoadState::from_list(Err(ApiError::MissingCredentials), "Failed to load.");
        assert_eq!(state, LoadState::Unauthorized);

        let state: LoadState<u8> =
            LoadState::from_item(Err(ApiError::Unauthorized { status: 403, detail: None }), "Failed to load.");
        assert_eq!(state, LoadState::Unauthorized);
    }

    #[test]
    fn other_errors_use_static_message() {
        let state: LoadState<u8> = LoadState::from_item(
            Err(ApiError::Status { status: 500, detail: Some("trace".into()) }),
            "Failed to load course.",
        );
        assert_eq!(state, LoadState::Failed("Failed to load course.".into()));
    }

    #[test]
    fn settle_after_last_removal() {
        let mut state = LoadState::Ready(vec![1]);
        if let Some(items) = state.ready_mut() {
            items.clear();
        }
        state.settle();
        assert_eq!(state, LoadState::Empty);
    }
}
