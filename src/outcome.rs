/// A settled snapshot: the error slot and the value slot of one settlement.
///
/// Callers treat a present error as failure regardless of the value slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Outcome<E, V> {
    pub error: Option<E>,
    pub value: Option<V>,
}

impl<E, V> Outcome<E, V> {
    pub fn new(error: Option<E>, value: Option<V>) -> Self {
        Self { error, value }
    }

    pub fn success(value: V) -> Self {
        Self::new(None, Some(value))
    }

    pub fn failure(error: E) -> Self {
        Self::new(Some(error), None)
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_parts(self) -> (Option<E>, Option<V>) {
        (self.error, self.value)
    }

    /// Collapse into a `Result`, keeping the value slot optional since a
    /// success may carry nothing.
    pub fn into_result(self) -> Result<Option<V>, E> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.value),
        }
    }
}

impl<E, V> From<Result<V, E>> for Outcome<E, V> {
    fn from(result: Result<V, E>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(error) => Self::failure(error),
        }
    }
}
