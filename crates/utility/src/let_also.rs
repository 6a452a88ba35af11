/// Scope functions for writing transformations as one expression chain.
pub trait LetAlso: Sized {
    /// Passes the value by move into `f` and returns its result.
    fn let_owned<R, F: FnOnce(Self) -> R>(self, f: F) -> R {
        f(self)
    }

    /// Passes a reference to the value into `f` and returns its result.
    fn let_ref<R, F: FnOnce(&Self) -> R>(&self, f: F) -> R {
        f(self)
    }

    /// Lets `f` modify the value, then returns it.
    fn also<F: FnOnce(&mut Self)>(mut self, f: F) -> Self {
        f(&mut self);
        self
    }
}

impl<T> LetAlso for T {}

#[cfg(test)]
mod tests {
    use super::LetAlso;

    #[test]
    fn let_owned_maps_value() {
        let len = vec![1, 2, 3].let_owned(|v| v.len());
        assert_eq!(len, 3);
    }

    #[test]
    fn also_mutates_and_returns() {
        let v = vec![3, 1, 2].also(|v| v.sort());
        assert_eq!(v, vec![1, 2, 3]);
    }
}
