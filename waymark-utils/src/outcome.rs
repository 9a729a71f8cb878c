//! `Outcome<T, E>`: the result-algebra combinator type (spec.md §7).
//!
//! Named distinctly from `std::result::Result` so call sites that also
//! return fallible-IO `Result`s from the same function body never collide on
//! the name. Structurally it's a `Result`, exposed through its own
//! `map`/`map_err`/`and_then` vocabulary plus `collect`/`partition`/`try_catch`.

/// The outcome of a fallible pipeline step: success with a value, or a typed failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T, E> {
    Ok(T),
    Err(E),
}

impl<T, E> Outcome<T, E> {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    #[must_use]
    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Err(err) => Outcome::Err(err),
        }
    }

    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Outcome<T, F> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(value),
            Outcome::Err(err) => Outcome::Err(f(err)),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U, E>) -> Outcome<U, E> {
        match self {
            Outcome::Ok(value) => f(value),
            Outcome::Err(err) => Outcome::Err(err),
        }
    }

    #[must_use]
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(_) => default,
        }
    }

    pub fn unwrap_or_else(self, f: impl FnOnce(E) -> T) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Err(err) => f(err),
        }
    }

    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Outcome::Ok(value) => Some(value),
            Outcome::Err(_) => None,
        }
    }

    #[must_use]
    pub fn err(self) -> Option<E> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Err(err) => Some(err),
        }
    }

    /// Run `f`, converting a caught failure into `Outcome::Err` via `From`.
    ///
    /// Mirrors spec.md §7's `tryCatch` combinator: a single entry point for
    /// wrapping an operation that can fail without the caller writing a
    /// `match`/`?` by hand at the call site.
    pub fn try_catch<F>(f: impl FnOnce() -> Result<T, F>) -> Outcome<T, E>
    where
        E: From<F>,
    {
        match f() {
            Ok(value) => Outcome::Ok(value),
            Err(err) => Outcome::Err(E::from(err)),
        }
    }
}

impl<T, E> Outcome<Vec<T>, E> {
    /// Collect an iterator of outcomes into one outcome of a `Vec`, short-circuiting
    /// on the first failure — `collect` from spec.md §7.
    pub fn collect(items: impl IntoIterator<Item = Outcome<T, E>>) -> Outcome<Vec<T>, E> {
        let mut values = Vec::new();
        for item in items {
            match item {
                Outcome::Ok(value) => values.push(value),
                Outcome::Err(err) => return Outcome::Err(err),
            }
        }
        Outcome::Ok(values)
    }
}

/// Split an iterator of outcomes into `(successes, failures)` without
/// short-circuiting — `partition` from spec.md §7.
pub fn partition<T, E>(items: impl IntoIterator<Item = Outcome<T, E>>) -> (Vec<T>, Vec<E>) {
    let mut oks = Vec::new();
    let mut errs = Vec::new();
    for item in items {
        match item {
            Outcome::Ok(value) => oks.push(value),
            Outcome::Err(err) => errs.push(err),
        }
    }
    (oks, errs)
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(err) => Outcome::Err(err),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(err) => Err(err),
        }
    }
}
