//! Ordered, fail-fast validator runner.

use std::fmt;

/// A predicate with a reason: passes with `Ok(())` or fails with an error
/// describing why.
///
/// Any `Fn(&T) -> Result<(), E>` is a validator, so plain functions and
/// closures can be listed directly.
pub trait Validator<T: ?Sized, E> {
    fn validate(&self, value: &T) -> Result<(), E>;
}

impl<T, E, F> Validator<T, E> for F
where
    T: ?Sized,
    F: Fn(&T) -> Result<(), E>,
{
    fn validate(&self, value: &T) -> Result<(), E> {
        self(value)
    }
}

/// Run `validators` against `value` in declaration order.
///
/// Stops at the first failure and returns its error. Later validators are
/// never invoked once one has failed.
pub fn run_validators<T, E>(value: &T, validators: &[&dyn Validator<T, E>]) -> Result<(), E>
where
    T: ?Sized,
{
    first_failure(value, validators.iter().copied())
}

fn first_failure<'r, T, E: 'r, I>(value: &T, rules: I) -> Result<(), E>
where
    T: ?Sized + 'r,
    I: IntoIterator<Item = &'r (dyn Validator<T, E> + 'r)>,
{
    for (index, rule) in rules.into_iter().enumerate() {
        if let Err(err) = rule.validate(value) {
            tracing::debug!(rule = index, "validation failed");
            return Err(err);
        }
    }
    Ok(())
}

type BoxedValidator<T, E> = Box<dyn Validator<T, E> + Send + Sync>;

/// An owned list of validators for one kind of value.
///
/// # Example
///
/// ```
/// use cadastro::validation::Pipeline;
///
/// let pipeline = Pipeline::new()
///     .rule(|n: &u32| if *n > 0 { Ok(()) } else { Err("zero") })
///     .rule(|n: &u32| if *n < 100 { Ok(()) } else { Err("too large") });
///
/// assert_eq!(pipeline.run(&5), Ok(()));
/// assert_eq!(pipeline.run(&0), Err("zero"));
/// ```
pub struct Pipeline<T: ?Sized, E> {
    rules: Vec<BoxedValidator<T, E>>,
}

impl<T: ?Sized, E> Pipeline<T, E> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a validator. Rules run in the order they were added.
    pub fn rule<V>(mut self, validator: V) -> Self
    where
        V: Validator<T, E> + Send + Sync + 'static,
    {
        self.rules.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn run(&self, value: &T) -> Result<(), E> {
        first_failure(
            value,
            self.rules.iter().map(|rule| rule.as_ref() as &dyn Validator<T, E>),
        )
    }
}

impl<T: ?Sized, E> Default for Pipeline<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized, E> fmt::Debug for Pipeline<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("rules", &self.rules.len())
            .finish()
    }
}
