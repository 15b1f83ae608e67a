//! Composable character mappers
//!
//! A [`CharMapper`] is a total, pure `char -> char` function. Mappers are
//! cheap to clone and compose with [`CharMapper::and_then`]; composition
//! flattens into a single list of steps so applying a mapper never recurses.

use std::fmt;
use std::sync::Arc;

type MapFn = dyn Fn(char) -> char + Send + Sync;

#[derive(Clone)]
struct Step {
    name: &'static str,
    f: Arc<MapFn>,
}

#[derive(Clone)]
enum Repr {
    Identity,
    Steps(Arc<[Step]>),
}

/// A total, pure character mapping
///
/// Equality is identity: two mappers compare equal when both are
/// [`CharMapper::IDENTITY`] or when they share the same composed steps.
#[derive(Clone)]
pub struct CharMapper(Repr);

impl CharMapper {
    /// The no-op mapper, absorbed by composition
    pub const IDENTITY: CharMapper = CharMapper(Repr::Identity);

    /// Wrap a mapping function
    ///
    /// The function must be total and deterministic. `name` shows up in
    /// `Debug` output and logs.
    pub fn from_fn(name: &'static str, f: impl Fn(char) -> char + Send + Sync + 'static) -> Self {
        CharMapper(Repr::Steps(Arc::new([Step {
            name,
            f: Arc::new(f),
        }])))
    }

    /// Lowercase characters whose lowercase form is a single char
    pub fn to_lowercase() -> Self {
        Self::from_fn("lowercase", |c| single_char(c, c.to_lowercase()))
    }

    /// Uppercase characters whose uppercase form is a single char
    pub fn to_uppercase() -> Self {
        Self::from_fn("uppercase", |c| single_char(c, c.to_uppercase()))
    }

    /// Replace spaces with non-breaking spaces
    pub fn to_nbsp() -> Self {
        Self::from_fn("to-nbsp", |c| if c == ' ' { NBSP } else { c })
    }

    /// Replace non-breaking spaces with spaces
    pub fn from_nbsp() -> Self {
        Self::from_fn("from-nbsp", |c| if c == NBSP { ' ' } else { c })
    }

    /// Replace NUL with the replacement character
    pub fn encode_null() -> Self {
        Self::from_fn("encode-null", |c| if c == '\0' { REPLACEMENT } else { c })
    }

    /// Replace the replacement character with NUL
    pub fn decode_null() -> Self {
        Self::from_fn("decode-null", |c| if c == REPLACEMENT { '\0' } else { c })
    }

    pub fn is_identity(&self) -> bool {
        matches!(self.0, Repr::Identity)
    }

    /// Apply the mapping
    pub fn map(&self, c: char) -> char {
        match &self.0 {
            Repr::Identity => c,
            Repr::Steps(steps) => steps.iter().fold(c, |c, step| (step.f)(c)),
        }
    }

    /// A mapper applying `self` first and then `other`
    ///
    /// Identity on either side returns the other mapper unchanged.
    pub fn and_then(&self, other: &CharMapper) -> CharMapper {
        match (&self.0, &other.0) {
            (Repr::Identity, _) => other.clone(),
            (_, Repr::Identity) => self.clone(),
            (Repr::Steps(first), Repr::Steps(then)) => {
                let steps: Vec<Step> = first.iter().chain(then.iter()).cloned().collect();
                CharMapper(Repr::Steps(steps.into()))
            }
        }
    }

    /// Names of the composed steps, in application order
    pub fn names(&self) -> Vec<&'static str> {
        match &self.0 {
            Repr::Identity => Vec::new(),
            Repr::Steps(steps) => steps.iter().map(|step| step.name).collect(),
        }
    }
}

const NBSP: char = '\u{00A0}';
const REPLACEMENT: char = '\u{FFFD}';

// Case mappings that expand (e.g. 'ß' -> "SS") would change the length.
fn single_char(c: char, mut mapped: impl Iterator<Item = char>) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(m), None) => m,
        _ => c,
    }
}

impl Default for CharMapper {
    fn default() -> Self {
        CharMapper::IDENTITY
    }
}

impl PartialEq for CharMapper {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Repr::Identity, Repr::Identity) => true,
            (Repr::Steps(a), Repr::Steps(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for CharMapper {}

impl fmt::Debug for CharMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Identity => write!(f, "CharMapper(identity)"),
            Repr::Steps(_) => write!(f, "CharMapper({})", self.names().join(" -> ")),
        }
    }
}
