//! Utilities for displaying fitted models
//!
//! This module turns fitted coefficients into human-readable equations and
//! formats numbers for the report tables.
//!
//! # Key Concepts
//! - **[`EquationDisplay`]**: Trait to define how a basis renders one term of a fitted equation.
//! - **[`Term`]**: Represents a single term with a sign and body.
//! - **[`Sign`]**: Tracks whether a term is positive or negative.
//!
//! # Helpers
//! - [`format_coefficient`]: Formats a numeric coefficient, skipping zeros.
//! - [`format_variable`]: Adds subscripts and superscript exponents to a variable name.
//! - [`format_number`]: Fixed or scientific notation depending on magnitude.
#![allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

use crate::value::Value;

pub mod unicode;

/// Default precision for formatting used by the provided implementations of [`EquationDisplay`]
pub const DEFAULT_PRECISION: usize = 2;

/// Default range of magnitudes in which scientific notation is not used
#[must_use]
pub fn default_fixed_range<T: Value>() -> Option<std::ops::Range<T>> {
    const RANGE: std::ops::Range<f64> = 1e-3..1e4;
    let s = T::try_cast(RANGE.start).ok()?;
    let e = T::try_cast(RANGE.end).ok()?;
    Some(s..e)
}

/// Formats a number for a report table, using scientific notation outside [`default_fixed_range`].
#[must_use]
pub fn format_number<T: Value>(n: T, precision: usize) -> String {
    unicode::float(n, default_fixed_range(), precision)
}

/// Trait for formatting a fitted model as an equation.
///
/// Implementors control how individual terms are displayed,
/// while a default implementation assembles them into a full equation.
pub trait EquationDisplay<T: Value> {
    /// Formats the term for feature column `column` with coefficient `coef`.
    ///
    /// Returning `None` indicates the term should be skipped
    /// (typically when the coefficient is zero).
    fn format_term(&self, column: usize, coef: T) -> Option<Term>;

    /// Writes the full equation into the provided buffer.
    ///
    /// Terms are written from the last feature column to the first, so
    /// polynomials read highest power first. The output is prefixed with `"y(x) = "`.
    ///
    /// # Errors
    /// Returns an error if writing to `buffer` fails.
    fn format_equation<W: std::fmt::Write>(
        &self,
        buffer: &mut W,
        coefficients: &[T],
    ) -> std::fmt::Result {
        let mut terms: Vec<Term> = coefficients
            .iter()
            .enumerate()
            .rev()
            .filter_map(|(column, &coef)| self.format_term(column, coef))
            .collect();

        write!(buffer, "y(x) = ")?;
        if terms.is_empty() {
            return write!(buffer, "0");
        }

        // No leading '+'
        let first = terms.remove(0);
        if first.sign == Sign::Negative {
            write!(buffer, "{}", first.sign.char())?;
        }
        write!(buffer, "{}", first.body)?;

        for term in terms {
            write!(buffer, " {} {}", term.sign.char(), term.body)?;
        }

        Ok(())
    }
}

/// Represents the sign of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive sign (`+` when displayed).
    Positive,

    /// Negative sign (`-` when displayed).
    Negative,
}

impl Sign {
    /// Determines the sign from a numeric coefficient.
    pub fn from_coef<T: Value>(coef: T) -> Self {
        if coef < T::zero() {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// Returns the character representation of the sign.
    #[must_use]
    pub fn char(&self) -> char {
        match self {
            Sign::Positive => '+',
            Sign::Negative => '-',
        }
    }
}

/// A single term of an equation for display purposes, such as `"2.00x²"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The sign of the term (positive or negative).
    pub sign: Sign,

    /// The body of the term without its sign.
    pub body: String,
}

impl Term {
    /// Creates a new term with the given sign and body.
    #[must_use]
    pub fn new(sign: Sign, body: String) -> Self {
        Self { sign, body }
    }
}

/// Formats the magnitude of a coefficient for display in a term.
///
/// - Returns `None` if the coefficient is zero or effectively zero (≤ epsilon).
/// - Returns an empty string for a unit coefficient on a non-constant term.
/// - Formats as a decimal inside [`default_fixed_range`], scientific notation otherwise.
///
/// # Example
/// ```
/// # use wagefit::display::format_coefficient;
/// assert_eq!(format_coefficient(0.0, 1, 2), None);
/// assert_eq!(format_coefficient(-2.5, 1, 2), Some("2.50".to_string()));
/// assert_eq!(format_coefficient(1e5, 1, 2), Some("1.00e5".to_string()));
/// ```
pub fn format_coefficient<T: Value>(coef: T, column: usize, precision: usize) -> Option<String> {
    let abs = Value::abs(coef);

    if abs <= T::epsilon() {
        return None;
    }

    if Value::abs(abs - T::one()) <= T::epsilon() && column != 0 {
        return Some(String::new());
    }

    Some(unicode::float(abs, default_fixed_range(), precision))
}

/// Formats a variable name with an optional subscript and an exponent.
///
/// # Behavior
/// - If `exp == 0`, returns an empty string (`""`).
/// - If `exp == 1`, returns the base plus subscript.
/// - Otherwise, appends the Unicode superscript version of `exp`.
///
/// # Examples
/// ```
/// # use wagefit::display::format_variable;
/// assert_eq!(format_variable("x", None, 0), "");
/// assert_eq!(format_variable("x", None, 1), "x");
/// assert_eq!(format_variable("B", Some("3"), 1), "B₃");
/// assert_eq!(format_variable("x", None, 4), "x⁴");
/// ```
#[must_use]
pub fn format_variable(base: &str, subscript: Option<&str>, exp: i32) -> String {
    let lbl = unicode::subscript(subscript.unwrap_or_default());
    match exp {
        0 => String::new(),
        1 => format!("{base}{lbl}"),
        _ => {
            let sup = unicode::superscript(&exp.to_string());
            format!("{base}{lbl}{sup}")
        }
    }
}
