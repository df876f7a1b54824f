//! Textual form of scalar values before they are quoted.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};

/// A value that can be rendered as SQL text.
///
/// `None` stands for SQL `NULL`. Every quoting function of this crate goes
/// through this trait, so integers, booleans and floats are quoted exactly
/// like the text they stringify to.
pub trait ToSqlText {
    /// Returns the textual form, or `None` for `NULL`.
    fn to_sql_text(&self) -> Option<Cow<'_, str>>;
}

impl ToSqlText for str {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl ToSqlText for String {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl ToSqlText for Cow<'_, str> {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_ref()))
    }
}

impl ToSqlText for char {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}

impl ToSqlText for bool {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(if *self { "True" } else { "False" }))
    }
}

impl<T: ToSqlText + ?Sized> ToSqlText for &T {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        (**self).to_sql_text()
    }
}

impl<T: ToSqlText> ToSqlText for Option<T> {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(ToSqlText::to_sql_text)
    }
}

macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(
            impl ToSqlText for $t {
                fn to_sql_text(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Formats a float the way PostgreSQL's `float8in` accepts it back unchanged.
///
/// Both `Display` and `LowerExp` yield the shortest digits that round-trip.
/// Plain notation is used for decimal exponents in `-4..16` and exponent
/// notation outside it, so `1e300` stays short. Non-finite values get the
/// PostgreSQL spelling.
fn float_text<F>(value: F) -> String
where
    F: Into<f64> + Copy + core::fmt::Display + core::fmt::LowerExp,
{
    let wide: f64 = value.into();
    if wide.is_nan() {
        return "NaN".into();
    }
    if wide.is_infinite() {
        return if wide.is_sign_positive() {
            "Infinity".into()
        } else {
            "-Infinity".into()
        };
    }
    let scientific = format!("{value:e}");
    let exponent = scientific
        .rsplit_once('e')
        .and_then(|(_, exponent)| exponent.parse::<i32>().ok())
        .unwrap_or(0);
    if (-4..16).contains(&exponent) {
        format!("{value}")
    } else {
        scientific
    }
}

impl ToSqlText for f32 {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(float_text(*self)))
    }
}

impl ToSqlText for f64 {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(float_text(*self)))
    }
}

#[cfg(feature = "decimal")]
impl ToSqlText for rust_decimal::Decimal {
    fn to_sql_text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Owned(self.to_string()))
    }
}
