//! Macros for building and returning [`crate::error::LoaderError`] values.

/// Creates a [`crate::error::LoaderError`] from a kind, a static description and optionally a
/// detail, formatted with `to_string`, and a source error.
#[macro_export]
macro_rules! loader_error {
    ($kind:expr, $desc:expr) => {
        $crate::error::LoaderError::from(($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        $crate::error::LoaderError::from(($kind, $desc, $detail.to_string()))
    };
    ($kind:expr, $desc:expr, $detail:expr, source: $source:expr) => {
        $crate::error::LoaderError::from_components(
            $kind,
            ::std::borrow::Cow::Borrowed($desc),
            ::core::option::Option::Some(::std::borrow::Cow::Owned($detail.to_string())),
            ::core::option::Option::Some(::std::sync::Arc::new($source)),
        )
    };
}

/// Returns early with a [`crate::error::LoaderError`], accepting the same arguments as
/// [`loader_error!`].
#[macro_export]
macro_rules! bail {
    ($kind:expr, $desc:expr) => {
        return ::core::result::Result::Err($crate::loader_error!($kind, $desc))
    };
    ($kind:expr, $desc:expr, $detail:expr) => {
        return ::core::result::Result::Err($crate::loader_error!($kind, $desc, $detail))
    };
}
