/// Declare an enum that wraps a primitive integer type, with an `_Unknown` catch-all variant for
/// every value that doesn't correspond to a known variant.
///
/// The `pub doc` form also derives a `Display` impl that prints each variant's name (and the raw
/// value for `_Unknown`), which is handy for error messages and logs built on top of this crate.
macro_rules! enum_with_unknown {
    (
        $( #[$enum_attr:meta] )*
        pub doc enum $name:ident($ty:ty) {
            $(
                $( #[$variant_attr:meta] )*
                $variant:ident = $value:expr
            ),+
            $(,)*
        }
    ) => {
        $( #[$enum_attr] )*
        #[derive(Debug, PartialEq, Eq, Clone, Copy)]
        pub enum $name {
            $(
                $( #[$variant_attr] )*
                $variant
            ),*,
            /// An unrecognized value.
            _Unknown($ty)
        }

        impl ::core::convert::From<$ty> for $name {
            fn from(value: $ty) -> Self {
                match value {
                    $( $value => $name::$variant, )*
                    other => $name::_Unknown(other),
                }
            }
        }

        impl ::core::convert::From<$name> for $ty {
            fn from(value: $name) -> Self {
                match value {
                    $( $name::$variant => $value, )*
                    $name::_Unknown(other) => other,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
                match *self {
                    $( $name::$variant => write!(f, stringify!($variant)), )*
                    $name::_Unknown(other) => write!(f, "unknown ({})", other),
                }
            }
        }
    };
}
