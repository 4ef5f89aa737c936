//! Macros for defining kind enums.

/// Macro for defining a kind enum.
///
/// Variants are displayed, parsed and (de)serialized in `kebab-case`, and the
/// discriminant of each variant is available via `u8()` and `TryFrom<u8>`.
///
/// The calling crate must depend on `strum`.
///
/// # Example
///
/// ```rust,ignore
/// # use common::define_kind;
///
/// define_kind! {
///     #[doc = "Vehicle kind."]
///     enum Kind {
///         #[doc = "A sedan."]
///         Sedan = 1,
///
///         #[doc = "A sport utility vehicle."]
///         Suv = 2,
///     }
/// }
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(serialize_all = "kebab-case")]
        pub enum $name {
            $(
                 #[doc = $variant_doc]
                 $variant = $value,
            )*
        }

        impl $name {
            /// All the variants, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Converts this into its [`u8`] representation.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }
        }

        impl ::core::convert::TryFrom<u8> for $name {
            type Error = u8;

            fn try_from(value: u8) -> ::core::result::Result<Self, u8> {
                match value {
                    $(
                        v if Self::$variant.u8() == v => Ok(Self::$variant),
                    )*
                    v => Err(v),
                }
            }
        }

        impl $crate::private::serde::Serialize for $name {
            fn serialize<S>(
                &self,
                serializer: S,
            ) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::private::serde::Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> $crate::private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(
                deserializer: D,
            ) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::private::serde::Deserializer<'de>,
            {
                let raw = <::std::string::String as
                    $crate::private::serde::Deserialize>::deserialize(
                        deserializer,
                    )?;
                raw.parse().map_err(|_| {
                    <D::Error as $crate::private::serde::de::Error>::custom(
                        ::std::format!(
                            "invalid `{}` value: {raw}",
                            ::core::stringify!($name),
                        ),
                    )
                })
            }
        }
    };
}
