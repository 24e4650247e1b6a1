//! Text-backed status enums.
//!
//! Status columns are stored as TEXT guarded by CHECK constraints. Each enum
//! generated by [`define_text_enum!`] maps its variants to the exact strings
//! stored in the database and sent over the wire, so there is one spelling
//! per value across SQL, JSON and Rust.

/// Returned when a string does not name any variant of a status enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind} '{value}'. Must be one of: {expected}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[derive(::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// The stored / serialized spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::status::ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err($crate::status::ParseStatusError {
                        kind: $kind,
                        value: other.to_string(),
                        expected: [$( $text ),+].join(", "),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::status::ParseStatusError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use define_text_enum;

#[cfg(test)]
mod tests {
    define_text_enum! {
        /// Fixture enum.
        Light("light") {
            Red => "red",
            Green => "Green",
        }
    }

    #[test]
    fn parses_exact_spelling_only() {
        assert_eq!("red".parse::<Light>().unwrap(), Light::Red);
        assert_eq!("Green".parse::<Light>().unwrap(), Light::Green);
        assert!("Red".parse::<Light>().is_err());
    }

    #[test]
    fn parse_error_lists_expected_values() {
        let err = "blue".parse::<Light>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid light 'blue'. Must be one of: red, Green");
    }

    #[test]
    fn serde_uses_stored_spelling() {
        assert_eq!(serde_json::to_string(&Light::Green).unwrap(), "\"Green\"");
        let parsed: Light = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(parsed, Light::Red);
        assert!(serde_json::from_str::<Light>("\"amber\"").is_err());
        for light in Light::ALL {
            assert_eq!(serde_json::to_value(light).unwrap(), light.as_str());
        }
    }
}
