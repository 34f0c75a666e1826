//! Macro declaring port error enums together with their constructors.
//!
//! Variants ending in `; unavailable` describe an unreachable backend and
//! report `true` from the generated `is_unavailable`.

macro_rules! define_port_error {
    (@flag unavailable) => {
        true
    };
    (@flag) => {
        false
    };

    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )?
                    => $message:expr $(; $marker:ident)?
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Whether the failure means the backend could not be reached.
            pub fn is_unavailable(&self) -> bool {
                match self {
                    $( Self::$variant { .. } => define_port_error!(@flag $($marker)?), )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor generation coverage.
    define_port_error! {
        pub enum SamplePortError {
            Offline => "store offline"; unavailable,
            Query { message: String } => "query failed: {message}",
            Retry { attempts: u32 } => "gave up after {attempts} attempts"; unavailable,
            Conflict { field: String, attempts: u32 } => "{field} conflicted {attempts} times",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::offline().to_string(), "store offline");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::query("timeout");
        assert_eq!(err, SamplePortError::Query { message: "timeout".to_owned() });
        assert_eq!(err.to_string(), "query failed: timeout");
    }

    #[test]
    fn mixed_fields_are_converted_in_order() {
        let err = SamplePortError::conflict("email", 2_u32);
        assert_eq!(err.to_string(), "email conflicted 2 times");
    }

    #[test]
    fn marked_variants_report_unavailable() {
        assert!(SamplePortError::offline().is_unavailable());
        assert!(SamplePortError::retry(3_u32).is_unavailable());
        assert!(!SamplePortError::query("syntax").is_unavailable());
        assert!(!SamplePortError::conflict("email", 1_u32).is_unavailable());
    }
}
