//! Macros for declaring state types.

/// Declare a fieldless enum and implement [`State`](crate::core::State) for it.
///
/// Each variant is named after its identifier.
///
/// # Example
///
/// ```
/// use typed_fsm::core::State;
/// use typed_fsm::state_enum;
///
/// state_enum! {
///     pub enum Door {
///         Open,
///         Closed,
///         Locked,
///     }
/// }
///
/// assert_eq!(Door::Locked.name(), "Locked");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
