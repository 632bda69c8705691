//! Macros for declaring state identities.

/// Generate a unit enum implementing [`StateId`](crate::core::StateId).
///
/// # Example
///
/// ```
/// use netstate::state_id;
/// use netstate::core::StateId;
///
/// state_id! {
///     pub enum MatchPhase {
///         Lobby,
///         Countdown,
///         Playing,
///     }
/// }
///
/// assert_eq!(MatchPhase::Countdown.name(), "Countdown");
/// ```
#[macro_export]
macro_rules! state_id {
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
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
