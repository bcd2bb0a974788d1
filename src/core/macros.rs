//! Macros for declaring phase enums.

/// Declare an enum and implement [`State`](crate::core::State) for it.
///
/// The enum gets `Clone`, `Copy`, `PartialEq`, `Eq`, `Debug` and serde
/// derives. Variants listed under `final:` are terminal and variants listed
/// under `error:` are losing outcomes.
///
/// # Example
///
/// ```
/// use hangman::state_enum;
/// use hangman::core::State;
///
/// state_enum! {
///     pub enum Duel {
///         Playing,
///         Solved,
///         Hanged,
///     }
///     final: [Solved, Hanged]
///     error: [Hanged]
/// }
///
/// assert!(Duel::Hanged.is_error());
/// assert_eq!(Duel::Solved.name(), "Solved");
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

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
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

            #[allow(unreachable_patterns)]
            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            #[allow(unreachable_patterns)]
            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::State::name(self))
            }
        }
    };
}
