//! Macros for ergonomic state machine construction.

/// Build a `Vec<TransitionDef>` from `name: from => to` entries.
///
/// `from` is a single string literal or a bracketed list of them.
///
/// # Example
///
/// ```
/// use lifecycle_fsm::transitions;
///
/// let defs = transitions![
///     step: "A" => "B",
///     step: "B" => "C",
///     reset: ["B", "C"] => "A",
/// ];
///
/// assert_eq!(defs.len(), 3);
/// assert!(defs[2].from.contains("C"));
/// ```
#[macro_export]
macro_rules! transitions {
    (
        $(
            $name:ident : $from:tt => $to:expr
        ),* $(,)?
    ) => {
        vec![
            $(
                $crate::core::TransitionDef::new(stringify!($name), $from, $to)
            ),*
        ]
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Sources, TransitionDef};

    #[test]
    fn transitions_macro_builds_definitions() {
        let defs: Vec<TransitionDef> = transitions![
            melt: "solid" => "liquid",
            freeze: "liquid" => "solid",
        ];

        assert_eq!(
            defs,
            vec![
                TransitionDef::new("melt", "solid", "liquid"),
                TransitionDef::new("freeze", "liquid", "solid"),
            ]
        );
    }

    #[test]
    fn transitions_macro_accepts_source_lists() {
        let defs = transitions![reset: ["B", "C", "D"] => "A"];

        assert_eq!(defs[0].from, Sources::from(["B", "C", "D"]));
        assert_eq!(defs[0].to, "A");
    }

    #[test]
    fn transitions_macro_allows_empty_list() {
        let defs: Vec<TransitionDef> = transitions![];
        assert!(defs.is_empty());
    }
}
