//! Selector nodes.

use crate::Name;

/// One component of a selector group.
///
/// A rule set's selector group is a flat ordered sequence of these; a
/// comma between grouped selectors is recorded as `GroupSeparator` rather
/// than splitting the group into independent rule sets.
#[derive(Clone, PartialEq, Debug)]
pub enum SelectorPart {
    /// Type selector: `div`.
    Type(Name),
    /// Universal selector: `*`.
    Universal,
    /// Id selector: `#myId`.
    Id(Name),
    /// Class selector: `.first-name`.
    Class(Name),
    /// Parent selector `&`, carrying the enclosing rule set's selector
    /// group as resolved at parse time (`None` at the top level).
    Parent {
        resolved: Option<Vec<SelectorPart>>,
    },
    /// Pseudo selector: `:hover`, `:lang(en)`.
    Pseudo { name: Name, lang: Option<Name> },
    /// Adjacent sibling combinator: `+`.
    AdjacentSibling,
    /// Child combinator: `>`.
    Child,
    /// Descendant combinator (whitespace between selectors).
    Descendant,
    /// Comma between grouped selectors.
    GroupSeparator,
}

impl SelectorPart {
    /// Check whether this part is a combinator rather than a simple
    /// selector.
    pub fn is_combinator(&self) -> bool {
        matches!(
            self,
            SelectorPart::AdjacentSibling
                | SelectorPart::Child
                | SelectorPart::Descendant
                | SelectorPart::GroupSeparator
        )
    }
}
