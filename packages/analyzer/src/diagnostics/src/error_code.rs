#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A tag name breaks the custom-element naming grammar.
    InvalidTagName = 1001,

    /// Two or more components declare the same tag name.
    DuplicateTagName = 1002,

    /// A property decorator is applied to a private or protected member.
    NonPublicProperty = 2001,

    /// A `@cssprop`, `@csspart`, `@slot` or event tag repeats an earlier title.
    DuplicateStylingHook = 2002,

    /// A styling-hook tag has no title.
    ///
    /// e.g. `@cssprop - The background color` instead of
    /// `@cssprop --background - The background color`.
    MissingTitle = 2003,

    /// A styling-hook tag has no description.
    MissingDescription = 2004,

    /// A second `@slot` tag without a title; only the first one is the default slot.
    DuplicateDefaultSlot = 2005,
}

impl ErrorCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}
