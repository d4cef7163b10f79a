//! Rule set and selector grammar.

use sable_diagnostic::ErrorCode;
use sable_ir::{RuleSet, SelectorPart, Statement, TokenKind};
use tracing::trace;

use crate::{ParseError, Parser};

impl<'a> Parser<'a> {
    /// Selector group plus declaration block.
    ///
    /// The scope frame is pushed before any selector token is consumed
    /// so that a parent selector `&` inside the upcoming block resolves
    /// against the rule set that encloses this one — its selectors are
    /// captured from the stack top first.
    pub(crate) fn parse_rule_set(&mut self) -> Result<Statement, ParseError> {
        trace!("parse_rule_set at {}", self.cursor.position());
        let parent = self.context.parent_selectors();
        self.context.push_rule_set();

        let selectors = self.parse_selector_group(parent.as_deref())?;
        self.context.set_top_selectors(selectors.clone());

        let block = self.parse_declaration_block()?;
        self.context.pop_rule_set();

        Ok(Statement::RuleSet(RuleSet { selectors, block }))
    }

    /// Accumulate selector parts until the opening brace.
    ///
    /// The descendant combinator has no token of its own: it is derived
    /// from a whitespace gap between two consecutive simple selectors.
    /// A comma separates grouped selectors; the group stays one rule set
    /// with the comma recorded as `GroupSeparator`.
    fn parse_selector_group(
        &mut self,
        parent: Option<&[SelectorPart]>,
    ) -> Result<Vec<SelectorPart>, ParseError> {
        let mut parts: Vec<SelectorPart> = Vec::new();
        loop {
            let span = self.cursor.current_span();
            let kind = self.cursor.current_kind();
            if matches!(kind, TokenKind::LBrace) {
                break;
            }

            let simple_start = kind.is_selector_start();
            if simple_start {
                let gap = !parts.is_empty()
                    && !parts
                        .last()
                        .map(SelectorPart::is_combinator)
                        .unwrap_or(false)
                    && !self.cursor.prev_current_adjacent();
                if gap {
                    parts.push(SelectorPart::Descendant);
                }
            }

            match kind {
                TokenKind::Ident(name) => {
                    self.cursor.advance();
                    parts.push(SelectorPart::Type(name));
                }
                TokenKind::Star => {
                    self.cursor.advance();
                    parts.push(SelectorPart::Universal);
                }
                TokenKind::Hash(name) => {
                    self.cursor.advance();
                    parts.push(SelectorPart::Id(name));
                }
                TokenKind::Class(name) => {
                    self.cursor.advance();
                    parts.push(SelectorPart::Class(name));
                }
                TokenKind::Amp => {
                    self.cursor.advance();
                    parts.push(SelectorPart::Parent {
                        resolved: parent.map(<[SelectorPart]>::to_vec),
                    });
                }
                TokenKind::Colon => parts.push(self.parse_pseudo_selector()?),
                TokenKind::Plus => {
                    self.cursor.advance();
                    parts.push(SelectorPart::AdjacentSibling);
                }
                TokenKind::Gt => {
                    self.cursor.advance();
                    parts.push(SelectorPart::Child);
                }
                TokenKind::Comma => {
                    self.cursor.advance();
                    parts.push(SelectorPart::GroupSeparator);
                }
                kind => {
                    return Err(ParseError::new(
                        ErrorCode::E1005,
                        format!("unexpected selector token {}", kind.display_name()),
                        span,
                    ))
                }
            }
        }
        Ok(parts)
    }

    /// `:name`, optionally `:name(lang-code)`.
    fn parse_pseudo_selector(&mut self) -> Result<SelectorPart, ParseError> {
        self.cursor.expect(&TokenKind::Colon)?;
        if !self.cursor.prev_current_adjacent() {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "expected pseudo selector name after `:`",
                self.cursor.current_span(),
            ));
        }
        let name = self.cursor.expect_ident()?;

        let mut lang = None;
        if self.cursor.prev_current_adjacent() && self.cursor.check(&TokenKind::LParen) {
            self.cursor.advance();
            lang = Some(self.cursor.expect_ident()?);
            self.cursor.expect(&TokenKind::RParen)?;
        }
        Ok(SelectorPart::Pseudo { name, lang })
    }
}
