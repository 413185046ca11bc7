//! ClickHouse join keywords
//!
//! sqlparser has no grammar for the `ALL`/`ANY` strictness prefixes, the
//! `LOCAL` locality, `PASTE JOIN`, or `ASOF` joins written without a
//! `MATCH_CONDITION`. Left in the text, `t1 ANY LEFT JOIN t2` parses as a
//! join of `t1 AS ANY`. Before parsing, these words are blanked out of the
//! SQL and recorded per join, keyed by the start of the join's right table
//! expression. Blanking keeps every other token at its line and column, so
//! the spans of the parsed joins find their keywords again.

use crate::error::{SqlError, SqlResult};
use crate::joins::{JoinKind, JoinLocality, JoinStrictness};
use crate::table_join::TableJoin;
use sqlparser::ast::{Join, Spanned};
use sqlparser::dialect::Dialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Location, Span, Token, TokenWithSpan, Tokenizer};
use std::collections::HashMap;

/// Keywords removed from one join clause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinKeywordHint {
    /// `LOCAL`
    pub locality: Option<JoinLocality>,
    /// `ALL`, `ANY` or `ASOF`
    pub strictness: Option<JoinStrictness>,
    /// `PASTE`, parsed as `CROSS`
    pub paste: bool,
}

impl JoinKeywordHint {
    fn is_empty(&self) -> bool {
        self.locality.is_none() && self.strictness.is_none() && !self.paste
    }

    fn set_strictness(&mut self, strictness: JoinStrictness) -> SqlResult<()> {
        match self.strictness {
            Some(existing) if existing != strictness => Err(SqlError::UnsupportedJoin(format!(
                "conflicting join strictness {existing} and {strictness}"
            ))),
            _ => {
                self.strictness = Some(strictness);
                Ok(())
            }
        }
    }

    /// Put the removed keywords back into a join clause parsed without them
    pub fn apply(&self, table_join: &mut TableJoin) -> SqlResult<()> {
        if let Some(locality) = self.locality {
            if table_join.locality != JoinLocality::Unspecified && table_join.locality != locality
            {
                return Err(SqlError::UnsupportedJoin(format!(
                    "conflicting join locality {} and {locality}",
                    table_join.locality
                )));
            }
            table_join.locality = locality;
        }

        if let Some(strictness) = self.strictness {
            if table_join.strictness != JoinStrictness::Unspecified
                && table_join.strictness != strictness
            {
                return Err(SqlError::UnsupportedJoin(format!(
                    "conflicting join strictness {} and {strictness}",
                    table_join.strictness
                )));
            }
            table_join.strictness = strictness;
        }

        if self.paste {
            if table_join.kind != JoinKind::Cross {
                return Err(SqlError::UnsupportedJoin(format!(
                    "PASTE combined with {} join",
                    table_join.kind
                )));
            }
            table_join.kind = JoinKind::Paste;
        }
        Ok(())
    }
}

/// Removed join keywords of one statement
#[derive(Debug, Clone, Default)]
pub struct JoinKeywords {
    hints: HashMap<Location, JoinKeywordHint>,
}

impl JoinKeywords {
    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    /// Keywords removed from the clause of a parsed join
    pub fn for_join(&self, join: &Join) -> Option<&JoinKeywordHint> {
        self.hints.get(&join.relation.span().start)
    }
}

/// SQL text ready for sqlparser plus the join keywords taken out of it
#[derive(Debug, Clone)]
pub struct PreparedSql {
    pub sql: String,
    pub join_keywords: JoinKeywords,
}

impl PreparedSql {
    fn unchanged(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            join_keywords: JoinKeywords::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinWord {
    Global,
    Local,
    All,
    Any,
    Asof,
    Paste,
    Kind,
    Modifier,
}

fn join_word(token: &Token) -> Option<JoinWord> {
    let Token::Word(word) = token else {
        return None;
    };
    if word.quote_style.is_some() {
        return None;
    }
    let join_word = match word.keyword {
        Keyword::GLOBAL => JoinWord::Global,
        Keyword::LOCAL => JoinWord::Local,
        Keyword::ALL => JoinWord::All,
        Keyword::ANY => JoinWord::Any,
        Keyword::ASOF => JoinWord::Asof,
        Keyword::INNER | Keyword::LEFT | Keyword::RIGHT | Keyword::FULL | Keyword::CROSS => {
            JoinWord::Kind
        }
        Keyword::OUTER | Keyword::SEMI | Keyword::ANTI | Keyword::NATURAL => JoinWord::Modifier,
        _ if word.value.eq_ignore_ascii_case("PASTE") => JoinWord::Paste,
        _ => return None,
    };
    Some(join_word)
}

fn is_keyword(token: &Token, keyword: Keyword) -> bool {
    matches!(token, Token::Word(word) if word.keyword == keyword && word.quote_style.is_none())
}

/// Start of the first word after a JOIN keyword, skipping opening parens
fn right_relation_start(after: &[&TokenWithSpan]) -> Option<Location> {
    after
        .iter()
        .find(|token| token.token != Token::LParen)
        .filter(|token| matches!(token.token, Token::Word(_)))
        .map(|token| token.span.start)
}

/// Whether the join clause starting at `after` carries a MATCH_CONDITION
fn has_match_condition(after: &[&TokenWithSpan]) -> bool {
    let mut depth = 0usize;
    for token in after {
        match &token.token {
            Token::LParen => depth += 1,
            Token::RParen if depth == 0 => return false,
            Token::RParen => depth -= 1,
            other if depth == 0 && is_keyword(other, Keyword::JOIN) => return false,
            other if depth == 0 && is_keyword(other, Keyword::MATCH_CONDITION) => return true,
            _ => {}
        }
    }
    false
}

enum Edit {
    Blank(Span),
    Replace(Span, &'static str),
}

/// Blank out the join keywords sqlparser cannot read and record them.
///
/// SQL that fails to tokenize is returned unchanged so the parser reports
/// the error.
pub fn extract_join_keywords(dialect: &dyn Dialect, sql: &str) -> SqlResult<PreparedSql> {
    let Ok(tokens) = Tokenizer::new(dialect, sql).tokenize_with_location() else {
        return Ok(PreparedSql::unchanged(sql));
    };
    let significant: Vec<&TokenWithSpan> = tokens
        .iter()
        .filter(|token| !matches!(token.token, Token::Whitespace(_)))
        .collect();

    let mut hints = HashMap::new();
    let mut edits = Vec::new();

    for (index, token) in significant.iter().enumerate() {
        if !is_keyword(&token.token, Keyword::JOIN) {
            continue;
        }
        let mut start = index;
        while start > 0 && join_word(&significant[start - 1].token).is_some() {
            start -= 1;
        }
        let prefix = &significant[start..index];
        let after = &significant[index + 1..];

        let mut hint = JoinKeywordHint::default();
        let mut clause_edits = Vec::new();
        let mut has_kind = false;
        let mut asof = None;

        for word in prefix {
            match join_word(&word.token) {
                Some(JoinWord::Local) => {
                    hint.locality = Some(JoinLocality::Local);
                    clause_edits.push(Edit::Blank(word.span));
                }
                Some(JoinWord::All) => {
                    hint.set_strictness(JoinStrictness::All)?;
                    clause_edits.push(Edit::Blank(word.span));
                }
                Some(JoinWord::Any) => {
                    hint.set_strictness(JoinStrictness::Any)?;
                    clause_edits.push(Edit::Blank(word.span));
                }
                Some(JoinWord::Asof) => asof = Some(word.span),
                Some(JoinWord::Paste) => {
                    hint.paste = true;
                    clause_edits.push(Edit::Replace(word.span, "CROSS"));
                }
                Some(JoinWord::Kind) => has_kind = true,
                Some(JoinWord::Global) | Some(JoinWord::Modifier) | None => {}
            }
        }

        // `ASOF JOIN t MATCH_CONDITION (...)` is sqlparser's own form
        if let Some(span) = asof {
            if has_kind || !has_match_condition(after) {
                hint.set_strictness(JoinStrictness::Asof)?;
                clause_edits.push(Edit::Blank(span));
            }
        }

        if hint.is_empty() {
            continue;
        }
        let Some(key) = right_relation_start(after) else {
            continue;
        };
        log::trace!("Join keywords {hint:?} for relation at {key}");
        hints.insert(key, hint);
        edits.extend(clause_edits);
    }

    if edits.is_empty() {
        return Ok(PreparedSql::unchanged(sql));
    }

    let lines = LineIndex::new(sql);
    let mut text = sql.to_string();
    for edit in edits {
        let (span, replacement) = match edit {
            Edit::Blank(span) => (span, None),
            Edit::Replace(span, replacement) => (span, Some(replacement)),
        };
        let range = lines.byte_range(span).ok_or_else(|| SqlError::ParseError {
            message: "join keyword outside the SQL text".to_string(),
            line: span.start.line as usize,
            column: span.start.column as usize,
        })?;
        let replacement = match replacement {
            Some(replacement) if replacement.len() == range.len() => replacement.to_string(),
            _ => " ".repeat(range.len()),
        };
        text.replace_range(range, &replacement);
    }

    Ok(PreparedSql {
        sql: text,
        join_keywords: JoinKeywords { hints },
    })
}

/// Maps tokenizer locations (1-based line, 1-based char column) to byte offsets
struct LineIndex<'a> {
    sql: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(sql: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(sql.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { sql, starts }
    }

    fn offset(&self, location: Location) -> Option<usize> {
        let line = usize::try_from(location.line).ok()?.checked_sub(1)?;
        let column = usize::try_from(location.column).ok()?.checked_sub(1)?;
        let start = *self.starts.get(line)?;
        let end = self.starts.get(line + 1).copied().unwrap_or(self.sql.len());
        let text = &self.sql[start..end];
        match text.char_indices().nth(column) {
            Some((i, _)) => Some(start + i),
            None if column == text.chars().count() => Some(end),
            None => None,
        }
    }

    fn byte_range(&self, span: Span) -> Option<std::ops::Range<usize>> {
        let start = self.offset(span.start)?;
        let end = self.offset(span.end)?;
        (start <= end).then_some(start..end)
    }
}

#[cfg(test)]
#[path = "join_keywords_test.rs"]
mod tests;
