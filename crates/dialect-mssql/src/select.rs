use sqlparser::{
    dialect::MsSqlDialect,
    keywords::Keyword,
    tokenizer::{Location, Token, Tokenizer, TokenizerError},
};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub(crate) fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// `SELECT [DISTINCT]` prefix of a statement. `body` starts at the first
/// character after the keyword(s) and the whitespace following them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectHead<'a> {
    pub(crate) leading: &'a str,
    pub(crate) distinct: bool,
    pub(crate) body: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectItem<'a> {
    pub(crate) expr: &'a str,
    pub(crate) alias: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderKey<'a> {
    pub(crate) expr: &'a str,
    pub(crate) direction: SortDirection,
}

/// Sort key as it must be referenced from a derived table wrapping the
/// statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SortKey<'a> {
    pub(crate) reference: &'a str,
    pub(crate) direction: SortDirection,
}

/// Minimal structure of a single SELECT statement: its head, the items of
/// the outermost select list and the keys of its trailing ORDER BY. Every
/// slice borrows from the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectShape<'a> {
    pub(crate) head: Option<SelectHead<'a>>,
    pub(crate) items: Vec<SelectItem<'a>>,
    pub(crate) order_by: Vec<OrderKey<'a>>,
}

#[derive(Debug)]
struct Lexeme<'a> {
    token: Token,
    text: &'a str,
    start: usize,
    end: usize,
    depth: usize,
}

impl Lexeme<'_> {
    fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.token, Token::Word(word) if word.keyword == keyword && word.quote_style.is_none())
    }

    fn is_top_level(&self) -> bool {
        self.depth == 0
    }
}

impl<'a> SelectShape<'a> {
    pub(crate) fn scan(source: &'a str) -> Self {
        match lex(source) {
            Ok(lexemes) => Self::from_lexemes(source, &lexemes),
            Err(error) => {
                warn!(%error, "query could not be tokenized; ORDER BY analysis skipped");
                Self::from_plain_text(source)
            }
        }
    }

    pub(crate) fn sort_keys(&self) -> Vec<SortKey<'a>> {
        self.order_by
            .iter()
            .map(|key| SortKey {
                reference: self.resolve_reference(key.expr),
                direction: key.direction,
            })
            .collect()
    }

    fn resolve_reference(&self, expr: &'a str) -> &'a str {
        let names_alias = self
            .items
            .iter()
            .filter_map(|item| item.alias)
            .any(|alias| same_text(alias, expr));
        if names_alias {
            return expr;
        }

        let aliased = self
            .items
            .iter()
            .find(|item| same_text(item.expr, expr))
            .and_then(|item| item.alias);
        match aliased {
            Some(alias) => alias,
            None => {
                debug!(key = expr, "ORDER BY key has no select-list alias; referencing it verbatim");
                expr
            }
        }
    }

    fn from_lexemes(source: &'a str, lexemes: &[Lexeme<'a>]) -> Self {
        let mut shape = Self {
            head: None,
            items: Vec::new(),
            order_by: Vec::new(),
        };

        let Some(select) = lexemes.first().filter(|lexeme| lexeme.is_keyword(Keyword::SELECT))
        else {
            return shape;
        };

        let distinct = lexemes
            .get(1)
            .is_some_and(|lexeme| lexeme.is_keyword(Keyword::DISTINCT));
        let list_start = if distinct { 2 } else { 1 };
        let head_end = lexemes[list_start - 1].end;

        shape.head = Some(SelectHead {
            leading: &source[..select.start],
            distinct,
            body: source[head_end..].trim_start(),
        });

        let order_at = lexemes
            .windows(2)
            .rposition(|pair| {
                pair[0].is_top_level()
                    && pair[0].is_keyword(Keyword::ORDER)
                    && pair[1].is_keyword(Keyword::BY)
            })
            .filter(|index| *index >= list_start);
        let from_at = lexemes[list_start..]
            .iter()
            .position(|lexeme| lexeme.is_top_level() && lexeme.is_keyword(Keyword::FROM))
            .map(|index| index + list_start);

        let list_end = from_at.or(order_at).unwrap_or(lexemes.len());
        shape.items = split_top_level(&lexemes[list_start..list_end])
            .into_iter()
            .filter_map(|group| select_item(source, group))
            .collect();

        if let Some(order_at) = order_at {
            shape.order_by = split_top_level(&lexemes[order_at + 2..])
                .into_iter()
                .filter_map(|group| order_key(source, group))
                .collect();
        }

        shape
    }

    fn from_plain_text(source: &'a str) -> Self {
        let head = strip_keyword(source, "SELECT").map(|rest| {
            let rest = rest.trim_start();
            match strip_keyword(rest, "DISTINCT") {
                Some(after) => SelectHead {
                    leading: "",
                    distinct: true,
                    body: after.trim_start(),
                },
                None => SelectHead {
                    leading: "",
                    distinct: false,
                    body: rest,
                },
            }
        });

        Self {
            head,
            items: Vec::new(),
            order_by: Vec::new(),
        }
    }
}

fn lex(source: &str) -> Result<Vec<Lexeme<'_>>, TokenizerError> {
    let dialect = MsSqlDialect {};
    let tokens = Tokenizer::new(&dialect, source).tokenize_with_location()?;

    let mut cursor = OffsetCursor::new(source);
    let starts = tokens
        .iter()
        .map(|token| cursor.advance_to(token.span.start))
        .collect::<Vec<_>>();

    let mut depth = 0usize;
    let mut lexemes = Vec::with_capacity(tokens.len());
    for (index, spanned) in tokens.into_iter().enumerate() {
        let start = starts[index];
        let end = starts.get(index + 1).copied().unwrap_or(source.len());
        let token_depth = match spanned.token {
            Token::LParen => {
                depth += 1;
                depth - 1
            }
            Token::RParen => {
                depth = depth.saturating_sub(1);
                depth
            }
            _ => depth,
        };

        if matches!(spanned.token, Token::Whitespace(_) | Token::EOF) {
            continue;
        }

        lexemes.push(Lexeme {
            token: spanned.token,
            text: &source[start..end],
            start,
            end,
            depth: token_depth,
        });
    }

    Ok(lexemes)
}

/// Maps tokenizer locations (1-based line, 1-based character column) to
/// byte offsets. Locations must be requested in ascending order.
struct OffsetCursor<'a> {
    source: &'a str,
    line: u64,
    column: u64,
    offset: usize,
}

impl<'a> OffsetCursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    fn advance_to(&mut self, location: Location) -> usize {
        while (self.line, self.column) < (location.line, location.column) {
            let Some(ch) = self.source[self.offset..].chars().next() else {
                break;
            };
            self.offset += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset
    }
}

fn split_top_level<'l, 'a>(lexemes: &'l [Lexeme<'a>]) -> Vec<&'l [Lexeme<'a>]> {
    lexemes
        .split(|lexeme| lexeme.is_top_level() && lexeme.token == Token::Comma)
        .filter(|group| !group.is_empty())
        .collect()
}

fn select_item<'a>(source: &'a str, group: &[Lexeme<'a>]) -> Option<SelectItem<'a>> {
    let first = group.first()?;
    let last = group.last()?;

    if let [.., before_as, as_keyword, alias] = group
        && as_keyword.is_top_level()
        && as_keyword.is_keyword(Keyword::AS)
    {
        return Some(SelectItem {
            expr: &source[first.start..before_as.end],
            alias: Some(alias.text),
        });
    }

    Some(SelectItem {
        expr: &source[first.start..last.end],
        alias: None,
    })
}

fn order_key<'a>(source: &'a str, group: &[Lexeme<'a>]) -> Option<OrderKey<'a>> {
    let first = group.first()?;

    if let [.., before, last] = group {
        let direction = if last.is_keyword(Keyword::DESC) {
            Some(SortDirection::Desc)
        } else if last.is_keyword(Keyword::ASC) {
            Some(SortDirection::Asc)
        } else {
            None
        };
        if let Some(direction) = direction {
            return Some(OrderKey {
                expr: &source[first.start..before.end],
                direction,
            });
        }
    }

    let last = group.last()?;
    Some(OrderKey {
        expr: &source[first.start..last.end],
        direction: SortDirection::Asc,
    })
}

fn strip_keyword<'s>(text: &'s str, keyword: &str) -> Option<&'s str> {
    let head = text.get(..keyword.len())?;
    let rest = &text[keyword.len()..];
    (head.eq_ignore_ascii_case(keyword) && rest.starts_with(char::is_whitespace)).then_some(rest)
}

fn same_text(left: &str, right: &str) -> bool {
    let mut left = left.split_whitespace();
    let mut right = right.split_whitespace();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(left), Some(right)) if left.eq_ignore_ascii_case(right) => {}
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_head_items_and_order_keys() {
        let shape = SelectShape::scan("SELECT id, name AS label FROM t ORDER BY label DESC, id");

        let head = shape.head.as_ref().expect("SELECT head should be found");
        assert!(!head.distinct);
        assert_eq!(head.leading, "");
        assert_eq!(head.body, "id, name AS label FROM t ORDER BY label DESC, id");

        assert_eq!(
            shape.items,
            vec![
                SelectItem {
                    expr: "id",
                    alias: None
                },
                SelectItem {
                    expr: "name",
                    alias: Some("label")
                },
            ]
        );
        assert_eq!(
            shape.order_by,
            vec![
                OrderKey {
                    expr: "label",
                    direction: SortDirection::Desc
                },
                OrderKey {
                    expr: "id",
                    direction: SortDirection::Asc
                },
            ]
        );
    }

    #[test]
    fn keywords_inside_literals_comments_and_parens_are_ignored() {
        let shape = SelectShape::scan(
            "SELECT 'ORDER BY x' AS note, /* FROM */ (SELECT MAX(v) FROM u) AS top_v, \
             ROW_NUMBER() OVER (ORDER BY id) AS rn\nFROM t -- ORDER BY nothing",
        );

        assert_eq!(shape.items.len(), 3);
        assert_eq!(shape.items[1].alias, Some("top_v"));
        assert_eq!(shape.items[1].expr, "(SELECT MAX(v) FROM u)");
        assert!(shape.order_by.is_empty());
    }

    #[test]
    fn distinct_head_and_lowercase_keywords_are_detected() {
        let shape = SelectShape::scan("select distinct\n  a, b from t order by b desc");
        let head = shape.head.expect("head should be found");
        assert!(head.distinct);
        assert_eq!(head.body, "a, b from t order by b desc");
        assert_eq!(shape.order_by[0].direction, SortDirection::Desc);
    }

    #[test]
    fn key_matching_an_aliased_expression_resolves_to_the_alias() {
        let shape = SelectShape::scan("SELECT u.first_name AS fname FROM users u ORDER BY U.FIRST_NAME");
        let keys = shape.sort_keys();
        assert_eq!(keys[0].reference, "fname");
    }

    #[test]
    fn unresolved_key_is_referenced_verbatim() {
        let shape = SelectShape::scan("SELECT * FROM t ORDER BY LEN(name) DESC");
        let keys = shape.sort_keys();
        assert_eq!(keys[0].reference, "LEN(name)");
        assert_eq!(keys[0].direction, SortDirection::Desc);
    }

    #[test]
    fn bracketed_identifiers_are_not_keywords() {
        let shape = SelectShape::scan("SELECT [order], [from] FROM t ORDER BY [order] DESC");
        assert_eq!(shape.items.len(), 2);
        assert_eq!(shape.order_by[0].expr, "[order]");
    }

    #[test]
    fn statements_not_starting_with_select_have_no_head() {
        let shape = SelectShape::scan("WITH c AS (SELECT 1 AS x) SELECT x FROM c");
        assert!(shape.head.is_none());
    }

    #[test]
    fn untokenizable_text_falls_back_to_plain_head_detection() {
        let shape = SelectShape::scan("SELECT DISTINCT name FROM t WHERE note = 'open ORDER BY name");
        let head = shape.head.expect("plain-text head should be found");
        assert!(head.distinct);
        assert_eq!(head.body, "name FROM t WHERE note = 'open ORDER BY name");
        assert!(shape.order_by.is_empty());
    }

    #[test]
    fn multibyte_text_keeps_byte_offsets_aligned() {
        let shape = SelectShape::scan("SELECT naïve AS ñ FROM t ORDER BY ñ DESC");
        assert_eq!(shape.items[0].expr, "naïve");
        assert_eq!(shape.items[0].alias, Some("ñ"));
        assert_eq!(shape.sort_keys()[0].reference, "ñ");
    }
}
