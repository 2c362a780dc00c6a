//! Recursive-descent parser: turns a `Token` stream into an `ast::Query`.
//!
//! The grammar mirrors the reference's hand-written parser fairly closely —
//! one lookahead token is always enough to decide what's coming next, so
//! there is no need to reach for a parser-generator crate here.

use crate::ast::{
    DeleteItem, Direction, Filter, NodePattern, PathPattern, Query, QueryKind, RelationshipPattern,
    ReturnItem, VARLEN_CEILING,
};
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};

pub fn parse(input: &str) -> Result<Query> {
    let tokens = Lexer::tokenize(input).map_err(Error::Parse)?;
    Parser {
        tokens,
        pos: 0,
        pathvar: None,
    }
    .parse_query()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Stashed while parsing the pattern, so `parse_return_item` can tell a
    /// bare path-variable reference apart from a bare node-variable one.
    pathvar: Option<String>,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.pos + offset)
            .unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let got = self.advance();
        if got == expected {
            Ok(())
        } else {
            Err(Error::Parse(format!("expected {expected:?}, found {got:?}")))
        }
    }

    fn expect_identifier(&mut self) -> Result<String> {
        match self.advance() {
            Token::Identifier(name) => Ok(name),
            other => Err(Error::Parse(format!("expected an identifier, found {other:?}"))),
        }
    }

    fn expect_string_literal(&mut self) -> Result<String> {
        match self.advance() {
            Token::StringLiteral(s) => Ok(s),
            other => Err(Error::Parse(format!("expected a string literal, found {other:?}"))),
        }
    }

    fn parse_query(&mut self) -> Result<Query> {
        match self.peek().clone() {
            Token::Create => {
                self.advance();
                let pattern = self.parse_pattern()?;
                Ok(Query {
                    pattern,
                    filters: Vec::new(),
                    kind: QueryKind::Create,
                })
            }
            Token::Match => {
                self.advance();
                let pattern = self.parse_pattern()?;
                let filters = if self.peek() == &Token::Where {
                    self.advance();
                    self.parse_conditions()?
                } else {
                    Vec::new()
                };
                match self.peek().clone() {
                    Token::Return => {
                        self.advance();
                        let items = self.parse_return_items()?;
                        Ok(Query {
                            pattern,
                            filters,
                            kind: QueryKind::Return(items),
                        })
                    }
                    Token::Delete => {
                        self.advance();
                        let items = self.parse_delete_items()?;
                        Ok(Query {
                            pattern,
                            filters,
                            kind: QueryKind::Delete(items),
                        })
                    }
                    other => Err(Error::Parse(format!(
                        "expected RETURN or DELETE, found {other:?}"
                    ))),
                }
            }
            other => Err(Error::Parse(format!(
                "expected MATCH or CREATE, found {other:?}"
            ))),
        }
    }

    /// `(pathvar '=')? node (rel node)*`
    fn parse_pattern(&mut self) -> Result<PathPattern> {
        let pathvar = if let (Token::Identifier(name), Token::Equals) =
            (self.peek().clone(), self.peek_at(1).clone())
        {
            self.advance();
            self.advance();
            Some(name)
        } else {
            None
        };
        self.pathvar = pathvar.clone();

        let mut nodes = vec![self.parse_node()?];
        let mut rels = Vec::new();
        while matches!(self.peek(), Token::Dash | Token::Lt) {
            rels.push(self.parse_relationship()?);
            nodes.push(self.parse_node()?);
        }

        Ok(PathPattern {
            pathvar,
            nodes,
            rels,
        })
    }

    /// `'(' var? (':' label)? ('{' 'id' ':' string '}')? ')'`
    fn parse_node(&mut self) -> Result<NodePattern> {
        self.expect(Token::LParen)?;

        let var = if let Token::Identifier(_) = self.peek() {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let label = if self.peek() == &Token::Colon {
            self.advance();
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let id = if self.peek() == &Token::LBrace {
            self.advance();
            let key = self.expect_identifier()?;
            if key != "id" {
                return Err(Error::Parse(format!(
                    "only the 'id' property is supported in node patterns, found '{key}'"
                )));
            }
            self.expect(Token::Colon)?;
            let value = self.expect_string_literal()?;
            self.expect(Token::RBrace)?;
            Some(value)
        } else {
            None
        };

        self.expect(Token::RParen)?;
        Ok(NodePattern { var, label, id })
    }

    /// `('<')? '-' '[' var? (':' type)? ('*' N ('..' M)?)? ']' '-' ('>')?`
    fn parse_relationship(&mut self) -> Result<RelationshipPattern> {
        let leading_lt = if self.peek() == &Token::Lt {
            self.advance();
            true
        } else {
            false
        };
        self.expect(Token::Dash)?;
        self.expect(Token::LBracket)?;

        let var = if let Token::Identifier(_) = self.peek() {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let type_ = if self.peek() == &Token::Colon {
            self.advance();
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let (min_hops, max_hops) = if self.peek() == &Token::Star {
            self.advance();
            let min = match self.advance() {
                Token::Number(n) => n,
                other => {
                    return Err(Error::Parse(format!(
                        "expected a hop count after '*', found {other:?}"
                    )))
                }
            };
            if self.peek() == &Token::DotDot {
                self.advance();
                if let Token::Number(_) = self.peek() {
                    let Token::Number(max) = self.advance() else {
                        unreachable!()
                    };
                    (min, max.min(VARLEN_CEILING))
                } else {
                    (min, VARLEN_CEILING)
                }
            } else {
                (min, min)
            }
        } else {
            (1, 1)
        };

        self.expect(Token::RBracket)?;
        self.expect(Token::Dash)?;
        let trailing_gt = if self.peek() == &Token::Gt {
            self.advance();
            true
        } else {
            false
        };

        let direction = match (leading_lt, trailing_gt) {
            (false, true) => Direction::Outgoing,
            (true, false) => Direction::Incoming,
            (false, false) => Direction::Undirected,
            (true, true) => {
                return Err(Error::Parse(
                    "a relationship cannot point both directions at once".to_string(),
                ))
            }
        };

        Ok(RelationshipPattern {
            var,
            type_,
            direction,
            min_hops,
            max_hops,
        })
    }

    /// `cond (' AND ' cond)*`
    fn parse_conditions(&mut self) -> Result<Vec<Filter>> {
        let mut filters = vec![self.parse_condition()?];
        while self.peek() == &Token::And {
            self.advance();
            filters.push(self.parse_condition()?);
        }
        Ok(filters)
    }

    /// `var '.' prop '=' string`
    fn parse_condition(&mut self) -> Result<Filter> {
        let var = self.expect_identifier()?;
        self.expect(Token::Dot)?;
        let prop = self.expect_identifier()?;
        self.expect(Token::Equals)?;
        let value = self.expect_string_literal()?;
        Ok(Filter { var, prop, value })
    }

    fn parse_return_items(&mut self) -> Result<Vec<ReturnItem>> {
        let mut items = vec![self.parse_return_item()?];
        while self.peek() == &Token::Comma {
            self.advance();
            items.push(self.parse_return_item()?);
        }
        Ok(items)
    }

    fn parse_return_item(&mut self) -> Result<ReturnItem> {
        let name = self.expect_identifier()?;
        if self.peek() == &Token::Dot {
            self.advance();
            let prop = self.expect_identifier()?;
            return Ok(ReturnItem::Property(name, prop));
        }
        if self.pathvar.as_deref() == Some(name.as_str()) {
            Ok(ReturnItem::Path(name))
        } else {
            Ok(ReturnItem::Variable(name))
        }
    }

    fn parse_delete_items(&mut self) -> Result<Vec<DeleteItem>> {
        let mut items = vec![DeleteItem::Variable(self.expect_identifier()?)];
        while self.peek() == &Token::Comma {
            self.advance();
            items.push(DeleteItem::Variable(self.expect_identifier()?));
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_create() {
        let query = parse("CREATE (m:Person{id:'Mark'})").unwrap();
        assert_eq!(query.kind, QueryKind::Create);
        assert_eq!(query.pattern.nodes.len(), 1);
        assert_eq!(query.pattern.nodes[0].var.as_deref(), Some("m"));
        assert_eq!(query.pattern.nodes[0].label.as_deref(), Some("Person"));
        assert_eq!(query.pattern.nodes[0].id.as_deref(), Some("Mark"));
    }

    #[test]
    fn parses_a_fixed_length_outgoing_relationship() {
        let query =
            parse("MATCH (a:Person{id:'Mark'})-[r:KNOWS]->(b:Person) RETURN b.id").unwrap();
        assert_eq!(query.pattern.rels.len(), 1);
        let rel = &query.pattern.rels[0];
        assert_eq!(rel.var.as_deref(), Some("r"));
        assert_eq!(rel.type_.as_deref(), Some("KNOWS"));
        assert_eq!(rel.direction, Direction::Outgoing);
        assert!(rel.is_fixed_single_hop());
        assert_eq!(
            query.kind,
            QueryKind::Return(vec![ReturnItem::Property("b".to_string(), "id".to_string())])
        );
    }

    #[test]
    fn parses_an_incoming_direction_arrow() {
        let query = parse("MATCH (a)<-[:KNOWS]-(b) RETURN a").unwrap();
        assert_eq!(query.pattern.rels[0].direction, Direction::Incoming);
    }

    #[test]
    fn rejects_a_double_headed_relationship() {
        assert!(parse("MATCH (a)<-[:KNOWS]->(b) RETURN a").is_err());
    }

    #[test]
    fn parses_variable_length_bounded_range() {
        let query = parse("MATCH (a)-[:KNOWS*1..3]->(b) RETURN b").unwrap();
        let rel = &query.pattern.rels[0];
        assert_eq!((rel.min_hops, rel.max_hops), (1, 3));
        assert!(!rel.is_fixed_single_hop());
    }

    #[test]
    fn parses_variable_length_unbounded_range_clamped_to_the_ceiling() {
        let query = parse("MATCH (a)-[:KNOWS*2..]->(b) RETURN b").unwrap();
        let rel = &query.pattern.rels[0];
        assert_eq!((rel.min_hops, rel.max_hops), (2, VARLEN_CEILING));
    }

    #[test]
    fn parses_a_path_returning_query() {
        let query = parse("MATCH p = (a)-[:KNOWS]->(b) RETURN p").unwrap();
        assert_eq!(query.pattern.pathvar.as_deref(), Some("p"));
        assert_eq!(query.kind, QueryKind::Return(vec![ReturnItem::Path("p".to_string())]));
    }

    #[test]
    fn parses_a_where_clause_with_conjunctions() {
        let query =
            parse("MATCH (a)-[:KNOWS]->(b) WHERE a.id = 'Mark' AND b.id = 'Alex' RETURN b")
                .unwrap();
        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[1].value, "Alex");
    }

    #[test]
    fn a_string_literal_keyword_is_not_mistaken_for_a_clause() {
        // regression test for the reference's strstr-based dispatch bug
        let query = parse("MATCH (a) WHERE a.id = 'DELETE' RETURN a").unwrap();
        assert_eq!(query.filters[0].value, "DELETE");
        assert!(matches!(query.kind, QueryKind::Return(_)));
    }

    #[test]
    fn parses_a_delete_query() {
        let query = parse("MATCH (a)-[r:KNOWS]->(b) DELETE r").unwrap();
        assert_eq!(query.kind, QueryKind::Delete(vec![DeleteItem::Variable("r".to_string())]));
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(parse("SELECT * FROM nowhere").is_err());
    }
}
