//! Recursive-descent parser for the text encoding.

use log::{debug, trace};

use super::escape::escape;
use super::lexer::{Lexer, Token, TokenKind};
use super::TextError;
use crate::document::Document;
use crate::node::{Formatting, NodeData, NodeId, Quoting};
use crate::value::Value;
use crate::MAX_DEPTH;

/// How a sibling list ended.
enum ListEnd<'a> {
    Eof { prefix: &'a [u8] },
    /// A `}` closed the list; `prefix` is the whitespace before it.
    Close { prefix: &'a [u8], offset: usize },
}

/// Parses the text encoding into a [`Document`], recording formatting on
/// every node so that rendering reproduces the input exactly.
///
/// Input is not required to be UTF-8. Names, values and conditions decode
/// invalid sequences to U+FFFD, and the source bytes are kept for replay.
///
/// # Example
///
/// ```
/// use vdf::text::TextParser;
///
/// let src = "// settings\n\"video\" { \"width\" \"1920\" }\n";
/// let doc = TextParser::new().parse(src).unwrap();
/// assert_eq!(doc.root().first_child().first_child().int(), 1920);
/// assert_eq!(doc.to_text(), src);
/// ```
#[derive(Debug, Clone)]
pub struct TextParser {
    max_depth: usize,
}

impl Default for TextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TextParser {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }

    /// Limits how many `{` blocks may be open at once.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn parse(&self, input: impl AsRef<[u8]>) -> Result<Document, TextError> {
        let input = input.as_ref();
        let mut run = ParseRun {
            lexer: Lexer::new(input),
            doc: Document::new(),
            max_depth: self.max_depth,
        };
        let root = run.doc.root_id();
        match run.parse_list(root, 0)? {
            ListEnd::Eof { prefix } => run.doc.trailer = Some(prefix.to_vec()),
            ListEnd::Close { offset, .. } => {
                return Err(TextError::UnexpectedToken { token: '}', offset })
            }
        }
        debug!(
            "parsed {} bytes of text into {} nodes",
            input.len(),
            run.doc.node_count() - 1
        );
        Ok(run.doc)
    }
}

fn quoting(token: &Token<'_>) -> Quoting {
    match token.kind {
        TokenKind::Quoted => {
            let text = token.text();
            if escape(&text).as_bytes() == token.raw {
                Quoting::Quoted(None)
            } else {
                Quoting::Quoted(Some(token.raw.to_vec()))
            }
        }
        _ => match std::str::from_utf8(token.raw) {
            Ok(_) => Quoting::Bare(None),
            Err(_) => Quoting::Bare(Some(token.raw.to_vec())),
        },
    }
}

struct ParseRun<'a> {
    lexer: Lexer<'a>,
    doc: Document,
    max_depth: usize,
}

impl<'a> ParseRun<'a> {
    fn parse_list(&mut self, parent: NodeId, depth: usize) -> Result<ListEnd<'a>, TextError> {
        loop {
            let token = self.lexer.next_token()?;
            match token.kind {
                TokenKind::Eof => return Ok(ListEnd::Eof { prefix: token.prefix }),
                TokenKind::Close => {
                    return Ok(ListEnd::Close {
                        prefix: token.prefix,
                        offset: token.offset,
                    })
                }
                TokenKind::Open => {
                    return Err(TextError::UnexpectedToken {
                        token: '{',
                        offset: token.offset,
                    })
                }
                TokenKind::Conditional => {
                    return Err(TextError::UnexpectedConditional {
                        condition: token.text().into_owned(),
                        offset: token.offset,
                    })
                }
                TokenKind::Quoted | TokenKind::Bare => self.parse_node(parent, token, depth)?,
            }
        }
    }

    fn parse_node(
        &mut self,
        parent: NodeId,
        key: Token<'a>,
        depth: usize,
    ) -> Result<(), TextError> {
        trace!("text node {:?} at byte {}", key.text(), key.offset);
        let mut format = Formatting {
            before: key.prefix.to_vec(),
            key: quoting(&key),
            ..Formatting::default()
        };
        let id = self.doc.push_node(NodeData::new(key.text().into_owned()));
        self.doc.link_last(parent, id);

        let token = self.lexer.next_token()?;
        let mut condition = String::new();
        match token.kind {
            TokenKind::Conditional => {
                format.condition = token.prefix.to_vec();
                format.condition_src = Some(token.body().to_vec());
                condition = token.text().into_owned();
                let open = self.lexer.next_token()?;
                if open.kind != TokenKind::Open {
                    return Err(TextError::MissingOpenBrace {
                        offset: open.offset,
                    });
                }
                self.parse_block(id, open, &mut format, depth)?;
            }
            TokenKind::Open => self.parse_block(id, token, &mut format, depth)?,
            TokenKind::Quoted | TokenKind::Bare => {
                format.between = token.prefix.to_vec();
                format.value = quoting(&token);
                self.doc.data_mut(id).value = Value::String(token.text().into_owned());
                format.after = self.lexer.line_ending().to_vec();

                let mark = self.lexer.pos();
                let next = self.lexer.next_token()?;
                if next.kind == TokenKind::Conditional {
                    let mut prefix = std::mem::take(&mut format.after);
                    prefix.extend_from_slice(next.prefix);
                    format.condition = prefix;
                    format.condition_src = Some(next.body().to_vec());
                    condition = next.text().into_owned();
                    format.after = self.lexer.line_ending().to_vec();
                } else {
                    self.lexer.reset(mark);
                }
            }
            TokenKind::Close => {
                return Err(TextError::UnexpectedToken {
                    token: '}',
                    offset: token.offset,
                })
            }
            TokenKind::Eof => {
                return Err(TextError::UnexpectedEof {
                    offset: token.offset,
                })
            }
        }

        let data = self.doc.data_mut(id);
        data.condition = condition;
        data.format = Some(Box::new(format));
        Ok(())
    }

    /// Parses the children of `id` after its `{`, through the matching `}`.
    fn parse_block(
        &mut self,
        id: NodeId,
        open: Token<'a>,
        format: &mut Formatting,
        depth: usize,
    ) -> Result<(), TextError> {
        if depth >= self.max_depth {
            return Err(TextError::TooDeep {
                max_depth: self.max_depth,
                offset: open.offset,
            });
        }
        format.between = [open.prefix, open.raw, self.lexer.line_ending()].concat();
        match self.parse_list(id, depth + 1)? {
            ListEnd::Close { prefix, .. } => {
                format.after = [prefix, &b"}"[..], self.lexer.line_ending()].concat();
                Ok(())
            }
            ListEnd::Eof { .. } => Err(TextError::MissingCloseBrace {
                offset: open.offset,
            }),
        }
    }
}
