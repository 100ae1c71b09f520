//! Lexing raw arguments into typed tokens.

use crate::error::{Error, Result};

/// Prefix marking an id reference, as in `:42`.
pub const ID_MARKER: char = ':';

/// Every option the command language knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opt {
    Back,
    Branch,
    New,
    Annotation,
    Status,
    SetId,
    Close,
    Delete,
    ForceDelete,
    List,
    ListAll,
    ListHistory,
    RawList,
    RawHistory,
    HistoryMenu,
    Current,
    Reindex,
    Help,
    Version,
}

/// Spellings accepted for each option.
const ALIASES: &[(&str, Opt)] = &[
    ("-", Opt::Back),
    ("-b", Opt::Branch),
    ("--branch", Opt::Branch),
    ("-n", Opt::New),
    ("--new", Opt::New),
    ("-a", Opt::Annotation),
    ("--annotate", Opt::Annotation),
    ("-s", Opt::Status),
    ("--status", Opt::Status),
    ("-I", Opt::SetId),
    ("--id", Opt::SetId),
    ("-c", Opt::Close),
    ("--close", Opt::Close),
    ("-d", Opt::Delete),
    ("--delete", Opt::Delete),
    ("-D", Opt::ForceDelete),
    ("--force-delete", Opt::ForceDelete),
    ("-l", Opt::List),
    ("--list", Opt::List),
    ("-la", Opt::ListAll),
    ("--list-all", Opt::ListAll),
    ("-li", Opt::ListHistory),
    ("--list-history", Opt::ListHistory),
    ("-rl", Opt::RawList),
    ("--raw-list", Opt::RawList),
    ("-rh", Opt::RawHistory),
    ("--raw-history", Opt::RawHistory),
    ("-H", Opt::HistoryMenu),
    ("--history", Opt::HistoryMenu),
    ("-C", Opt::Current),
    ("--current", Opt::Current),
    ("--reindex", Opt::Reindex),
    ("-h", Opt::Help),
    ("--help", Opt::Help),
    ("-V", Opt::Version),
    ("--version", Opt::Version),
];

/// A lexed argument. Each variant keeps the argument as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Plain(String),
    /// Id reference; `literal` includes the marker.
    Id { id: String, literal: String },
    Opt { opt: Opt, literal: String },
}

impl Token {
    /// The argument as the user typed it.
    pub fn literal(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Id { literal, .. } | Self::Opt { literal, .. } => literal,
        }
    }

    /// Plain strings and id references can be field values.
    pub const fn is_value(&self) -> bool {
        matches!(self, Self::Plain(_) | Self::Id { .. })
    }
}

fn lookup(literal: &str) -> Option<Opt> {
    ALIASES
        .iter()
        .find(|(spelling, _)| *spelling == literal)
        .map(|&(_, opt)| opt)
}

/// Classify a single argument.
pub fn lex(arg: String) -> Result<Token> {
    if let Some(id) = arg.strip_prefix(ID_MARKER) {
        let id = id.to_string();
        return Ok(Token::Id { id, literal: arg });
    }
    if arg.starts_with('-') {
        return match lookup(&arg) {
            Some(opt) => Ok(Token::Opt { opt, literal: arg }),
            None => Err(Error::BadOption(arg)),
        };
    }
    Ok(Token::Plain(arg))
}

/// Lazy token stream over an argument list.
///
/// Consumption is destructive; re-lex the arguments to start over.
#[derive(Debug)]
pub struct Tokens<I> {
    args: I,
}

impl<I: Iterator<Item = String>> Iterator for Tokens<I> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.args.next().map(lex)
    }
}

pub fn tokenize<I: IntoIterator<Item = String>>(args: I) -> Tokens<I::IntoIter> {
    Tokens {
        args: args.into_iter(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex_all(args: &[&str]) -> Result<Vec<Token>> {
        tokenize(args.iter().map(ToString::to_string)).collect()
    }

    fn opt(opt: Opt, literal: &str) -> Token {
        Token::Opt {
            opt,
            literal: literal.to_string(),
        }
    }

    #[test]
    fn classifies_each_argument() {
        let tokens = lex_all(&["feature", ":42", "-d", "--delete", "-"]).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Plain("feature".to_string()),
                Token::Id {
                    id: "42".to_string(),
                    literal: ":42".to_string()
                },
                opt(Opt::Delete, "-d"),
                opt(Opt::Delete, "--delete"),
                opt(Opt::Back, "-"),
            ]
        );
    }

    #[test]
    fn multi_letter_short_spellings() {
        let tokens = lex_all(&["-li", "-rl", "-rh", "-la"]).unwrap();
        let opts: Vec<_> = tokens
            .iter()
            .map(|t| match t {
                Token::Opt { opt, .. } => *opt,
                other => panic!("not an option: {other:?}"),
            })
            .collect();
        assert_eq!(
            opts,
            vec![Opt::ListHistory, Opt::RawList, Opt::RawHistory, Opt::ListAll]
        );
    }

    #[test]
    fn unknown_option_is_fatal() {
        let err = lex_all(&["-x"]).unwrap_err();
        assert_eq!(err.to_string(), "bad option: -x");
    }

    #[test]
    fn stream_is_lazy() {
        let mut tokens = tokenize(["ok", "-x"].iter().map(ToString::to_string));
        assert_eq!(tokens.next().unwrap().unwrap(), Token::Plain("ok".to_string()));
        assert!(tokens.next().unwrap().is_err());
        assert!(tokens.next().is_none());
    }

    #[test]
    fn every_alias_resolves() {
        for (spelling, expected) in ALIASES {
            assert_eq!(lex(spelling.to_string()).unwrap(), opt(*expected, spelling));
        }
    }
}
