//! Folding a token stream into one statement.
//!
//! The first token picks either a one-shot statement (listings, delete,
//! back, ...) or a composite statement. Composite statements are read field
//! by field: each field marker consumes its value tokens, and a token that is
//! not a value is handed back to be read as the next marker. There is no
//! backtracking.
//!
//! `--annotate` and `--status` take every following value token, so in
//! `-s wip :7` the `:7` becomes part of the status text.

use super::tokens::{Opt, Token};
use crate::error::{Error, Result};
use crate::store::CLOSED;

/// A field that was asked for, with or without an inline value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    /// Requested without a value; resolved by prompting.
    Wanted,
    Given(T),
}

/// Reference to an existing branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchRef {
    Name(String),
    /// Text after the id marker, not yet validated.
    Id(String),
}

impl BranchRef {
    fn from_token(token: Token) -> Option<Self> {
        match token {
            Token::Plain(name) => Some(Self::Name(name)),
            Token::Id { id, .. } => Some(Self::Id(id)),
            Token::Opt { .. } => None,
        }
    }
}

/// Fields collected for a composite statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composite {
    pub branch: Option<Field<BranchRef>>,
    pub new_branch: Option<Field<String>>,
    pub annotation: Option<Field<String>>,
    pub status: Option<Field<String>>,
    pub id: Option<Field<u32>>,
}

impl Composite {
    /// Whether any metadata field was requested.
    pub const fn edits_metadata(&self) -> bool {
        self.annotation.is_some() || self.status.is_some() || self.id.is_some()
    }
}

/// A fully parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Composite(Composite),
    Back,
    Delete { force: bool, targets: Vec<BranchRef> },
    List { show_closed: bool },
    ListHistory,
    RawList,
    RawHistory,
    HistoryMenu,
    Current,
    Reindex,
    Help,
    Version,
}

/// Token source with a one-token push-back slot.
struct Parser<I> {
    tokens: I,
    pending: Option<Token>,
}

impl<I: Iterator<Item = Result<Token>>> Parser<I> {
    fn next(&mut self) -> Result<Option<Token>> {
        match self.pending.take() {
            Some(token) => Ok(Some(token)),
            None => self.tokens.next().transpose(),
        }
    }

    fn push_back(&mut self, token: Token) {
        self.pending = Some(token);
    }

    /// Next token if it is a value; anything else is pushed back.
    fn value(&mut self) -> Result<Option<Token>> {
        match self.next()? {
            Some(token) if token.is_value() => Ok(Some(token)),
            Some(token) => {
                self.push_back(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Every following value token, joined with single spaces.
    fn text(&mut self) -> Result<Field<String>> {
        let mut words: Vec<String> = Vec::new();
        while let Some(token) = self.value()? {
            words.push(token.literal().to_string());
        }
        if words.is_empty() {
            Ok(Field::Wanted)
        } else {
            Ok(Field::Given(words.join(" ")))
        }
    }

    /// At most one value token, parsed as an id.
    fn id(&mut self) -> Result<Field<u32>> {
        let Some(token) = self.value()? else {
            return Ok(Field::Wanted);
        };
        let text = match &token {
            Token::Id { id, .. } => id.as_str(),
            other => other.literal(),
        };
        text.parse::<u32>()
            .map(Field::Given)
            .map_err(|_| Error::IdNotInteger(token.literal().to_string()))
    }

    /// No tokens may follow a one-shot statement.
    fn end(&mut self) -> Result<()> {
        match self.next()? {
            Some(token) => Err(Error::UnexpectedArgument(token.literal().to_string())),
            None => Ok(()),
        }
    }

    fn composite(&mut self) -> Result<Composite> {
        let mut fields = Composite::default();

        while let Some(token) = self.next()? {
            let (opt, literal) = match token {
                Token::Opt { opt, literal } => (opt, literal),
                value => return Err(Error::UnexpectedArgument(value.literal().to_string())),
            };
            match opt {
                Opt::Branch => {
                    fields.branch = Some(
                        self.value()?
                            .and_then(BranchRef::from_token)
                            .map_or(Field::Wanted, Field::Given),
                    );
                }
                Opt::New => {
                    fields.new_branch = Some(match self.value()? {
                        Some(token) => Field::Given(token.literal().to_string()),
                        None => Field::Wanted,
                    });
                }
                Opt::Annotation => fields.annotation = Some(self.text()?),
                Opt::Status => fields.status = Some(self.text()?),
                Opt::Close => fields.status = Some(Field::Given(CLOSED.to_string())),
                Opt::SetId => fields.id = Some(self.id()?),
                Opt::Back
                | Opt::Delete
                | Opt::ForceDelete
                | Opt::List
                | Opt::ListAll
                | Opt::ListHistory
                | Opt::RawList
                | Opt::RawHistory
                | Opt::HistoryMenu
                | Opt::Current
                | Opt::Reindex
                | Opt::Help
                | Opt::Version => return Err(Error::UnexpectedArgument(literal)),
            }
        }

        Ok(fields)
    }

    fn delete_targets(&mut self) -> Result<Vec<BranchRef>> {
        let mut targets = Vec::new();
        while let Some(token) = self.next()? {
            match BranchRef::from_token(token.clone()) {
                Some(target) => targets.push(target),
                None => return Err(Error::UnexpectedArgument(token.literal().to_string())),
            }
        }
        Ok(targets)
    }
}

/// Parse a whole command line.
pub fn parse<I: Iterator<Item = Result<Token>>>(tokens: I) -> Result<Statement> {
    let mut parser = Parser {
        tokens,
        pending: None,
    };

    let Some(first) = parser.next()? else {
        return Ok(Statement::Composite(Composite {
            branch: Some(Field::Wanted),
            ..Composite::default()
        }));
    };

    let opt = match first {
        Token::Opt { opt, .. } => opt,
        value => {
            let branch = BranchRef::from_token(value).map(Field::Given);
            let mut fields = parser.composite()?;
            if fields.branch.is_none() {
                fields.branch = branch;
            }
            return Ok(Statement::Composite(fields));
        }
    };

    let one_shot = match opt {
        Opt::Branch | Opt::New | Opt::Annotation | Opt::Status | Opt::SetId | Opt::Close => {
            parser.push_back(first);
            return Ok(Statement::Composite(parser.composite()?));
        }
        Opt::Delete | Opt::ForceDelete => {
            return Ok(Statement::Delete {
                force: opt == Opt::ForceDelete,
                targets: parser.delete_targets()?,
            });
        }
        Opt::Back => Statement::Back,
        Opt::List => Statement::List { show_closed: false },
        Opt::ListAll => Statement::List { show_closed: true },
        Opt::ListHistory => Statement::ListHistory,
        Opt::RawList => Statement::RawList,
        Opt::RawHistory => Statement::RawHistory,
        Opt::HistoryMenu => Statement::HistoryMenu,
        Opt::Current => Statement::Current,
        Opt::Reindex => Statement::Reindex,
        Opt::Help => Statement::Help,
        Opt::Version => Statement::Version,
    };

    parser.end()?;
    Ok(one_shot)
}
