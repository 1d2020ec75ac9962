//! Wire protocol shared by the tic-tac-toe server and its clients.
//!
//! Every request is one UDP datagram holding a single line of text of the
//! shape `VERB [args...]`, and every response is one newline-terminated
//! line. This crate owns both directions of that grammar so the server and
//! any client agree on it.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 20000;
pub const MAX_PACKET_SIZE: usize = 512;
pub const FIRST_PLAYER_ID: PlayerId = 10000;
pub const BOARD_CELLS: usize = 9;
pub const EMPTY_CELL: char = '-';

/// Handle issued by REGISTER and quoted in every later command.
pub type PlayerId = i32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no known verb at the start of {0:?}")]
    UnknownVerb(String),
    #[error("missing argument `{0}`")]
    MissingArgument(&'static str),
    #[error("argument `{name}` is not an integer: {value:?}")]
    InvalidInteger { name: &'static str, value: String },
    #[error("a board needs exactly 9 cells, got {0:?}")]
    InvalidBoard(String),
}

/// A 3x3 grid flattened row-major into nine cells.
///
/// The server never interprets the marks: any character a client sends is
/// stored as-is. Turn order and win detection belong to the clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [char; BOARD_CELLS],
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [EMPTY_CELL; BOARD_CELLS],
        }
    }

    pub fn cells(&self) -> &[char; BOARD_CELLS] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied()
    }

    /// Returns a copy of this board with `mark` written at `index`, or
    /// `None` when the index is off the grid.
    pub fn with_mark(&self, index: usize, mark: char) -> Option<Board> {
        let mut next = *self;
        *next.cells.get_mut(index)? = mark;
        Some(next)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        let cells: [char; BOARD_CELLS] = chars
            .try_into()
            .map_err(|_| ParseError::InvalidBoard(s.to_string()))?;
        Ok(Self { cells })
    }
}

/// Request verbs in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Register,
    Play,
    Update,
    Move,
    End,
    Shutdown,
}

impl Verb {
    pub const ALL: [Verb; 6] = [
        Verb::Register,
        Verb::Play,
        Verb::Update,
        Verb::Move,
        Verb::End,
        Verb::Shutdown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Register => "REGISTER",
            Verb::Play => "PLAY",
            Verb::Update => "UPDATE",
            Verb::Move => "MOVE",
            Verb::End => "END",
            Verb::Shutdown => "SHUTDOWN",
        }
    }

    /// First verb (in priority order) that the payload starts with,
    /// ignoring ASCII case.
    pub fn from_payload(payload: &str) -> Option<Verb> {
        Self::ALL.into_iter().find(|verb| {
            let name = verb.as_str();
            payload
                .get(..name.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(name))
        })
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed client request.
///
/// `index` stays signed so that `MOVE 10000 -1 X` parses and is rejected
/// by the range check instead of as a malformed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register,
    Play { user_id: PlayerId },
    Update { user_id: PlayerId },
    Move { user_id: PlayerId, index: i32, mark: char },
    End { user_id: PlayerId },
    Shutdown,
}

impl Command {
    fn verb(&self) -> Verb {
        match self {
            Command::Register => Verb::Register,
            Command::Play { .. } => Verb::Play,
            Command::Update { .. } => Verb::Update,
            Command::Move { .. } => Verb::Move,
            Command::End { .. } => Verb::End,
            Command::Shutdown => Verb::Shutdown,
        }
    }
}

fn next_arg<'a, I>(args: &mut I, name: &'static str) -> Result<&'a str, ParseError>
where
    I: Iterator<Item = &'a str>,
{
    args.next().ok_or(ParseError::MissingArgument(name))
}

fn parse_arg<'a, I, T>(args: &mut I, name: &'static str) -> Result<T, ParseError>
where
    I: Iterator<Item = &'a str>,
    T: FromStr,
{
    let token = next_arg(args, name)?;
    token.parse().map_err(|_| ParseError::InvalidInteger {
        name,
        value: token.to_string(),
    })
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let payload = payload.trim();
        let verb =
            Verb::from_payload(payload).ok_or_else(|| ParseError::UnknownVerb(payload.to_string()))?;

        // The leading token is the verb (possibly with junk glued to it),
        // arguments follow positionally and anything extra is ignored.
        let mut args = payload.split_whitespace().skip(1);

        let command = match verb {
            Verb::Register => Command::Register,
            Verb::Play => Command::Play {
                user_id: parse_arg(&mut args, "userid")?,
            },
            Verb::Update => Command::Update {
                user_id: parse_arg(&mut args, "userid")?,
            },
            Verb::Move => {
                let user_id = parse_arg(&mut args, "userid")?;
                let index = parse_arg(&mut args, "index")?;
                let mark = next_arg(&mut args, "mark")?
                    .chars()
                    .next()
                    .ok_or(ParseError::MissingArgument("mark"))?;
                Command::Move {
                    user_id,
                    index,
                    mark,
                }
            }
            Verb::End => Command::End {
                user_id: parse_arg(&mut args, "userid")?,
            },
            Verb::Shutdown => Command::Shutdown,
        };

        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Register | Command::Shutdown => write!(f, "{}", self.verb()),
            Command::Play { user_id } | Command::Update { user_id } | Command::End { user_id } => {
                write!(f, "{} {}", self.verb(), user_id)
            }
            Command::Move {
                user_id,
                index,
                mark,
            } => write!(f, "{} {} {} {}", self.verb(), user_id, index, mark),
        }
    }
}

/// Everything the server can say back to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Registered(PlayerId),
    Waiting,
    StillWaiting,
    GameStarting,
    Board(Board),
    NoGameStarted,
    NotInGame,
    IndexOutOfRange,
    BadRequest,
}

impl Response {
    /// The exact datagram payload, newline included.
    pub fn wire_text(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Registered(id) => write!(f, "{}", id),
            Response::Waiting => f.write_str("You are now waiting for an opponent"),
            Response::StillWaiting => f.write_str("You are still waiting for an opponent"),
            // Trailing space is part of the protocol.
            Response::GameStarting => f.write_str("Game starting... "),
            Response::Board(board) => write!(f, "{}", board),
            Response::NoGameStarted => f.write_str("No game started"),
            Response::NotInGame => f.write_str("You are not in a game"),
            Response::IndexOutOfRange => f.write_str("index out of range"),
            Response::BadRequest => f.write_str("BAD REQUEST"),
        }
    }
}
