//! A minimal INI-shaped config file: `[section]` headers, `key = value`
//! lines, `#`/`;` comments, blank lines. No subsections, no multi-line
//! continuation — only as much grammar as `core.repositoryformatversion`,
//! `core.filemode`, and `core.bare` need to round-trip (AMBIENT, backs
//! repository construction).

use nom::{
    branch::alt,
    bytes::complete::{is_not, take_while1},
    character::complete::{char, line_ending, not_line_ending, space0},
    combinator::{eof, map, value},
    multi::many0,
    sequence::{delimited, terminated, tuple},
    IResult,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("could not parse config file near: {0:?}")]
    Parse(String),
}

/// An ordered `section -> (key, value)` list. Duplicate keys resolve
/// last-wins on lookup, treating later occurrences of the same key as
/// overriding earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(section))
            .and_then(|(_, entries)| entries.iter().rev().find(|(k, _)| k == key))
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some((_, entries)) = self
            .sections
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(section))
        {
            if let Some(existing) = entries.iter_mut().find(|(k, _)| k == key) {
                existing.1 = value;
            } else {
                entries.push((key.to_string(), value));
            }
        } else {
            self.sections
                .push((section.to_string(), vec![(key.to_string(), value)]));
        }
    }

    pub fn parse(input: &str) -> Result<Self, Error> {
        let (rest, sections) =
            document(input).map_err(|e| Error::Parse(format!("{e}")))?;
        if !rest.trim().is_empty() {
            return Err(Error::Parse(rest.to_string()));
        }
        Ok(Config { sections })
    }

    pub fn to_ini_string(&self) -> String {
        let mut out = String::new();
        for (section, entries) in &self.sections {
            out.push('[');
            out.push_str(section);
            out.push_str("]\n");
            for (key, value) in entries {
                out.push('\t');
                out.push_str(key);
                out.push_str(" = ");
                out.push_str(value);
                out.push('\n');
            }
        }
        out
    }
}

type Entries = Vec<(String, String)>;
type Sections = Vec<(String, Entries)>;

fn document(input: &str) -> IResult<&str, Sections> {
    let (input, _) = blank_or_comment_lines(input)?;
    let (input, sections) = many0(section)(input)?;
    let (input, _) = eof(input)?;
    Ok((input, sections))
}

fn section(input: &str) -> IResult<&str, (String, Entries)> {
    let (input, name) = section_header(input)?;
    let (input, entries) = many0(entry_line)(input)?;
    Ok((input, (name, entries)))
}

fn section_header(input: &str) -> IResult<&str, String> {
    let (input, name) = delimited(
        char('['),
        take_while1(|c: char| c != ']' && c != '\n'),
        char(']'),
    )(input)?;
    let (input, _) = line_ending(input)?;
    let (input, _) = blank_or_comment_lines(input)?;
    Ok((input, name.trim().to_string()))
}

fn entry_line(input: &str) -> IResult<&str, (String, String)> {
    let (input, _) = space0(input)?;
    let (input, key) = take_while1(|c: char| c != '=' && c != '\n' && c != '[' && !c.is_whitespace())(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = char('=')(input)?;
    let (input, _) = space0(input)?;
    let (input, value) = map(not_line_ending, |s: &str| s.trim_end().to_string())(input)?;
    let (input, _) = alt((line_ending, eof))(input)?;
    let (input, _) = blank_or_comment_lines(input)?;
    Ok((input, (key.to_string(), value)))
}

fn comment_line(input: &str) -> IResult<&str, ()> {
    value(
        (),
        tuple((
            space0,
            alt((char('#'), char(';'))),
            is_not("\n"),
            alt((line_ending, eof)),
        )),
    )(input)
}

fn blank_line(input: &str) -> IResult<&str, ()> {
    value((), terminated(space0, line_ending))(input)
}

fn blank_or_comment_lines(input: &str) -> IResult<&str, ()> {
    value((), many0(alt((comment_line, blank_line))))(input)
}
