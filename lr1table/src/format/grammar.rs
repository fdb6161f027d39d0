//! `nom` combinators for the textual grammar format: section markers, identifiers, and the
//! `LHS : rhs... [name] | ... ;` production syntax.

use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, not_line_ending, satisfy};
use nom::combinator::{map, recognize, value};
use nom::multi::{many0, many1, separated_list1};
use nom::sequence::{pair, preceded};
use nom::IResult;

use super::{ParsedGrammar, ParsedProduction};

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(char('#'), not_line_ending))(input)
}

/// Skips any run of whitespace and `#` comments.
fn ws0(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((value((), satisfy(char::is_whitespace)), value((), comment)))),
    )(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    preceded(ws0, take_while1(is_ident_char))(input)
}

fn marker<'a>(keyword: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(ws0, tag(keyword))
}

fn alternative(input: &str) -> IResult<&str, (Vec<&str>, &str)> {
    let (input, rhs) = many0(identifier)(input)?;
    let (input, _) = preceded(ws0, char('['))(input)?;
    let (input, name) = identifier(input)?;
    let (input, _) = preceded(ws0, char(']'))(input)?;
    Ok((input, (rhs, name)))
}

fn production(input: &str) -> IResult<&str, Vec<ParsedProduction>> {
    let (input, lhs) = identifier(input)?;
    let (input, _) = preceded(ws0, char(':'))(input)?;
    let (input, alternatives) = separated_list1(preceded(ws0, char('|')), alternative)(input)?;
    let (input, _) = preceded(ws0, char(';'))(input)?;

    let productions = alternatives
        .into_iter()
        .map(|(rhs, name)| ParsedProduction { lhs, rhs, name })
        .collect();

    Ok((input, productions))
}

/// One section of a grammar file, in the order it was written. `TryFrom<ParsedGrammar>` walks
/// these in textual order so a symbol must be declared before anything (a production, a later
/// `%start`/`%end`) can refer to it, the same streaming resolution the file format is read with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Section<'a> {
    Start(&'a str),
    End(&'a str),
    Terminal(Vec<&'a str>),
    Intermediate(Vec<&'a str>),
    Grammar(Vec<ParsedProduction<'a>>),
}

fn section(input: &str) -> IResult<&str, Section> {
    alt((
        map(preceded(marker("%start"), identifier), Section::Start),
        map(preceded(marker("%end"), identifier), Section::End),
        map(preceded(marker("%terminal"), many1(identifier)), Section::Terminal),
        map(
            preceded(marker("%intermediate"), many1(identifier)),
            Section::Intermediate,
        ),
        map(
            preceded(marker("%grammar"), many0(production)),
            |productions: Vec<Vec<ParsedProduction>>| {
                Section::Grammar(productions.into_iter().flatten().collect())
            },
        ),
    ))(input)
}

/// Parses a whole grammar file into its syntactic (pre-validation) form, preserving the textual
/// order of its sections.
pub(super) fn grammar_file(input: &str) -> IResult<&str, ParsedGrammar> {
    let (input, sections) = many0(section)(input)?;
    let (input, _) = ws0(input)?;
    Ok((input, ParsedGrammar { sections }))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flattens the `%grammar` sections' productions in order, ignoring everything else, since
    /// most tests here only care about how a single section's contents were lexed.
    fn productions_of<'a>(sections: &[Section<'a>]) -> Vec<ParsedProduction<'a>> {
        sections
            .iter()
            .filter_map(|s| match s {
                Section::Grammar(productions) => Some(productions.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn parses_minimal_grammar() {
        let input = "
            %start S
            %end end
            %terminal a b
            %intermediate S
            %grammar
            S : a b [p1] ;
        ";
        let (rest, parsed) = grammar_file(input).unwrap();
        assert!(rest.trim().is_empty());
        assert_eq!(
            parsed.sections,
            vec![
                Section::Start("S"),
                Section::End("end"),
                Section::Terminal(vec!["a", "b"]),
                Section::Intermediate(vec!["S"]),
                Section::Grammar(vec![ParsedProduction {
                    lhs: "S",
                    rhs: vec!["a", "b"],
                    name: "p1",
                }]),
            ]
        );
    }

    #[test]
    fn comments_and_whitespace_are_insignificant() {
        let input = "# a comment\n%start  S # trailing\n%end end\n";
        let (rest, parsed) = grammar_file(input).unwrap();
        assert!(rest.trim().is_empty());
        assert_eq!(parsed.sections[0], Section::Start("S"));
    }

    #[test]
    fn multiple_alternatives_share_lhs() {
        let input = "%grammar S : a [p1] | b [p2] ;";
        let (_, parsed) = grammar_file(input).unwrap();
        let productions = productions_of(&parsed.sections);
        assert_eq!(productions.len(), 2);
        assert_eq!(productions[0].lhs, "S");
        assert_eq!(productions[1].lhs, "S");
    }

    #[test]
    fn empty_rhs_is_allowed() {
        let input = "%grammar S : [eps] ;";
        let (_, parsed) = grammar_file(input).unwrap();
        assert_eq!(productions_of(&parsed.sections)[0].rhs, Vec::<&str>::new());
    }

    #[test]
    fn sections_are_kept_in_textual_order() {
        let input = "%start S\n%grammar S : a [p] ;\n%terminal a\n";
        let (_, parsed) = grammar_file(input).unwrap();
        assert_eq!(
            parsed.sections,
            vec![
                Section::Start("S"),
                Section::Grammar(vec![ParsedProduction {
                    lhs: "S",
                    rhs: vec!["a"],
                    name: "p",
                }]),
                Section::Terminal(vec!["a"]),
            ]
        );
    }
}
