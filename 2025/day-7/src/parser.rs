use chumsky::prelude::*;
use miette::*;

/// Splits the raw puzzle text into grid rows, tolerating CRLF and a trailing newline.
fn parser<'a>() -> impl Parser<'a, &'a str, Vec<&'a str>, extra::Err<Rich<'a, char>>> {
    none_of("\r\n")
        .repeated()
        .at_least(1)
        .to_slice()
        .separated_by(text::newline())
        .allow_trailing()
        .collect()
}

pub fn parse_rows(input: &str) -> Result<Vec<&str>> {
    parser()
        .parse(input)
        .into_result()
        .map_err(|e| miette!("Parse failed: {:?}", e))
}
