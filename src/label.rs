use logos::Logos;
use time::Month;

#[derive(Logos, Debug, PartialEq)]
#[logos(skip r"[ \t\r\n]+")] // Ignore this regex pattern between tokens
enum Token {
    // Month
    #[regex("[Jj][Aa][Nn]([Uu][Aa][Rr][Yy])?", priority = 3)]
    January,
    #[regex("[Ff][Ee][Bb]([Rr][Uu][Aa][Rr][Yy])?", priority = 3)]
    February,
    #[regex("[Mm][Aa][Rr]([Cc][Hh])?", priority = 3)]
    March,
    #[regex("[Aa][Pp][Rr]([Ii][Ll])?", priority = 3)]
    April,
    #[regex("[Mm][Aa][Yy]", priority = 3)]
    May,
    #[regex("[Jj][Uu][Nn][Ee]?", priority = 3)]
    June,
    #[regex("[Jj][Uu][Ll][Yy]?", priority = 3)]
    July,
    #[regex("[Aa][Uu][Gg]([Uu][Ss][Tt])?", priority = 3)]
    August,
    #[regex("[Ss][Ee][Pp]([Tt]|[Tt][Ee][Mm][Bb][Ee][Rr])?", priority = 3)]
    September,
    #[regex("[Oo][Cc][Tt]([Oo][Bb][Ee][Rr])?", priority = 3)]
    October,
    #[regex("[Nn][Oo][Vv]([Ee][Mm][Bb][Ee][Rr])?", priority = 3)]
    November,
    #[regex("[Dd][Ee][Cc]([Ee][Mm][Bb][Ee][Rr])?", priority = 3)]
    December,

    #[regex(r"-?[0-9]+(\.[0-9]+)?")]
    Number,
    #[regex("[a-zA-Z]+")]
    Word,
}

impl Token {
    fn month(&self) -> Option<Month> {
        let month = match self {
            Token::January => Month::January,
            Token::February => Month::February,
            Token::March => Month::March,
            Token::April => Month::April,
            Token::May => Month::May,
            Token::June => Month::June,
            Token::July => Month::July,
            Token::August => Month::August,
            Token::September => Month::September,
            Token::October => Month::October,
            Token::November => Month::November,
            Token::December => Month::December,
            _ => return None,
        };
        Some(month)
    }
}

/// What a row label of the monthly sheet stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Month(Month),
    /// A seasonal roll-up row such as `Winter (Jan - Mar)`.
    Aggregate,
    Unknown,
}

/// Markers of the seasonal roll-up rows embedded in the monthly sheet,
/// matched case-sensitively anywhere in the label.
const AGGREGATE_MARKERS: [&str; 2] = ["Winter", "Spring"];

impl Label {
    /// An aggregate marker anywhere in the label wins over month names, so
    /// `Winter (Jan - Mar)` is an aggregate and not January.
    pub fn classify(s: &str) -> Self {
        if AGGREGATE_MARKERS.iter().any(|marker| s.contains(marker)) {
            return Label::Aggregate;
        }

        Token::lexer(s)
            .flatten()
            .find_map(|token| token.month())
            .map_or(Label::Unknown, Label::Month)
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Label::Aggregate)
    }

    pub fn month(&self) -> Option<Month> {
        match self {
            Label::Month(month) => Some(*month),
            _ => None,
        }
    }
}

pub fn abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
