use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;

static ESCAPED_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(\\")|(\\')"#).unwrap());
static SINGLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"'[^']*'").unwrap());
static DOUBLE_QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*""#).unwrap());
static BACKTICKED: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([a-z][a-z_0-9]*)`").unwrap());
static SPACE_BEFORE_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(").unwrap());
static FUNCTION_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z][a-z_0-9]*\(").unwrap());
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z][a-z_0-9]*\b").unwrap());

const STOPWORDS: [&str; 16] = [
    "is", "in", "between", "like", "and", "or", "null", "not", "interval",
    "second", "minute", "hour", "day", "month", "week", "year",
];

/// Best-effort scan of a raw SQL condition for the column names it uses.
///
/// Quoted literals, function names and reserved words are skipped. Only
/// lowercase identifiers are recognized.
pub struct ColumnExtractor;

impl ColumnExtractor {
    pub fn extract(sql: &str) -> IndexSet<String> {
        let mut result = IndexSet::new();

        let s = ESCAPED_QUOTES.replace_all(sql, "");
        let s = SINGLE_QUOTED.replace_all(&s, "");
        let s = DOUBLE_QUOTED.replace_all(&s, "");

        for caps in BACKTICKED.captures_iter(&s) {
            result.insert(caps[1].to_string());
        }
        let s = BACKTICKED.replace_all(&s, "");
        let s = SPACE_BEFORE_PAREN.replace_all(&s, "(");
        let s = FUNCTION_HEAD.replace_all(&s, "(");

        for m in TOKEN.find_iter(&s) {
            let token = m.as_str();
            if !STOPWORDS.contains(&token) {
                result.insert(token.to_string());
            }
        }
        result
    }
}
