//! Regex fragments shared by more than one family's rule table.
//!
//! Grounded on the constant definitions shared across `C_rules`/`DTS_rules`/
//! `GASM_rules` near the top of the original lexer module (`c_comment`,
//! `c_string_and_char`, `c_number`, `whitespace`, `c_angled_include`).

pub const WHITESPACE: &str = r"\s+";

const C_MULTILINE_COMMENT: &str = r"/\*(.|\s)*?\*/";
const C_SINGLELINE_COMMENT: &str = r"//(\\\s*\n|[^\n])*\n";

pub fn c_comment() -> String {
    format!("(({C_MULTILINE_COMMENT})|({C_SINGLELINE_COMMENT}))")
}

const C_STRING: &str = r#""([^\\"]|\\(.|\s))*?""#;
const SINGLE_QUOTE_STRING: &str = r"'([^\\']|\\(.|\s))*?'";

pub fn c_string_and_char() -> String {
    format!("(({SINGLE_QUOTE_STRING})|({C_STRING}))")
}

pub fn c_string() -> &'static str {
    C_STRING
}

const C_NUMBER_SUFFIX: &str = r"([uU]|[lL]|(wb|WB)|[fF]){0,5}";
const C_DECIMAL_INTEGER: &str = r"[+-]?[0-9][0-9']*";
const C_HEXIDECIMAL_INTEGER: &str = r"[+-]?0[xX][0-9a-fA-F][0-9a-fA-F']*";
const C_OCTAL_INTEGER: &str = r"[+-]?0[0-7][0-7']*";
const C_BINARY_INTEGER: &str = r"[+-]?0[bB][01][01']*";
const C_EXPONENT: &str = r"(e[+-]?[0-9][0-9']*)";
const C_HEXIDECIMAL_EXPONENT: &str = r"(p[+-]?[0-9][0-9']*)";

pub fn c_decimal_integer() -> &'static str {
    C_DECIMAL_INTEGER
}

pub fn c_hexidecimal_integer() -> &'static str {
    C_HEXIDECIMAL_INTEGER
}

pub fn c_binary_integer() -> &'static str {
    C_BINARY_INTEGER
}

pub fn c_number() -> String {
    let decimal_double = format!(r"\.[0-9']*{C_EXPONENT}?");
    let octal_double = format!(r"\.[0-7']*{C_EXPONENT}?");
    let hex_double = format!(r"\.[0-9a-fA-F']*{C_HEXIDECIMAL_EXPONENT}?");

    let decimal = format!("{C_DECIMAL_INTEGER}({decimal_double})?");
    let hex = format!("{C_HEXIDECIMAL_INTEGER}({hex_double})?");
    let octal = format!("{C_OCTAL_INTEGER}({decimal_double})?");

    format!("(({hex})|({C_BINARY_INTEGER})|({decimal})|({octal}))({C_NUMBER_SUFFIX})")
}

pub const C_ANGLED_INCLUDE: &str = r"#\s*include\s*<.*?>";

pub const C_IDENTIFIER: &str = r"[a-zA-Z_][a-zA-Z_0-9]*";
