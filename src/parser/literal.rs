//! Decoding of string and number lexemes into runtime values.

/// Strips the surrounding quotes and translates escape sequences. An escape
/// the table does not know stands for the escaped character itself.
pub(crate) fn decode_string(lexeme: &str) -> Result<String, String> {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| format!("malformed string literal {}", lexeme))?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(chr) = chars.next() {
        if chr != '\\' {
            out.push(chr);
            continue;
        }
        let escaped = chars
            .next()
            .ok_or_else(|| format!("unterminated escape in {}", lexeme))?;
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            'u' => out.push(decode_unicode(&mut chars, lexeme)?),
            // line continuation
            '\n' => {}
            other => out.push(other),
        }
    }
    Ok(out)
}

fn decode_unicode(chars: &mut std::str::Chars<'_>, lexeme: &str) -> Result<char, String> {
    let digits: String = if chars.as_str().starts_with('{') {
        chars.next();
        let digits: String = chars.by_ref().take_while(|c| *c != '}').collect();
        if digits.is_empty() || digits.len() > 6 {
            return Err(format!("invalid unicode escape in {}", lexeme));
        }
        digits
    } else {
        chars.by_ref().take(4).collect()
    };
    u32::from_str_radix(&digits, 16)
        .ok()
        .filter(|_| !digits.is_empty())
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid unicode escape in {}", lexeme))
}

/// The tokenizer only hands over lexemes of the shape `[-+]?[0-9]+(.[0-9]+)?`.
pub(crate) fn decode_number(lexeme: &str) -> Result<f64, String> {
    lexeme
        .parse::<f64>()
        .map_err(|_| format!("invalid number literal {}", lexeme))
}
