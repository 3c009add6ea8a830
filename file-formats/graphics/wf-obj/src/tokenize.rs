//! Line tokenizing shared by the model, material and animation grammars

/// Split a line into whitespace separated tokens.
///
/// Carriage return and line feed characters are dropped wherever they
/// appear, without acting as boundaries. Runs of spaces and tabs collapse
/// into a single boundary, so the result never contains empty tokens.
pub fn split_line_whitespace(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in line.chars() {
        match c {
            '\r' | '\n' => {}
            ' ' | '\t' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Split `input` on every occurrence of `delimiter`.
///
/// Consecutive delimiters produce empty tokens (`"a//b"` gives
/// `["a", "", "b"]`), which is how face references mark a missing texture
/// index. A trailing empty token is not emitted.
pub fn split(input: &str, delimiter: char) -> Vec<&str> {
    let mut tokens: Vec<&str> = input.split(delimiter).collect();
    if tokens.last().is_some_and(|last| last.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Parse a decimal number token
pub fn parse_f32(token: &str) -> Result<f32, String> {
    token
        .parse::<f32>()
        .map_err(|e| format!("invalid number '{token}': {e}"))
}

/// Parse three consecutive number tokens starting at `start`
pub fn parse_triple<S: AsRef<str>>(tokens: &[S], start: usize) -> Result<[f32; 3], String> {
    let Some(fields) = tokens.get(start..start + 3) else {
        return Err(format!(
            "expected 3 numbers after '{}', found {}",
            tokens.first().map(|t| t.as_ref()).unwrap_or_default(),
            tokens.len().saturating_sub(start)
        ));
    };
    Ok([
        parse_f32(fields[0].as_ref())?,
        parse_f32(fields[1].as_ref())?,
        parse_f32(fields[2].as_ref())?,
    ])
}
