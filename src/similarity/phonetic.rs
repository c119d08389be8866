//! Four-character Soundex codes.

/// Soundex code of the ASCII letters in `text`, or an empty string when it
/// has none (`"Robert"` -> `"R163"`).
pub fn soundex(text: &str) -> String {
    let letters: Vec<char> = text
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    let Some(&first) = letters.first() else {
        return String::new();
    };

    let mut code = String::with_capacity(4);
    code.push(first.to_ascii_uppercase());
    let mut last = digit(first);

    for &c in &letters[1..] {
        if code.len() == 4 {
            break;
        }
        let d = digit(c);
        if d != '0' && d != last {
            code.push(d);
        }
        // h and w do not separate letters with the same code; vowels do.
        if c != 'h' && c != 'w' {
            last = d;
        }
    }

    while code.len() < 4 {
        code.push('0');
    }

    code
}

fn digit(c: char) -> char {
    match c {
        'b' | 'f' | 'p' | 'v' => '1',
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => '2',
        'd' | 't' => '3',
        'l' => '4',
        'm' | 'n' => '5',
        'r' => '6',
        _ => '0',
    }
}

/// Positional match ratio of two Soundex codes, 0 when either is empty.
pub fn code_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let matches = a.chars().zip(b.chars()).filter(|(x, y)| x == y).count();
    matches as f64 / 4.0
}
