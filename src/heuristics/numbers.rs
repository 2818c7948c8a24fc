const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [&str; 12] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
    "sextillion",
    "septillion",
    "octillion",
    "nonillion",
    "decillion",
];

/// True for digit strings, optionally with thousands commas or a decimal point
pub fn is_numeral(text: &str) -> bool {
    let digits: String = text.chars().filter(|c| !matches!(c, ',' | '.')).collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Spell out a numeral the way it would be read aloud in a post.
///
/// Four digits are read like a year ("1999" -> "nineteen ninety nine") unless
/// they look like a round thousand ("2005" -> "two thousand five"). Two
/// digits with a leading zero read as "oh" ("07" -> "oh seven"). Returns
/// `None` if `text` is not a numeral.
pub fn expand_numeral(text: &str) -> Option<String> {
    if !is_numeral(text) {
        return None;
    }

    let all_digits = text.chars().all(|c| c.is_ascii_digit());
    let words = match text.len() {
        4 if all_digits => {
            let (head, tail) = text.split_at(2);
            let head_value: u32 = head.parse().ok()?;
            let tail_value: u32 = tail.parse().ok()?;
            if head_value % 10 == 0 && tail_value < 10 {
                number_to_words(text)
            } else {
                format!("{} {}", number_to_words(head), number_to_words(tail))
            }
        }
        2 if all_digits && text.starts_with('0') => {
            format!("oh {}", number_to_words(&text[1..]))
        }
        _ => number_to_words(text),
    };
    Some(words)
}

/// Cardinal reading of a numeral, without "and" or punctuation.
///
/// Commas are ignored; a decimal part is read digit by digit after "point".
/// Numbers beyond the named scales fall back to digit-by-digit reading.
pub fn number_to_words(text: &str) -> String {
    let plain: String = text.chars().filter(|&c| c != ',').collect();
    let (integer, fraction) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut words = Vec::new();
    if !integer.is_empty() {
        words.push(integer_to_words(integer));
    }
    if let Some(fraction) = fraction {
        words.push("point".to_string());
        let digits = fraction.chars().filter(|c| c.is_ascii_digit());
        words.extend(digits.map(|d| digit_word(d).to_string()));
    }
    words.join(" ")
}

fn digit_word(d: char) -> &'static str {
    d.to_digit(10).map(|v| ONES[v as usize]).unwrap_or("")
}

fn integer_to_words(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return ONES[0].to_string();
    }

    let groups: Vec<u32> = trimmed
        .as_bytes()
        .rchunks(3)
        .rev()
        .filter_map(|chunk| std::str::from_utf8(chunk).ok()?.parse().ok())
        .collect();
    if groups.len() > SCALES.len() {
        return digits.chars().map(digit_word).collect::<Vec<_>>().join(" ");
    }

    let mut words = Vec::new();
    for (i, &group) in groups.iter().enumerate() {
        if group == 0 {
            continue;
        }
        words.push(hundreds_to_words(group));
        let scale = SCALES[groups.len() - 1 - i];
        if !scale.is_empty() {
            words.push(scale.to_string());
        }
    }
    words.join(" ")
}

fn hundreds_to_words(value: u32) -> String {
    let mut words = Vec::new();
    let hundreds = value / 100;
    let rest = value % 100;
    if hundreds > 0 {
        words.push(ONES[hundreds as usize].to_string());
        words.push("hundred".to_string());
    }
    if rest >= 20 {
        words.push(TENS[(rest / 10) as usize].to_string());
        if rest % 10 > 0 {
            words.push(ONES[(rest % 10) as usize].to_string());
        }
    } else if rest > 0 {
        words.push(ONES[rest as usize].to_string());
    }
    words.join(" ")
}
