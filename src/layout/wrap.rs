/// Greedy word wrap.
///
/// Words are accumulated while the measured line stays within `max_width`. A word that is wider
/// than `max_width` on its own is never split; it becomes a line by itself.
pub fn wrap_words(text: &str, max_width: f64, measure: &mut dyn FnMut(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_owned()
        } else {
            format!("{line} {word}")
        };
        if line.is_empty() || measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_owned()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wrap every input line independently; blank lines are kept as paragraph breaks.
///
/// Feeding the output back in returns it unchanged.
pub fn wrap_lines<S: AsRef<str>>(
    lines: &[S],
    max_width: f64,
    measure: &mut dyn FnMut(&str) -> f64,
) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(wrap_words(line, max_width, measure));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
