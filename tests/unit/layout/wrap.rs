use super::*;

fn chars(s: &str) -> f64 {
    s.chars().count() as f64
}

#[test]
fn greedy_wrap_fills_lines() {
    let lines = wrap_words("uno dos tres cuatro cinco", 9.0, &mut chars);
    assert_eq!(lines, vec!["uno dos", "tres", "cuatro", "cinco"]);
}

#[test]
fn long_word_is_never_split() {
    let lines = wrap_words("a supercalifragilistico b", 5.0, &mut chars);
    assert_eq!(lines, vec!["a", "supercalifragilistico", "b"]);
}

#[test]
fn whitespace_is_normalized_and_empty_text_has_no_lines() {
    assert_eq!(wrap_words("  hola   mundo ", 100.0, &mut chars), vec!["hola mundo"]);
    assert!(wrap_words("   ", 10.0, &mut chars).is_empty());
}

#[test]
fn measure_is_called_with_candidate_lines() {
    let mut seen = Vec::new();
    let mut m = |s: &str| {
        seen.push(s.to_owned());
        chars(s)
    };
    let _ = wrap_words("ab cd", 3.0, &mut m);
    assert_eq!(seen, vec!["ab cd"]);
}

#[test]
fn wrapping_is_idempotent() {
    let text = "Usa chunking: agrupa visualmente el patrón en bloques simples.";
    for max in [4.0, 10.0, 18.0, 25.0, 80.0] {
        let once = wrap_lines(&[text], max, &mut chars);
        let twice = wrap_lines(&once, max, &mut chars);
        assert_eq!(once, twice, "max width {max}");
    }
}

#[test]
fn paragraph_breaks_survive() {
    let lines = wrap_lines(&["uno dos", "", "tres"], 3.0, &mut chars);
    assert_eq!(lines, vec!["uno", "dos", "", "tres"]);
}
