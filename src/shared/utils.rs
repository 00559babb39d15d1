/// Wrap `s` on spaces so that no line gets longer than `max_len`
/// (a single word longer than `max_len` stays on its own line).
/// ```
/// use imrex_data::shared::utils::split_line;
/// assert_eq!(split_line("CASSL binds GILGFVFTL", 12), "CASSL binds\nGILGFVFTL");
/// assert_eq!(split_line("short", 12), "short");
/// ```
pub fn split_line(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut result = String::with_capacity(s.len() + 4);
    let mut current = 0;
    for word in s.split(' ') {
        if current + word.len() < max_len {
            if current == 0 {
                result.push_str(word);
                current += word.len();
            } else {
                result.push(' ');
                result.push_str(word);
                current += word.len() + 1;
            }
        } else {
            result.push('\n');
            result.push_str(word);
            current = word.len();
        }
    }
    result
}

/// Largest value of an iterator of f64, ignoring NaN
pub fn max_f64(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values
        .into_iter()
        .filter(|x| !x.is_nan())
        .fold(None, |acc, x| Some(acc.map_or(x, |a: f64| a.max(x))))
}
