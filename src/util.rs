/// Clips `label` to `max_chars` characters, ending in an ellipsis when cut.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let mut clipped = label
        .chars()
        .take(max_chars - 1)
        .collect::<String>()
        .trim_end()
        .to_owned();
    clipped.push('…');
    clipped
}

pub fn format_millis(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.0} ms", seconds * 1000.0)
    } else {
        format!("{seconds:.1} s")
    }
}
