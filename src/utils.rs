/// Render a float so the scanner reads it back as a float: `1.0`, `0.25`, `1e20`, `1.5e-7`.
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Render a boolean the way the serializer writes it.
pub fn format_bool(value: bool) -> &'static str {
    if value { "TRUE" } else { "FALSE" }
}

pub fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}
