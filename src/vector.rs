/// Scales `vector` to unit L2 norm. Zero and empty vectors come back unchanged.
pub fn normalize(vector: &[f32]) -> Vec<f32> {
    let norm = l2_norm(vector);
    if norm == 0.0 || !norm.is_finite() {
        return vector.to_vec();
    }
    vector.iter().map(|value| value / norm).collect()
}

pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|value| value * value).sum::<f32>().sqrt()
}

/// Formats the first `count` components, e.g. `[0.1000, 0.2000]...`.
pub fn preview(vector: &[f32], count: usize) -> String {
    let shown: Vec<String> = vector
        .iter()
        .take(count)
        .map(|value| format!("{:.4}", value))
        .collect();
    format!("[{}]...", shown.join(", "))
}
