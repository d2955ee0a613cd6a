//! Personalization blend (spec §4.4, §12.2): `score = base_weight * base
//! + user_weight * cosine(doc.vec, user.interest)`. Weights default to
//! 0.8/0.2 but are configurable via `Config::blend_base_weight`/`blend_user_weight`.

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)) as f64
}

pub fn blend_score(base: f64, user_similarity: f64, base_weight: f64, user_weight: f64) -> f64 {
    base_weight * base + user_weight * user_similarity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_are_perfectly_similar() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_have_zero_similarity() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn blend_defaults_weight_base_more_heavily() {
        let score = blend_score(1.0, 0.0, 0.8, 0.2);
        assert!((score - 0.8).abs() < 1e-9);
    }
}
