/// Concatenates text weights and the normalized score, in that order.
pub fn assemble(mut text_weights: Vec<f64>, normalized_score: f64) -> Vec<f64> {
    text_weights.push(normalized_score);
    text_weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_last_column() {
        assert_eq!(assemble(vec![0.1, 0.2], 0.75), vec![0.1, 0.2, 0.75]);
    }

    #[test]
    fn test_empty_text_weights() {
        assert_eq!(assemble(vec![], 0.5), vec![0.5]);
    }
}
