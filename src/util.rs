pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Population standard deviation.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    match (mean(data), data.len()) {
        (Some(data_mean), count) if count > 0 => {
            let variance = data
                .iter()
                .map(|value| {
                    let diff = data_mean - *value;

                    diff * diff
                })
                .sum::<f64>()
                / count as f64;

            Some(variance.sqrt())
        }
        _ => None,
    }
}

/// Round to whole points and keep the result on the 0-100 scale.
pub fn to_points(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[0.5, 0.5]), Some(0.5));
        assert_eq!(mean(&[15., 7., 55., 12., 4.]), Some(18.6));
    }

    #[test]
    fn test_mean_empty_slice() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_std_dev_is_population() {
        // sample std dev would be 1.0, population is sqrt(2/3)
        let result = std_dev(&[1.0, 2.0, 3.0]).unwrap();
        assert!((result - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_identical_pauses() {
        assert_eq!(std_dev(&[0.5, 0.5, 0.5]), Some(0.0));
    }

    #[test]
    fn test_std_dev_empty_slice() {
        assert_eq!(std_dev(&[]), None);
    }

    #[test]
    fn test_to_points_rounds_half_up() {
        assert_eq!(to_points(80.5), 81);
        assert_eq!(to_points(80.49), 80);
        assert_eq!(to_points(66.666), 67);
    }

    #[test]
    fn test_to_points_clamps() {
        assert_eq!(to_points(-3.0), 0);
        assert_eq!(to_points(140.0), 100);
        assert_eq!(to_points(f64::NAN), 0);
    }
}
