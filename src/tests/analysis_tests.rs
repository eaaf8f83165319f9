#[cfg(test)]
mod analysis_tests {
    use crate::analysis::*;
    use approx::assert_relative_eq;
    use polars::prelude::*;

    fn sample_table() -> DataFrame {
        df! {
            "PassengerId" => [1i64, 2, 3, 4, 5, 6],
            "Survived" => [1i64, 0, 1, 0, 0, 1],
            "Pclass" => [1i64, 3, 2, 3, 1, 2],
            "Sex" => ["female", "male", "female", "male", "male", "female"],
            "Age" => [30.0f64, 20.0, 25.0, 40.0, 25.0, 10.0],
            "Embarked" => ["S", "C", "C", "S", "C", "C"],
            "Cabin" => [Some("C85"), None, None, Some("B20"), None, None],
            "Fare" => [70.0f64, 8.0, 20.0, 7.5, 50.0, 12.0],
        }
        .unwrap()
    }

    #[test]
    fn test_survival_counts() {
        let counts = survival_counts(&sample_table()).unwrap();
        assert_eq!(counts, vec![(0, 3), (1, 3)]);
    }

    #[test]
    fn test_overall_survival_rate() {
        let rate = overall_survival_rate(&sample_table()).unwrap();
        assert_relative_eq!(rate, 50.0);
    }

    #[test]
    fn test_grouped_rates_match_per_group_means() {
        let rates = grouped_survival_rates(&sample_table(), "Pclass").unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].0, "1");
        assert_relative_eq!(rates[0].1, 50.0);
        assert_eq!(rates[1].0, "2");
        assert_relative_eq!(rates[1].1, 100.0);
        assert_eq!(rates[2].0, "3");
        assert_relative_eq!(rates[2].1, 0.0);
    }

    #[test]
    fn test_gender_split_end_to_end() {
        // 4-row synthetic table: every F survived, every M perished.
        let df = df! {
            "Survived" => [1i64, 0, 1, 0],
            "Sex" => ["F", "M", "F", "M"],
        }
        .unwrap();
        let rates = grouped_survival_rates(&df, "Sex").unwrap();
        assert_eq!(rates[0].0, "F");
        assert_relative_eq!(rates[0].1, 100.0);
        assert_eq!(rates[1].0, "M");
        assert_relative_eq!(rates[1].1, 0.0);
    }

    #[test]
    fn test_grouped_outcome_counts() {
        let counts = grouped_outcome_counts(&sample_table(), "Sex").unwrap();
        assert_eq!(
            counts,
            vec![
                ("female".to_string(), 0, 3),
                ("male".to_string(), 3, 0),
            ]
        );
    }

    #[test]
    fn test_numeric_column_selection_excludes_strings() {
        let names = numeric_column_names(&sample_table());
        assert_eq!(
            names,
            vec!["PassengerId", "Survived", "Pclass", "Age", "Fare"]
        );
    }

    #[test]
    fn test_pearson_on_linear_data() {
        let xs: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0)];
        let doubled: Vec<Option<f64>> = vec![Some(2.0), Some(4.0), Some(6.0)];
        let negated: Vec<Option<f64>> = vec![Some(-1.0), Some(-2.0), Some(-3.0)];

        assert_relative_eq!(pearson(&xs, &doubled), 1.0);
        assert_relative_eq!(pearson(&xs, &negated), -1.0);
    }

    #[test]
    fn test_pearson_skips_incomplete_pairs() {
        // The None rows must not contribute; the remaining pairs are linear.
        let xs = vec![Some(1.0), None, Some(2.0), Some(3.0)];
        let ys = vec![Some(10.0), Some(99.0), None, Some(30.0)];
        assert_relative_eq!(pearson(&xs, &ys), 1.0);
    }

    #[test]
    fn test_pearson_degenerate_inputs_are_nan() {
        let constant = vec![Some(5.0), Some(5.0), Some(5.0)];
        let varying = vec![Some(1.0), Some(2.0), Some(3.0)];
        assert!(pearson(&constant, &varying).is_nan());

        let single = vec![Some(1.0)];
        assert!(pearson(&single, &single).is_nan());
    }

    #[test]
    fn test_correlation_matrix_shape_and_symmetry() {
        let (labels, matrix) = correlation_matrix(&sample_table()).unwrap();

        assert_eq!(labels.len(), 5);
        assert_eq!(matrix.len(), labels.len());
        for (i, row) in matrix.iter().enumerate() {
            assert_eq!(row.len(), labels.len());
            assert_relative_eq!(row[i], 1.0);
            for (j, value) in row.iter().enumerate() {
                if value.is_nan() {
                    assert!(matrix[j][i].is_nan());
                } else {
                    assert_relative_eq!(*value, matrix[j][i]);
                    assert!(*value >= -1.0 - 1e-12 && *value <= 1.0 + 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_correlation_matrix_requires_numeric_columns() {
        let df = df! {
            "Sex" => ["F", "M"],
        }
        .unwrap();
        assert!(correlation_matrix(&df).is_err());
    }

    #[test]
    fn test_ages_by_outcome_splits_subsets() {
        let (survived, perished) = ages_by_outcome(&sample_table()).unwrap();
        assert_eq!(survived, vec![30.0, 25.0, 10.0]);
        assert_eq!(perished, vec![20.0, 40.0, 25.0]);
    }

    #[test]
    fn test_kde_is_a_density() {
        let values = vec![10.0, 20.0, 20.0, 30.0, 45.0];
        let curve = kde(&values, 201);
        assert_eq!(curve.len(), 201);
        assert!(curve.iter().all(|(_, d)| *d >= 0.0));

        // Trapezoid integral of the sampled curve should be close to one.
        let integral: f64 = curve
            .windows(2)
            .map(|w| (w[1].0 - w[0].0) * (w[0].1 + w[1].1) / 2.0)
            .sum();
        assert_relative_eq!(integral, 1.0, epsilon = 0.05);
    }

    #[test]
    fn test_kde_handles_empty_and_constant_input() {
        assert!(kde(&[], 100).is_empty());

        let constant = vec![7.0; 10];
        let curve = kde(&constant, 100);
        assert_eq!(curve.len(), 100);
        assert!(curve.iter().all(|(_, d)| d.is_finite() && *d >= 0.0));
    }
}
